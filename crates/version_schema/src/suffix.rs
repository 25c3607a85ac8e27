use std::cmp::Ordering;

/// name given to the final tag, used by [`crate::VersionSchema::suffix_component`]
pub const FINAL_SUFFIX_NAME: &str = "final";

/// One named suffix tag of a schema.
///
/// Definitions are produced by [`SuffixBuilder`]s when the schema is built and are
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixDefinition {
    name: String,
    variants: Vec<String>,
    canonical: String,
    ordering_index: i64,
    predecessor: bool,
    allows_extension: bool,
    declaration_order: usize,
}

impl SuffixDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// registered spellings, in registration order, exactly as given
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub fn canonical_string(&self) -> &str {
        &self.canonical
    }

    pub fn ordering_index(&self) -> i64 {
        self.ordering_index
    }

    pub fn is_predecessor(&self) -> bool {
        self.predecessor
    }

    pub fn allows_extension(&self) -> bool {
        self.allows_extension
    }

    pub fn declaration_order(&self) -> usize {
        self.declaration_order
    }

    // 1. predecessor tags before the final tag
    // 2. lower ordering index first
    // 3. earlier declaration first, so two distinct tags never tie
    pub(crate) fn cmp_rank(&self, other: &SuffixDefinition) -> Ordering {
        let left = (!self.predecessor, self.ordering_index, self.declaration_order);
        let right = (!other.predecessor, other.ordering_index, other.declaration_order);
        left.cmp(&right)
    }
}

/// a spelling the scanner can actually produce: one or more alphabetic chars
pub(crate) fn is_suffix_spelling(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphabetic)
}

/// Mutable description of one tag, handed out by [`crate::SchemaBuilder`].
#[derive(Debug, Clone)]
pub struct SuffixBuilder {
    name: String,
    variants: Vec<String>,
    canonical: Option<String>,
    ordering_index: Option<i64>,
    predecessor: bool,
    allows_extension: bool,
    is_final: bool,
}

impl SuffixBuilder {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variants: Vec::new(),
            canonical: None,
            ordering_index: None,
            predecessor: true,
            allows_extension: true,
            is_final: false,
        }
    }

    pub(crate) fn new_final() -> Self {
        Self {
            name: FINAL_SUFFIX_NAME.to_string(),
            variants: Vec::new(),
            canonical: Some(String::new()),
            ordering_index: None,
            predecessor: false,
            allows_extension: false,
            is_final: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Register another accepted spelling. Exact duplicates are ignored.
    pub fn add_variant(&mut self, spelling: impl Into<String>) -> &mut Self {
        let spelling = spelling.into();
        if !self.variants.contains(&spelling) {
            self.variants.push(spelling);
        }
        self
    }

    /// Ignored for the final tag, whose canonical string is always empty.
    pub fn set_canonical_string(&mut self, canonical: impl Into<String>) -> &mut Self {
        if self.is_final {
            tracing::trace!(name = self.name.as_str(), "canonical string of the final suffix is fixed");
        } else {
            self.canonical = Some(canonical.into());
        }
        self
    }

    pub fn set_ordering_index(&mut self, index: i64) -> &mut Self {
        self.ordering_index = Some(index);
        self
    }

    /// Ignored for the final tag.
    pub fn set_predecessor(&mut self, predecessor: bool) -> &mut Self {
        if !self.is_final {
            self.predecessor = predecessor;
        }
        self
    }

    /// Ignored for the final tag, nothing may follow it.
    pub fn set_allows_extension(&mut self, allows_extension: bool) -> &mut Self {
        if !self.is_final {
            self.allows_extension = allows_extension;
        }
        self
    }

    /// Freeze into a definition.
    ///
    /// `declaration_order` is also the ordering index when none was set.
    pub(crate) fn finish(&self, declaration_order: usize) -> SuffixDefinition {
        let canonical = self.canonical.clone().unwrap_or_else(|| self.name.clone());
        SuffixDefinition {
            name: self.name.clone(),
            variants: self.variants.clone(),
            canonical,
            ordering_index: self.ordering_index.unwrap_or(declaration_order as i64),
            predecessor: self.predecessor,
            allows_extension: self.allows_extension,
            declaration_order,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn final_builder_ignores_overrides() {
        let mut builder = SuffixBuilder::new_final();
        builder
            .set_canonical_string("release")
            .set_predecessor(true)
            .set_allows_extension(true)
            .add_variant("GA");

        let def = builder.finish(3);
        assert_eq!(def.canonical_string(), "");
        assert!(!def.is_predecessor());
        assert!(!def.allows_extension());
        assert_eq!(def.variants(), ["GA"]);
        assert_eq!(def.name(), FINAL_SUFFIX_NAME);
    }

    #[test]
    fn defaults() {
        let mut builder = SuffixBuilder::new("SNAPSHOT");
        builder.add_variant("snap").add_variant("snap");

        let def = builder.finish(7);
        assert_eq!(def.canonical_string(), "SNAPSHOT");
        assert_eq!(def.ordering_index(), 7);
        assert_eq!(def.declaration_order(), 7);
        assert!(def.is_predecessor());
        assert!(def.allows_extension());
        assert_eq!(def.variants(), ["snap"]);
    }

    #[test]
    fn rank() {
        let late = SuffixBuilder::new("Late").finish(0);
        let early = {
            let mut b = SuffixBuilder::new("Early");
            b.set_ordering_index(-1);
            b.finish(1)
        };
        let fin = {
            let mut b = SuffixBuilder::new_final();
            b.set_ordering_index(-100);
            b.finish(2)
        };

        assert_eq!(early.cmp_rank(&late), Ordering::Less);
        assert_eq!(late.cmp_rank(&fin), Ordering::Less);
        assert_eq!(early.cmp_rank(&fin), Ordering::Less);
        assert_eq!(fin.cmp_rank(&fin), Ordering::Equal);
    }

    #[test]
    fn spellings() {
        assert!(is_suffix_spelling("beta"));
        assert!(is_suffix_spelling("GA"));
        assert!(!is_suffix_spelling(""));
        assert!(!is_suffix_spelling("M1"));
        assert!(!is_suffix_spelling("pre-release"));
    }
}
