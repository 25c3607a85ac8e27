use crate::error::{Result, VersionSchemaError};
use crate::schema::VersionSchema;
use crate::suffix::{is_suffix_spelling, SuffixBuilder, SuffixDefinition};

/// Collects suffix tags and produces an immutable [`VersionSchema`].
///
/// Predecessor tags are kept in declaration order. A tag without an explicit
/// ordering index is ranked by that order (0 for the first declared tag, 1 for
/// the next, ...). Distinct tags that end up with the same index are ordered by
/// declaration as well.
///
/// ```
/// use version_schema::SchemaBuilder;
///
/// let mut builder = SchemaBuilder::new();
/// builder.suffix_builder("Beta").add_variant("b").set_canonical_string("beta");
/// builder.final_suffix_builder().add_variant("GA");
/// let schema = builder.build().unwrap();
///
/// assert_eq!(schema.canonical_suffix("B").unwrap(), "beta");
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    suffixes: Vec<SuffixBuilder>,
    final_suffix: Option<SuffixBuilder>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder for the predecessor tag `name`, created on first use.
    pub fn suffix_builder(&mut self, name: &str) -> &mut SuffixBuilder {
        let idx = match self.suffixes.iter().position(|s| s.name() == name) {
            Some(idx) => idx,
            None => {
                self.suffixes.push(SuffixBuilder::new(name));
                self.suffixes.len() - 1
            }
        };
        &mut self.suffixes[idx]
    }

    /// Builder for the single final tag.
    pub fn final_suffix_builder(&mut self) -> &mut SuffixBuilder {
        self.final_suffix.get_or_insert_with(SuffixBuilder::new_final)
    }

    pub fn build(self) -> Result<VersionSchema> {

        let Some(final_suffix) = self.final_suffix else {
            return Err(configuration("no final suffix configured"));
        };

        let mut definitions: Vec<SuffixDefinition> = self.suffixes.iter()
            .enumerate()
            .map(|(order, suffix)| suffix.finish(order))
            .collect();
        definitions.push(final_suffix.finish(definitions.len()));

        let non_predecessors: Vec<&str> = definitions.iter()
            .filter(|def| !def.is_predecessor())
            .map(SuffixDefinition::name)
            .collect();
        if non_predecessors.len() != 1 {
            return Err(configuration(format!(
                "exactly one final suffix allowed, found {non_predecessors:?}"
            )));
        }

        for def in &definitions {
            if def.is_predecessor() && !is_suffix_spelling(def.canonical_string()) {
                return Err(configuration(format!(
                    "suffix {:?}: canonical string {:?} must be alphabetic",
                    def.name(),
                    def.canonical_string()
                )));
            }
            if let Some(bad) = def.variants().iter().find(|v| !is_suffix_spelling(v)) {
                return Err(configuration(format!(
                    "suffix {:?}: variant {bad:?} must be alphabetic",
                    def.name()
                )));
            }
            tracing::trace!(
                name = def.name(),
                canonical = def.canonical_string(),
                ordering = def.ordering_index(),
                predecessor = def.is_predecessor(),
                "suffix registered"
            );
        }

        VersionSchema::new(definitions)
    }
}

fn configuration(msg: impl Into<String>) -> VersionSchemaError {
    VersionSchemaError::SchemaConfiguration(msg.into())
}
