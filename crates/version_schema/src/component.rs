use std::cmp::Ordering;
use std::sync::Arc;

use itertools::Itertools;

use crate::suffix::SuffixDefinition;

/// Delimiter in front of a component in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Separator {
    #[default]
    None,
    Dash,
    Dot,
}

impl Separator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Separator::None => "",
            Separator::Dash => "-",
            Separator::Dot => ".",
        }
    }

    pub(crate) fn from_char(c: char) -> Option<Separator> {
        match c {
            '-' => Some(Separator::Dash),
            '.' => Some(Separator::Dot),
            _ => None,
        }
    }
}

impl std::fmt::Display for Separator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema level template for one suffix tag.
///
/// Carries tag identity and ordering metadata, but no text or separator. Two
/// components are equal only when they come from the same built schema.
#[derive(Debug, Clone)]
pub struct VersionComponent {
    definition: Arc<SuffixDefinition>,
}

impl VersionComponent {
    pub(crate) fn new(definition: Arc<SuffixDefinition>) -> Self {
        Self { definition }
    }

    pub(crate) fn is_instance_of(&self, definition: &Arc<SuffixDefinition>) -> bool {
        Arc::ptr_eq(&self.definition, definition)
    }

    pub fn definition(&self) -> &SuffixDefinition {
        &self.definition
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// canonical spelling, `""` for the final tag
    pub fn suffix_string(&self) -> &str {
        self.definition.canonical_string()
    }

    pub fn is_final_component(&self) -> bool {
        !self.definition.is_predecessor()
    }

    pub fn allows_more_components(&self) -> bool {
        self.definition.allows_extension()
    }

    /// An instance of this tag, spelled canonically, placed like `donor`.
    ///
    /// Only the separator and chain position are taken from `donor`; its tag and
    /// text are ignored.
    pub fn with_the_same_separator(&self, donor: &VersionComponentInstance) -> VersionComponentInstance {
        VersionComponentInstance {
            kind: ComponentKind::Suffix(self.clone()),
            separator: donor.separator(),
            text: self.suffix_string().to_string(),
            numbers: Vec::new(),
            position: donor.position(),
        }
    }

    pub(crate) fn cmp_rank(&self, other: &VersionComponent) -> Ordering {
        self.definition.cmp_rank(&other.definition)
    }
}

impl PartialEq for VersionComponent {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.definition, &other.definition)
    }
}

impl Eq for VersionComponent {}

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    /// dotted run of integers, e.g. `1.0.3`
    Numeric,
    Suffix(VersionComponent),
}

/// One token of a version chain, with the text needed to render it again.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionComponentInstance {
    kind: ComponentKind,
    separator: Separator,
    text: String,
    numbers: Vec<u64>,
    position: usize,
}

impl VersionComponentInstance {

    pub(crate) fn new(
        kind: ComponentKind,
        separator: Separator,
        text: &str,
        numbers: Vec<u64>,
        position: usize,
    ) -> Self {
        Self {
            kind,
            separator,
            text: text.to_string(),
            numbers,
            position,
        }
    }

    /// A numeric run for the head of a synthesized chain.
    ///
    /// ```
    /// let numbers = version_schema::VersionComponentInstance::numeric(&[2, 0, 1]);
    /// assert_eq!(numbers.text(), "2.0.1");
    /// ```
    pub fn numeric(numbers: &[u64]) -> Self {
        Self {
            kind: ComponentKind::Numeric,
            separator: Separator::None,
            text: numbers.iter().join("."),
            numbers: numbers.to_vec(),
            position: 0,
        }
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// the suffix template, `None` for a numeric run
    pub fn component(&self) -> Option<&VersionComponent> {
        match &self.kind {
            ComponentKind::Numeric => None,
            ComponentKind::Suffix(component) => Some(component),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, ComponentKind::Numeric)
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    /// source text without the separator, e.g. `1.0`, `beta`, `RC-1`
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The dotted numbers of a numeric run, or the trailing number of a suffix
    /// (`alpha1` -> `[1]`). Empty for a bare suffix.
    pub fn numbers(&self) -> &[u64] {
        &self.numbers
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Same tag and text, separator taken from `donor`.
    pub fn with_the_same_separator(&self, donor: &VersionComponentInstance) -> VersionComponentInstance {
        Self {
            separator: donor.separator(),
            ..self.clone()
        }
    }

    pub(crate) fn at_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }
}

impl std::fmt::Display for VersionComponentInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // an empty final suffix must not leave its separator behind
        if self.text.is_empty() {
            return Ok(());
        }
        write!(f, "{}{}", self.separator, self.text)
    }
}
