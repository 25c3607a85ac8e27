use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::component::{Separator, VersionComponent, VersionComponentInstance};
use crate::error::{Result, VersionSchemaError};
use crate::scanner::VersionComponentScanner;
use crate::suffix::SuffixDefinition;
use crate::version::Version;

/// display alias for the final tag when it has no registered variant
pub const DEFAULT_FINAL_SUFFIX: &str = "final";

#[derive(Debug)]
struct SchemaData {
    /// declaration order, final tag last
    definitions: Vec<Arc<SuffixDefinition>>,

    /// lowercase spelling -> index into definitions
    lookup: HashMap<String, usize>,

    final_index: usize,
}

/// Immutable suffix vocabulary plus the operations defined over it.
///
/// Cloning is cheap and clones share identity: versions parsed through any clone
/// of a schema compare with each other, versions from a separately built schema
/// do not, even when the configuration is identical.
#[derive(Debug, Clone)]
pub struct VersionSchema {
    data: Arc<SchemaData>,
}

impl VersionSchema {

    pub(crate) fn new(definitions: Vec<SuffixDefinition>) -> Result<Self> {

        let definitions: Vec<Arc<SuffixDefinition>> = definitions.into_iter().map(Arc::new).collect();

        let mut lookup: HashMap<String, usize> = HashMap::new();
        for (idx, def) in definitions.iter().enumerate() {
            let spellings = std::iter::once(def.canonical_string())
                .chain(def.variants().iter().map(String::as_str));

            for spelling in spellings {
                let key = spelling.to_lowercase();
                match lookup.get(&key).copied() {
                    Some(other) if other != idx => {
                        let other: &SuffixDefinition = &definitions[other];
                        return Err(VersionSchemaError::SchemaConfiguration(format!(
                            "variant {spelling:?} is shared by suffixes {:?} and {:?}",
                            other.name(),
                            def.name()
                        )));
                    }
                    Some(_) => {}
                    None => {
                        lookup.insert(key, idx);
                    }
                }
            }
        }

        let final_index = definitions.iter()
            .position(|def| !def.is_predecessor())
            .ok_or_else(|| VersionSchemaError::SchemaConfiguration("no final suffix configured".into()))?;

        tracing::debug!(suffixes = definitions.len(), spellings = lookup.len(), "VersionSchema::new");

        Ok(Self {
            data: Arc::new(SchemaData {
                definitions,
                lookup,
                final_index,
            }),
        })
    }

    /// true when both handles refer to the same built schema
    pub fn same_schema(&self, other: &VersionSchema) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// all tags, in declaration order, final tag last
    pub fn definitions(&self) -> impl Iterator<Item = &SuffixDefinition> {
        self.data.definitions.iter().map(|def| def.as_ref())
    }

    fn final_definition(&self) -> &Arc<SuffixDefinition> {
        &self.data.definitions[self.data.final_index]
    }

    pub(crate) fn lookup(&self, spelling: &str) -> Option<&Arc<SuffixDefinition>> {
        self.data.lookup
            .get(&spelling.to_lowercase())
            .map(|&idx| &self.data.definitions[idx])
    }

    fn resolve(&self, spelling: &str) -> Result<&Arc<SuffixDefinition>> {
        self.lookup(spelling).ok_or_else(|| VersionSchemaError::UnknownSuffix(spelling.to_string()))
    }

    pub(crate) fn owns(&self, component: &VersionComponent) -> bool {
        self.data.definitions.iter().any(|def| component.is_instance_of(def))
    }

    /// always `""`
    pub fn canonical_final_suffix(&self) -> &str {
        self.final_definition().canonical_string()
    }

    /// First variant registered for the final tag, or `"final"`.
    pub fn non_empty_final_suffix(&self) -> &str {
        self.final_definition()
            .variants()
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_FINAL_SUFFIX)
    }

    /// Template for "no suffix". Nothing may follow it.
    pub fn final_version_component(&self) -> VersionComponent {
        VersionComponent::new(Arc::clone(self.final_definition()))
    }

    /// Every registered spelling of the tag `spelling` belongs to.
    ///
    /// The canonical string is included when it is not empty.
    pub fn suffix_variants(&self, spelling: &str) -> Result<BTreeSet<&str>> {
        let def = self.resolve(spelling)?;
        let mut variants: BTreeSet<&str> = def.variants().iter().map(String::as_str).collect();
        if !def.canonical_string().is_empty() {
            variants.insert(def.canonical_string());
        }
        Ok(variants)
    }

    /// Normalize any accepted spelling, case-insensitively.
    pub fn canonical_suffix(&self, spelling: &str) -> Result<&str> {
        Ok(self.resolve(spelling)?.canonical_string())
    }

    /// Order two spellings by the tags they belong to.
    ///
    /// The final tag is greater than every predecessor, predecessors are ordered by
    /// ascending ordering index.
    pub fn compare_suffixes(&self, a: &str, b: &str) -> Result<Ordering> {
        let left = self.resolve(a)?;
        let right = self.resolve(b)?;
        Ok(left.cmp_rank(right))
    }

    /// Template for a tag, looked up by declaration name rather than spelling.
    pub fn suffix_component(&self, name: &str) -> Result<VersionComponent> {
        self.data.definitions.iter()
            .find(|def| def.name() == name)
            .map(|def| VersionComponent::new(Arc::clone(def)))
            .ok_or_else(|| VersionSchemaError::UnknownSuffix(name.to_string()))
    }

    pub fn create_scanner<'a>(&'a self, raw: &'a str) -> VersionComponentScanner<'a> {
        VersionComponentScanner::new(self, raw)
    }

    /// Parse `raw` into a [`Version`].
    pub fn version(&self, raw: &str) -> Result<Version> {
        let components = self.create_scanner(raw).collect::<Result<Vec<_>>>()?;
        Ok(Version::new(self.clone(), components))
    }

    /// Build a [`Version`] from an explicit chain, without going through text.
    ///
    /// The chain must be one numeric run without a separator, followed by at
    /// most two suffix components of this schema, where the second is only
    /// allowed if the first allows more components. Positions are renumbered to the chain order.
    pub fn version_of<I>(&self, instances: I) -> Result<Version>
    where
        I: IntoIterator<Item = VersionComponentInstance>,
    {
        let mut components: Vec<VersionComponentInstance> = Vec::new();

        for (position, instance) in instances.into_iter().enumerate() {

            let chain_error = |reason: &'static str| VersionSchemaError::InvalidComponentChain { position, reason };

            match (position, instance.component()) {
                (0, None) => {
                    if instance.numbers().is_empty() {
                        return Err(chain_error("empty numeric run"));
                    }
                    if instance.separator() != Separator::None {
                        return Err(chain_error("the leading numeric run takes no separator"));
                    }
                }
                (0, Some(_)) => {
                    return Err(chain_error("a version must start with a numeric run"));
                }
                (_, None) => {
                    return Err(chain_error("a numeric run is only allowed at the start"));
                }
                (_, Some(component)) => {
                    if !self.owns(component) {
                        return Err(chain_error("suffix belongs to a different schema"));
                    }
                    if position > 2 {
                        return Err(chain_error("at most one suffix extension is allowed"));
                    }
                    let previous = components.last().and_then(VersionComponentInstance::component);
                    if let Some(previous) = previous {
                        if !previous.allows_more_components() {
                            return Err(chain_error("previous suffix does not allow more components"));
                        }
                    }
                }
            }

            components.push(instance.at_position(position));
        }

        if components.is_empty() {
            return Err(VersionSchemaError::InvalidComponentChain {
                position: 0,
                reason: "empty component chain",
            });
        }

        Ok(Version::new(self.clone(), components))
    }
}
