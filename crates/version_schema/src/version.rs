use std::cmp::Ordering;

use itertools::{EitherOrBoth, Itertools};
use serde::{Serialize, Serializer};

use crate::component::{VersionComponent, VersionComponentInstance};
use crate::error::{Result, VersionSchemaError};
use crate::schema::VersionSchema;

// --- General rules ---
//
// 1. numeric runs compare as integers, left to right, missing positions are 0
//        1.0 == 1.0.0 < 1.0.1
// 2. no suffix is the same as the final suffix
//        1.0 == 1.0-final == 1.0.GA
// 3. the final suffix is greater than any predecessor suffix,
//    predecessors compare by their ordering index
//        1.0-alpha < 1.0-beta < 1.0
// 4. the same suffix compares by its trailing number, missing is 0
//        1.0-alpha == 1.0-alpha0 < 1.0-alpha1 < 1.0-alpha10
// 5. a missing extension is the final suffix, so a bare suffix is greater
//    than the same suffix with a predecessor extension
//        1.0-beta-SNAPSHOT < 1.0-beta

/// A parsed or constructed version, bound to the schema that produced it.
///
/// Equality and ordering are defined by the schema rules, not by the text:
/// `1.0` and `1.0.0-final` are equal. Versions from different schema instances
/// are never equal and have no ordering (see [`Version::compare_to`]).
#[derive(Debug, Clone)]
pub struct Version {
    schema: VersionSchema,
    components: Vec<VersionComponentInstance>,
}

impl Version {
    pub(crate) fn new(schema: VersionSchema, components: Vec<VersionComponentInstance>) -> Self {
        Self { schema, components }
    }

    pub fn schema(&self) -> &VersionSchema {
        &self.schema
    }

    pub fn components(&self) -> &[VersionComponentInstance] {
        &self.components
    }

    /// the leading numeric run
    pub fn numbers(&self) -> &[u64] {
        self.components.first().map(VersionComponentInstance::numbers).unwrap_or(&[])
    }

    pub fn suffix(&self) -> Option<&VersionComponentInstance> {
        self.components.get(1)
    }

    pub fn extension(&self) -> Option<&VersionComponentInstance> {
        self.components.get(2)
    }

    /// no suffix, or the final suffix
    pub fn is_final(&self) -> bool {
        self.suffix()
            .and_then(VersionComponentInstance::component)
            .map_or(true, VersionComponent::is_final_component)
    }

    /// Total order within one schema.
    ///
    /// Fails with [`VersionSchemaError::SchemaMismatch`] when `other` comes from a
    /// different schema instance, identical configuration or not.
    pub fn compare_to(&self, other: &Version) -> Result<Ordering> {
        if !self.schema.same_schema(&other.schema) {
            return Err(VersionSchemaError::SchemaMismatch);
        }
        Ok(self.cmp_components(other))
    }

    fn cmp_components(&self, other: &Version) -> Ordering {

        if let Some(ret) = eq_to_none(cmp_numbers(self.numbers(), other.numbers())) {
            return ret;
        }

        let final_component = self.schema.final_version_component();

        // suffix, then extension
        for tier in 1..=2 {
            let left = self.components.get(tier);
            let right = other.components.get(tier);
            if let Some(ret) = eq_to_none(cmp_suffix(left, right, &final_component)) {
                return ret;
            }
        }

        Ordering::Equal
    }
}

fn eq_to_none(v: Ordering) -> Option<Ordering> {
    if matches!(v, Ordering::Equal) {
        return None;
    }
    Some(v)
}

/// missing trailing numbers count as 0
pub(crate) fn cmp_numbers(left: &[u64], right: &[u64]) -> Ordering {
    for pair in left.iter().zip_longest(right.iter()) {
        let (l, r) = match pair {
            EitherOrBoth::Both(l, r) => (*l, *r),
            EitherOrBoth::Left(l) => (*l, 0),
            EitherOrBoth::Right(r) => (0, *r),
        };
        if let Some(ret) = eq_to_none(l.cmp(&r)) {
            return ret;
        }
    }
    Ordering::Equal
}

// a missing suffix is the final suffix
fn cmp_suffix(
    left: Option<&VersionComponentInstance>,
    right: Option<&VersionComponentInstance>,
    final_component: &VersionComponent,
) -> Ordering {

    let left_component = left.and_then(VersionComponentInstance::component).unwrap_or(final_component);
    let right_component = right.and_then(VersionComponentInstance::component).unwrap_or(final_component);

    if let Some(ret) = eq_to_none(left_component.cmp_rank(right_component)) {
        return ret;
    }

    let left_numbers = left.map(VersionComponentInstance::numbers).unwrap_or(&[]);
    let right_numbers = right.map(VersionComponentInstance::numbers).unwrap_or(&[]);
    cmp_numbers(left_numbers, right_numbers)
}

impl PartialEq for Version {
    fn eq(&self, other: &Version) -> bool {
        matches!(self.compare_to(other), Ok(Ordering::Equal))
    }
}

impl PartialOrd for Version {
    /// `None` for versions of different schemas
    fn partial_cmp(&self, other: &Version) -> Option<Ordering> {
        self.compare_to(other).ok()
    }
}

/// separator and text of every component, in order
impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for component in &self.components {
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
