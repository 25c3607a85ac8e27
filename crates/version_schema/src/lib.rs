// version schema
//
// Parse and order version strings under a configurable suffix vocabulary.
//
// --- Vocabulary ---
//
// A schema knows a set of suffix tags. Each tag has
//  - a name, used to look the tag up from code          example: "Beta"
//  - spelling variants, matched case-insensitively      example: "b", "beta"
//  - a canonical spelling                               example: "beta"
//  - an ordering index among the pre-release tags       example: 2
//  - whether one more suffix may follow it              example: beta-SNAPSHOT
//
// Exactly one tag is the final (release) tag. Its canonical spelling is "" and
// it sorts after every pre-release tag.
//
// --- General Form ---
//
// numbers                              example: 1.0.3
// numbers sep suffix                   example: 1.0-beta, 1.0.RC1, 1.0alpha2
// numbers sep suffix sep extension     example: 2.0-beta-SNAPSHOT
//
// --- Grammar ---
//
// <version>     = <numbers>
//               | <numbers> <suffix>
//               | <numbers> <suffix> <extension>
//
// <numbers>     = <digits> | <digits> "." <numbers>
//
// <suffix>      = <sep> <tag> | <sep> <tag> <tag_number>
// <extension>   = <suffix>      (only if the first tag allows extension)
//
// <tag_number>  = <numbers> | "-" <numbers> | "." <numbers>
//
// <sep>         = "" | "-" | "."
//
// <tag>         = one or more alphabetic characters matching a known variant
//
// A tag is the whole run of letters when the run is a known spelling. If it
// is not, and an extension may still follow, the tag is the longest known
// spelling the run starts with (whose tag allows extension) and the rest of
// the run is the extension:
//
//     2.0-betaSNAPSHOT   ->   2.0 | -beta | SNAPSHOT
//
// Ordering rules are listed in version.rs.

mod builder;
mod component;
mod config;
mod error;
mod scanner;
mod schema;
mod suffix;
mod version;

pub use builder::SchemaBuilder;
pub use component::{ComponentKind, Separator, VersionComponent, VersionComponentInstance};
pub use config::{FinalToml, SchemaConfig, SuffixToml};
pub use error::{Result, VersionSchemaError};
pub use scanner::VersionComponentScanner;
pub use schema::{VersionSchema, DEFAULT_FINAL_SUFFIX};
pub use suffix::{SuffixBuilder, SuffixDefinition, FINAL_SUFFIX_NAME};
pub use version::Version;
