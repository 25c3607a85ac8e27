use serde::{Deserialize, Serialize};

use crate::builder::SchemaBuilder;
use crate::error::Result;
use crate::schema::VersionSchema;

const BUILTIN_SCHEMA_TOML: &str = include_str!("builtin_schema.toml");

/// Suffix vocabulary as written in a config file.
///
/// ```toml
/// [final]
/// variants = ["final", "GA"]
///
/// [[suffix]]
/// name = "Beta"
/// variants = ["b", "beta"]
/// canonical = "beta"   # defaults to name
/// ordering = 2         # defaults to declaration order
/// predecessor = true   # default
/// extensible = true    # default
/// ```
///
/// Parsing only checks the shape of the document, everything else is validated
/// by [`SchemaConfig::build`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(rename = "final")]
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_suffix: Option<FinalToml>,

    #[serde(rename = "suffix")]
    #[serde(default)]
    pub suffixes: Vec<SuffixToml>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinalToml {
    #[serde(default)]
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuffixToml {
    pub name: String,

    #[serde(default)]
    pub variants: Vec<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<i64>,

    #[serde(default = "default_true")]
    pub predecessor: bool,

    #[serde(default = "default_true")]
    pub extensible: bool,
}

fn default_true() -> bool {
    true
}

impl SchemaConfig {

    pub fn from_toml_str(contents: &str) -> Result<SchemaConfig> {
        let config = toml::from_str::<SchemaConfig>(contents)?;
        tracing::debug!(suffixes = config.suffixes.len(), has_final = config.final_suffix.is_some(), "SchemaConfig::from_toml_str");
        Ok(config)
    }

    /// alpha, beta, milestone, rc, SNAPSHOT and final
    pub fn builtin() -> Result<SchemaConfig> {
        Self::from_toml_str(BUILTIN_SCHEMA_TOML)
    }

    /// A builder pre-loaded with this vocabulary, for callers that want to add to it.
    pub fn builder(&self) -> SchemaBuilder {
        let mut builder = SchemaBuilder::new();

        for suffix in &self.suffixes {
            let sb = builder.suffix_builder(&suffix.name);
            for variant in &suffix.variants {
                sb.add_variant(variant.as_str());
            }
            if let Some(canonical) = &suffix.canonical {
                sb.set_canonical_string(canonical.as_str());
            }
            if let Some(ordering) = suffix.ordering {
                sb.set_ordering_index(ordering);
            }
            sb.set_predecessor(suffix.predecessor);
            sb.set_allows_extension(suffix.extensible);
        }

        if let Some(final_suffix) = &self.final_suffix {
            let sb = builder.final_suffix_builder();
            for variant in &final_suffix.variants {
                sb.add_variant(variant.as_str());
            }
        }

        builder
    }

    pub fn build(&self) -> Result<VersionSchema> {
        self.builder().build()
    }
}

impl VersionSchema {
    /// Schema for the built-in vocabulary, see [`SchemaConfig::builtin`].
    pub fn builtin() -> Result<VersionSchema> {
        SchemaConfig::builtin()?.build()
    }
}
