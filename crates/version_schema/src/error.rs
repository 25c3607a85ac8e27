use thiserror::Error;

pub type Result<T> = std::result::Result<T, VersionSchemaError>;

/// Everything that can go wrong while building a schema or using one.
///
/// Configuration problems are only ever reported by [`SchemaBuilder::build`](crate::SchemaBuilder::build)
/// (or the config layer), never by queries against a built schema.
#[derive(Debug, Error)]
pub enum VersionSchemaError {
    /// Invalid builder state: shared variant, missing or duplicate final tag, bad spelling.
    #[error("schema configuration error: {0}")]
    SchemaConfiguration(String),

    /// A spelling or tag name that the schema does not know.
    #[error("unknown suffix: {0:?}")]
    UnknownSuffix(String),

    /// Raw text does not follow the version grammar.
    #[error("malformed version {raw:?} at offset {offset}: expected {expected}, found {found:?}")]
    MalformedVersion {
        raw: String,
        offset: usize,
        expected: &'static str,
        found: String,
    },

    /// An explicitly constructed chain breaks the grammar ordering.
    #[error("invalid component chain at position {position}: {reason}")]
    InvalidComponentChain {
        position: usize,
        reason: &'static str,
    },

    /// The two versions were produced by different schema instances.
    #[error("versions from different schemas cannot be compared")]
    SchemaMismatch,

    #[error("failed to parse schema config")]
    Config(#[from] toml::de::Error),
}
