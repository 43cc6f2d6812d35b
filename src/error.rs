use thiserror::Error;

/// Main error type for the schemagen system
#[derive(Error, Debug)]
pub enum SchemaGenError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Generation error for dialect {dialect}: {message}")]
    Generation { dialect: String, message: String },

    #[error("Cleanup error for file {file}: {source}")]
    Cleanup {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Crate-wide result alias
pub type SchemaGenResult<T> = Result<T, SchemaGenError>;

impl SchemaGenError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn generation(dialect: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generation {
            dialect: dialect.into(),
            message: message.into(),
        }
    }

    pub fn cleanup(file: impl Into<String>, source: std::io::Error) -> Self {
        Self::Cleanup {
            file: file.into(),
            source,
        }
    }
}
