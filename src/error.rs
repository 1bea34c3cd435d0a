//! Error types for configuration collection.
//!
//! Conversion routines report [`ConvertError`], which knows nothing about the
//! environment entry it was fed. The collector attaches the entry name and
//! raw value when it lifts a conversion failure into a [`ConfigError`].

use thiserror::Error;

/// Errors that can occur while collecting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A dict-typed entry contained an element without a `=` separator
    #[error("Malformed mapping in '{key}': element '{element}' has no '=' separator")]
    MalformedMapping { key: String, element: String },

    /// A raw string could not be parsed into the type its default demands
    #[error("Cannot convert '{key}' value '{raw}' to {expected}")]
    TypeCoercion {
        key: String,
        raw: String,
        expected: &'static str,
    },

    /// A caller-supplied converter rejected the value
    #[error("Conversion of '{key}' failed: {message}")]
    Conversion { key: String, message: String },

    /// A definition module could not be read
    #[error("Failed to load configuration module '{name}': {source}")]
    ModuleLoad {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A definition module was read but is not valid TOML
    #[error("Failed to parse configuration module '{name}': {source}")]
    ModuleParse {
        name: String,
        #[source]
        source: toml::de::Error,
    },

    /// A spec that can never be executed
    #[error("Invalid spec: {0}")]
    InvalidSpec(String),

    /// Failed to render the collected mapping
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
}

impl ConfigError {
    /// Create an invalid spec error
    pub fn invalid_spec<M: Into<String>>(message: M) -> Self {
        Self::InvalidSpec(message.into())
    }

    /// Attach the environment entry name to a conversion failure.
    pub fn from_convert<K: Into<String>>(key: K, err: ConvertError) -> Self {
        let key = key.into();
        match err {
            ConvertError::Invalid { raw, expected } => Self::TypeCoercion { key, raw, expected },
            ConvertError::MissingSeparator(element) => Self::MalformedMapping { key, element },
            ConvertError::Custom(message) => Self::Conversion { key, message },
        }
    }

    /// Whether this error means the source could not be found or read at all.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::ModuleLoad { .. })
    }
}

/// Failure of a single string-to-value conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The raw string does not parse as the forced type
    #[error("'{raw}' is not a valid {expected}")]
    Invalid { raw: String, expected: &'static str },

    /// A mapping element without `=`
    #[error("element '{0}' has no '=' separator")]
    MissingSeparator(String),

    /// Reported by a caller-supplied converter
    #[error("{0}")]
    Custom(String),
}

impl ConvertError {
    pub fn invalid(raw: impl Into<String>, expected: &'static str) -> Self {
        Self::Invalid {
            raw: raw.into(),
            expected,
        }
    }

    /// Create a converter-specific error from a message.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::from_convert("PORT", ConvertError::invalid("abc", "integer"));
        assert_eq!(err.to_string(), "Cannot convert 'PORT' value 'abc' to integer");

        let err = ConfigError::from_convert("OPTS", ConvertError::MissingSeparator("bad".into()));
        assert_eq!(
            err.to_string(),
            "Malformed mapping in 'OPTS': element 'bad' has no '=' separator"
        );

        let err = ConfigError::invalid_spec("empty read key");
        assert_eq!(err.to_string(), "Invalid spec: empty read key");
    }

    #[test]
    fn test_custom_error_keeps_message() {
        let err = ConfigError::from_convert("URL", ConvertError::custom("missing scheme"));
        assert!(matches!(
            err,
            ConfigError::Conversion { ref key, ref message } if key == "URL" && message == "missing scheme"
        ));
    }

    #[test]
    fn test_load_failure_classification() {
        let err = ConfigError::ModuleLoad {
            name: "settings.toml".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.is_load_failure());
        assert!(!ConfigError::invalid_spec("x").is_load_failure());
    }
}
