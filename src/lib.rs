//! Confcollect Library
//!
//! Collects runtime configuration from definition sources and the process
//! environment, converting environment strings back into the types implied
//! by existing defaults.
//!
//! # Modules
//!
//! - `value`: Typed configuration values and the `DefaultKind` dispatch
//! - `convert`: Scalar, list and `key=value` mapping conversion
//! - `path`: Nested write locations and the path writer
//! - `spec`: Declarative read/convert/write rules
//! - `infer`: Spec inference from a defaults mapping
//! - `collector`: Orchestration (`from_environ`)
//! - `source`: Definition and environment sources (`from_module`)
//! - `error`: Unified error handling
//!
//! # Example
//!
//! ```rust
//! use confcollect::{from_environ, Environ, Mapping, Value};
//!
//! let mut defaults = Mapping::new();
//! defaults.insert("debug".into(), Value::Bool(false));
//! defaults.insert("workers".into(), Value::Int(1));
//!
//! let mut environment = Environ::new();
//! environment.insert("DEBUG".into(), "on".into());
//!
//! let config = from_environ(&environment, &[], &defaults, false).unwrap();
//! assert_eq!(config["debug"], Value::Bool(true));
//! assert_eq!(config["workers"], Value::Int(1));
//! ```

pub mod collector;
pub mod convert;
pub mod error;
pub mod infer;
pub mod path;
pub mod source;
pub mod spec;
pub mod value;

// Re-export commonly used types for convenience
pub use collector::{from_environ, CollectOptions, Collector};
pub use convert::{convert_as, convert_scalar, convert_with_default, parse_mapping, parse_sequence};
pub use error::{ConfigError, ConfigResult, ConvertError};
pub use infer::infer_specs;
pub use path::{read_path, write_path, Path};
pub use source::{from_module, ConfigSource, EnvSource, Environ, ModuleSource, PairsSource};
pub use spec::{Converter, Spec, SpecOrigin};
pub use value::{DefaultKind, Mapping, ScalarType, Value};
