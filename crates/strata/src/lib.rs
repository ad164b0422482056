//! Layered configuration resolution for applications with many sources of
//! truth.
//!
//! strata folds up to five configuration sources into one effective
//! configuration object, in fixed precedence order:
//!
//! 1. a base file (JSON or YAML),
//! 2. an environment-specific override file discovered through search paths,
//! 3. environment variables mapped onto configuration fields,
//! 4. a file named on the command line,
//! 5. individual command-line switches mapped onto configuration fields.
//!
//! Nested structures are deep-merged, and string-typed overrides arriving
//! from the environment or the command line are coerced back into the value
//! types declared by the base configuration.
//!
//! ```no_run
//! use strata::{ResolveOptions, Resolver};
//!
//! # async fn example() -> strata::ConfigResult<()> {
//! let options = ResolveOptions {
//!     base_settings_path: Some("config/settings.json".into()),
//!     ..ResolveOptions::default()
//! };
//!
//! let resolution = Resolver::from_process().resolve(options).await?;
//! println!("{}", resolution.config());
//! # Ok(())
//! # }
//! ```

pub mod coerce;
pub mod expr;
pub mod file;
pub mod merge;
pub mod options;
pub mod resolver;

// Re-export main types
pub use coerce::{Coercion, TypeCoercionMap};
pub use merge::MergeOptions;
pub use options::ResolveOptions;
pub use resolver::{resolve, Resolution, Resolver, ENVIRONMENT_VARIABLE};
pub use strata_core::{ConfigFormat, Layer, StrataError};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, strata_core::StrataError>;
