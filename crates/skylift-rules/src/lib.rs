//! skylift-rules - Rule storage for the skylift rewriter
//!
//! Holds the provider-scoped rule registry (pattern -> rewrite rule,
//! concurrent-read-safe) and the loader that populates it from
//! `<rules_dir>/<capability>/<provider>/rules.yaml` files.
//!
//! # Architecture
//!
//! ```text
//! skylift-rules/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── error.rs     # RegistryError, LoaderError
//! ├── registry.rs  # RuleRegistry - RwLock'd pattern map
//! └── loader.rs    # RuleLoader - rules.yaml discovery and decoding
//! ```

mod error;
mod loader;
mod registry;

pub use error::{LoaderError, RegistryError};
pub use loader::RuleLoader;
pub use registry::RuleRegistry;
