//! Layered configuration resolution.
//!
//! A [`Registry`] holds named layers in priority order. Reads walk the layers
//! front to back and return the first hit; writes go to the first layer that
//! accepts them. Layers are anything implementing [`Layer`]: an in-memory
//! [`DictLayer`], an [`EnvLayer`] over environment variables, or a
//! [`FileLayer`] over JSON, TOML or INI documents.
//!
//! ```
//! use strata_config::{DictLayer, KeyStrategy, Registry, Value};
//!
//! let mut registry = Registry::new();
//! registry
//!     .add_layer(
//!         DictLayer::empty("overrides")
//!             .with_strategy(KeyStrategy::Hierarchical)
//!             .unwrap()
//!             .with_mutable(true),
//!     )
//!     .unwrap();
//! registry
//!     .add_layer(DictLayer::new("defaults", [("db.port", 5432)]))
//!     .unwrap();
//!
//! registry.set("db.port", 6543).unwrap();
//! assert_eq!(registry.resolve("db.port").unwrap(), Value::from(6543));
//! ```

pub mod constants;
mod error;
pub mod layer;
pub mod registry;
pub mod value;

pub use error::{ConfigError, Result};
pub use layer::{
    DictLayer, EnvLayer, FileFormat, FileLayer, KeyStrategy, Layer, LayerWrite, load_dotenv,
};
pub use registry::{DuplicatePolicy, IndexOrder, Lookup, Registry};
pub use value::{Mapping, Value};
