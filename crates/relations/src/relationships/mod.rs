//! Relationships Module - has-one-through definitions, key resolution and registry

pub mod metadata;
pub mod keys;
pub mod has_one_through;
pub mod registry;

// Re-export main types
pub use metadata::*;
pub use keys::KeyResolver;
pub use has_one_through::*;
pub use registry::RelationRegistry;
