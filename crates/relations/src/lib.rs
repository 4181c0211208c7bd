//! # elif-relations: Has-One-Through Relationships for elif.rs
//!
//! Resolves the keys of a relationship that reaches its related model through
//! an intermediate model (`Mechanic -> Car -> Owner`) and composes the join
//! queries that load it: for one owner, for a batch of owners, or as a sub
//! query embedded in another query.
//!
//! ```ignore
//! let relation = HasOneThrough::new(
//!     "carOwner",
//!     owner_model,
//!     ThroughRelationOptions::new(car_model),
//!     mechanic_model,
//! );
//! let query = relation.query(&PostgresQueryClient::new(), OneOrMany::One(&mechanic))?;
//! let (sql, params) = query.to_sql_with_params();
//! ```
//!
//! Queries are only built here. Executing them and hydrating rows belongs to
//! the caller; [`HasOneThrough::set_related_for_many`] pairs the fetched rows
//! with their owners afterwards.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod naming;
pub mod query;
pub mod relationships;

// Re-export core traits and types
pub use client::*;
pub use config::*;
pub use error::*;
pub use model::*;
pub use naming::*;
pub use query::*;
pub use relationships::*;
