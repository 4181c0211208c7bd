//! Model descriptors, lazy model references and the row contract

pub mod descriptor;
pub mod row;

pub use descriptor::{ModelDescriptor, ModelRef};
pub use row::{ModelRow, Record, RelatedHolder, RelatedValue};
