pub mod error;
pub mod ingest;
pub mod source;
pub mod vector_collection;

pub use error::*;
pub use ingest::*;
pub use source::*;
pub use vector_collection::*;
