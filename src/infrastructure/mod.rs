pub mod sqlite_index;

pub use sqlite_index::*;
