pub mod aggregate;
pub mod albums;
pub mod classify;
pub mod delete;
pub mod list;
pub mod ordering;
pub mod project;
pub mod source;

pub use aggregate::*;
pub use albums::*;
pub use classify::*;
pub use delete::*;
pub use list::*;
pub use ordering::*;
pub use project::*;
pub use source::*;
