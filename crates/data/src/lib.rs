//! Loading of race configuration and static text assets.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
