pub mod diff;
pub mod schema;
pub mod sync;
