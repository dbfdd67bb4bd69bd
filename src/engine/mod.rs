pub mod drop;
pub mod error;
pub mod sheet;
pub mod store;
