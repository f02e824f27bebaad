pub mod core;
pub mod errors;
pub mod facade;
pub mod store;

pub use errors::*;
