pub mod admin;
pub mod constants;
pub mod earnings;
pub mod errors;
pub mod members;
pub mod money;
pub mod rank;

pub use errors::{Error, Result, ValidationError};
