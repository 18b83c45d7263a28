pub mod config;
pub mod errors;
pub mod query;
pub mod rest;
pub mod util;

pub use errors::AppError;
pub use query::*;
pub use rest::*;
