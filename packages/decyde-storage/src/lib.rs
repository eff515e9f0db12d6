pub mod models;
pub mod rest;
pub mod store;

mod error;

pub use error::Error;
pub use store::{BoxFuture, Store};

pub type Result<T, E = Error> = std::result::Result<T, E>;
