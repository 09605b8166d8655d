pub mod config;
pub mod db;
pub mod driver;
pub mod error;
pub mod schema;
pub mod users;

pub use error::{Error, Result};
