pub mod batch;
pub mod repo;
mod repo_types;
pub mod services;

pub use repo_types::User;
