pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod startup;
pub mod sync;
pub mod utils;
pub mod views;

pub use error::ClientError;
pub use startup::Workspace;
