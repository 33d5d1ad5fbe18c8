pub mod entropy_coding;
pub mod error;
pub mod helpers;
pub mod history;
pub mod models;
pub mod runner;

pub use error::{Error, Result};
