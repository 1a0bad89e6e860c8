pub mod config;
pub mod error;
pub mod models;
pub mod utils;
pub mod storage;
pub mod extract;
pub mod search;
pub mod pipeline;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{IndexError, Result};
