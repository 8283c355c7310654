pub mod candidates;
pub mod catalog;
pub mod config;
pub mod document;
mod error;
pub mod fetch;
pub mod filter;
pub mod logging;
pub mod naming;
pub mod page;
pub mod paths;
pub mod store;

pub use error::{FailureKind, HarvestError, Result};
