pub mod advisory;
pub mod cli;
pub mod config;
pub mod consistency;
pub mod domain;
pub mod error;
pub mod git;
pub mod lockfile;
pub mod manifest;
pub mod project;
pub mod store;
pub mod ui;
pub mod version_file;

pub use error::{ReleaseError, Result};
