//! gatescore-sources: Document providers and configuration.
//!
//! Implements the `DocumentSource` trait for local files, HTTP(S) URLs and
//! PDF answer keys converted with Ghostscript, and loads `gatescore.toml`.

pub mod config;
pub mod error;
pub mod file;
pub mod ghostscript;
pub mod http;
pub mod mock;

pub use config::{create_source, load_config, load_config_from, GatescoreConfig};
pub use error::SourceError;
