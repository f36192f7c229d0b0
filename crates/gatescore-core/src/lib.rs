//! gatescore-core: Answer-key parsing, response extraction and marking.
//!
//! This crate defines the data model, the two document parsers and the
//! marking engine that the rest of gatescore builds on.

pub mod answer_key;
pub mod engine;
pub mod error;
pub mod layout;
pub mod model;
pub mod options;
pub mod report;
pub mod response;
pub mod scoring;
pub mod statistics;
pub mod traits;

#[cfg(test)]
mod test_support;
