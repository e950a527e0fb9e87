//! palabras-core — data model, runners, judging and summaries.
//!
//! This crate holds everything the palabras pipeline does apart from talking
//! HTTP: loading a suite, generating responses, grading them with a judge
//! model and tallying the results.

pub mod completion;
pub mod engine;
pub mod error;
pub mod judge;
pub mod loader;
pub mod model;
pub mod store;
pub mod summary;
pub mod template;
pub mod traits;
