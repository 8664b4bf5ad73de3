//! Core functionality: project structure, chapter content, find, and configuration

pub mod autosave;
pub mod config;
pub mod content;
pub mod error;
pub mod find;
pub mod library;
pub mod numbering;
pub mod plain_text;
pub mod project;
pub mod stats;
pub mod structure;

pub use error::{ProjectError, Result};
