//! Inkstone - volume/chapter based long-form writing editor
//!
//! The [`core`] module holds the project model, chapter storage and the find
//! engine; [`app`] and [`ui`] are the egui desktop shell on top of it.

pub mod app;
pub mod core;
pub mod ui;
