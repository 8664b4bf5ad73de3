//! UI components for Inkstone

pub mod bookshelf;
pub mod dialogs;
pub mod editor;
pub mod navigation;
