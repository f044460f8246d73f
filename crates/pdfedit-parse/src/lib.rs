//! pdfedit-parse: document backend and content stream interpreter.
//!
//! This crate turns PDF pages into positioned text spans and applies the
//! two primitive edits the engine needs: erasing a rectangle and drawing a
//! run of standard-14 text. The [`EditBackend`] trait keeps the engine
//! independent of lopdf; [`LopdfBackend`] is the shipped implementation.

pub mod backend;
pub mod content_edit;
pub mod error;
pub mod fonts;
pub mod interpreter;
pub mod lopdf_backend;
pub mod text_state;
pub mod to_unicode;

pub use backend::{EditBackend, PageSize, TextRun};
pub use error::BackendError;
pub use interpreter::{Interpreter, PageFrame, ShownText};
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
pub use pdfedit_core;
