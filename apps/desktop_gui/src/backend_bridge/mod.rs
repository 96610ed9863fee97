//! Bridge between the UI thread and the worker that owns the form controller.

pub mod commands;
pub mod runtime;
