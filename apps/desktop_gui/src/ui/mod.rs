//! UI layer: the customer form window and its widgets.

pub mod app;
pub mod widgets;

pub use app::{CustomerDeskApp, StartupConfig};
