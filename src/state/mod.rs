/// State management module
///
/// This module holds the UI state of the single screen (screen.rs).
/// Nothing is persisted; state lives until the window closes.

pub mod screen;
