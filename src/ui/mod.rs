//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch
//! - `helpers` - Fetch spawning and shared formatting
//! - `header` - Title bar, category tabs, search/summary line
//! - `articles` - Article list and loading/error/empty placeholders
//! - `pagination` - Page-number control
//! - `reader` - Single-article reader
//! - `status` - Status bar
//! - `help` - Keybinding overlay

mod articles;
mod events;
mod header;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod pagination;
mod reader;
mod render;
mod status;

pub use loop_runner::{run, Action};
