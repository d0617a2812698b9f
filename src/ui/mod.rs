//! User interface for the command line.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for writing to the terminal
//! - [`MockUI`] for capturing output in tests
//!
//! # Example
//!
//! ```
//! use trellis::ui::{MockUI, OutputMode, UserInterface};
//!
//! let mut ui = MockUI::with_mode(OutputMode::Quiet);
//! ui.message("Resolving templates");
//! ui.output("index.php\n");
//! assert!(ui.messages().is_empty());
//! assert_eq!(ui.outputs(), ["index.php\n"]);
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, TrellisTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Shown in every output mode.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Write command output (a document, JSON) verbatim.
    ///
    /// Unlike status messages this is never suppressed by the output mode.
    fn output(&mut self, data: &str);

    /// Whether the UI is attached to a terminal.
    fn is_interactive(&self) -> bool;
}
