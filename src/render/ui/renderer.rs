//! Drawing seam between the event loop and a concrete surface.

use crate::error::Result;
use crate::render::ui::state::ChatView;

/// A surface the conversation can be painted on.
///
/// The event loop calls `initialize` once, `render` after every change that affects what is
/// visible, and `cleanup` on the way out, including when the loop fails.
pub trait UIRenderer {
    /// Paint the bubbles in view, their typing cursors and the status line.
    fn render(&mut self, view: &ChatView) -> Result<()>;

    fn initialize(&mut self) -> Result<()>;

    /// Give the terminal back to the shell.
    fn cleanup(&mut self) -> Result<()>;

    /// `(columns, rows)` available to the view.
    fn get_terminal_size(&self) -> Result<(u16, u16)>;
}
