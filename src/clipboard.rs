//! System clipboard helper.

use copypasta::{ClipboardContext, ClipboardProvider};

/// Copy text to the system clipboard. Returns false when no clipboard is
/// available (headless session, missing display server).
pub fn copy_to_clipboard(text: &str) -> bool {
    match ClipboardContext::new() {
        Ok(mut ctx) => ctx.set_contents(text.to_string()).is_ok(),
        Err(e) => {
            log::warn!("[clipboard] unavailable: {e}");
            false
        }
    }
}
