/// Single-slot undo buffer for destructive text rewrites.
///
/// A snapshot is taken immediately before a rewrite overwrites the draft
/// text; the slot holds at most one snapshot and the latest one wins.
#[derive(Debug, Clone, Default)]
pub struct UndoSlot {
    text: Option<String>,
}

impl UndoSlot {
    /// Stores `text`, replacing any prior snapshot.
    pub fn snapshot(&mut self, text: &str) {
        self.text = Some(text.to_string());
    }

    /// Returns the stored text and clears the slot. `None` means there is
    /// nothing to restore, which is a normal outcome, not an error.
    pub fn restore(&mut self) -> Option<String> {
        self.text.take()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none()
    }
}
