/// Cap on nudges per generation request; the server rejects more.
pub const MAX_NUDGES: usize = 20;

/// Ordered list of short free-text notes collected before a full entry
/// exists. Consumed atomically to build a generation request.
#[derive(Debug, Clone, Default)]
pub struct NudgeList {
    items: Vec<String>,
}

impl NudgeList {
    /// Appends trimmed non-empty text. Blank input and input past
    /// [`MAX_NUDGES`] are absorbed silently. Returns whether the nudge
    /// was added.
    pub fn add(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() || self.items.len() >= MAX_NUDGES {
            return false;
        }
        self.items.push(trimmed.to_string());
        true
    }

    /// Removes the nudge at `index`; out-of-bounds indices are a no-op.
    pub fn remove(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    /// Returns the full ordered sequence and resets the list to empty.
    pub fn consume(&mut self) -> Vec<String> {
        std::mem::take(&mut self.items)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
