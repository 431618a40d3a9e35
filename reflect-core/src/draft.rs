//! The in-progress edit of a single entry, paired with a snapshot of the
//! last persisted state ("original") for unsaved-change detection.

use crate::entry::Entry;

/// Hard cap on photos per entry; extra submissions are dropped silently.
pub const MAX_PHOTOS: usize = 10;
/// Tags longer than this are truncated on insert.
pub const MAX_TAG_LEN: usize = 30;

/// The client-owned, ephemeral edit state. Never persisted directly;
/// only an explicit save turns it into a stored entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub text: String,
    pub photos: Vec<String>,
    pub tags: Vec<String>,
}

/// A [`Draft`] plus the original snapshot it is compared against.
///
/// Both sides are deep copies: mutating the draft never leaks into the
/// original or into the cached entry it was opened from.
#[derive(Debug, Clone)]
pub struct EditBuffer {
    pub draft: Draft,
    original: Draft,
}

impl EditBuffer {
    /// Opens a buffer for a day, copying the existing entry's fields if
    /// one is present and starting empty otherwise.
    pub fn open(existing: Option<&Entry>) -> Self {
        let draft = match existing {
            Some(entry) => Draft {
                text: entry.text.clone(),
                photos: entry.photos.clone(),
                tags: entry.tags.clone(),
            },
            None => Draft::default(),
        };
        Self {
            original: draft.clone(),
            draft,
        }
    }

    pub fn original(&self) -> &Draft {
        &self.original
    }

    /// True iff the draft differs from the original snapshot.
    ///
    /// `live_text` substitutes for the draft's own text when the rendering
    /// layer holds the authoritative live text. Photo and tag sequences
    /// compare element-wise in order.
    pub fn is_dirty(&self, live_text: Option<&str>) -> bool {
        let text = live_text.unwrap_or(&self.draft.text);
        text != self.original.text
            || self.draft.photos != self.original.photos
            || self.draft.tags != self.original.tags
    }

    /// Appends a trimmed tag, truncated to [`MAX_TAG_LEN`] characters.
    /// Blank input is rejected with no effect. Returns whether a tag was
    /// added.
    pub fn add_tag(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        let capped: String = trimmed.chars().take(MAX_TAG_LEN).collect();
        self.draft.tags.push(capped);
        true
    }

    /// Removes the tag at `index`; out-of-bounds indices are a no-op.
    pub fn remove_tag(&mut self, index: usize) {
        if index < self.draft.tags.len() {
            self.draft.tags.remove(index);
        }
    }

    /// Removes the photo at `index`; out-of-bounds indices are a no-op.
    pub fn remove_photo(&mut self, index: usize) {
        if index < self.draft.photos.len() {
            self.draft.photos.remove(index);
        }
    }

    /// Appends as many photo refs as fit under [`MAX_PHOTOS`], in
    /// submission order, silently dropping the rest. Returns how many
    /// were accepted.
    pub fn add_photos<I>(&mut self, photos: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let remaining = MAX_PHOTOS.saturating_sub(self.draft.photos.len());
        let mut accepted = 0;
        for photo in photos.into_iter().take(remaining) {
            self.draft.photos.push(photo);
            accepted += 1;
        }
        accepted
    }

    /// Called after a successful save: the original becomes a copy of the
    /// just-saved draft, closing the dirty window.
    pub fn commit(&mut self) {
        self.original = self.draft.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with(text: &str, photos: &[&str], tags: &[&str]) -> Entry {
        Entry {
            key: "2025-08-25".to_string(),
            text: text.to_string(),
            photos: photos.iter().map(|p| p.to_string()).collect(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            sentiment: None,
            updated_at: None,
        }
    }

    #[test]
    fn open_is_clean_with_and_without_an_entry() {
        let empty = EditBuffer::open(None);
        assert!(!empty.is_dirty(None));

        let existing = entry_with("hello", &["p1"], &["t1"]);
        let buf = EditBuffer::open(Some(&existing));
        assert!(!buf.is_dirty(None));
        assert_eq!(buf.draft.text, "hello");
    }

    #[test]
    fn open_deep_copies_the_entry() {
        let existing = entry_with("hello", &["p1"], &["t1"]);
        let mut buf = EditBuffer::open(Some(&existing));
        buf.draft.photos.push("p2".to_string());
        buf.add_tag("t2");
        // The source entry and the original snapshot are untouched.
        assert_eq!(existing.photos, vec!["p1"]);
        assert_eq!(buf.original().photos, vec!["p1"]);
        assert_eq!(buf.original().tags, vec!["t1"]);
    }

    #[test]
    fn text_change_makes_the_buffer_dirty() {
        let mut buf = EditBuffer::open(None);
        buf.draft.text = "something".to_string();
        assert!(buf.is_dirty(None));
    }

    #[test]
    fn live_text_override_takes_precedence() {
        let buf = EditBuffer::open(Some(&entry_with("saved", &[], &[])));
        assert!(!buf.is_dirty(None));
        assert!(buf.is_dirty(Some("edited in the view")));
        assert!(!buf.is_dirty(Some("saved")));
    }

    #[test]
    fn photo_and_tag_order_matters_for_dirtiness() {
        let existing = entry_with("t", &["a", "b"], &["x", "y"]);
        let mut buf = EditBuffer::open(Some(&existing));
        buf.draft.photos.swap(0, 1);
        assert!(buf.is_dirty(None));

        let mut buf = EditBuffer::open(Some(&existing));
        buf.draft.tags.swap(0, 1);
        assert!(buf.is_dirty(None));
    }

    #[test]
    fn blank_tag_is_rejected() {
        let mut buf = EditBuffer::open(None);
        assert!(!buf.add_tag("  "));
        assert!(buf.draft.tags.is_empty());
    }

    #[test]
    fn long_tag_is_truncated_to_thirty_chars() {
        let mut buf = EditBuffer::open(None);
        assert!(buf.add_tag(&"a".repeat(50)));
        assert_eq!(buf.draft.tags[0].chars().count(), MAX_TAG_LEN);
    }

    #[test]
    fn tag_is_trimmed_before_capping() {
        let mut buf = EditBuffer::open(None);
        buf.add_tag("  morning walk  ");
        assert_eq!(buf.draft.tags[0], "morning walk");
    }

    #[test]
    fn remove_out_of_bounds_is_a_no_op() {
        let mut buf = EditBuffer::open(Some(&entry_with("t", &["p"], &["x"])));
        buf.remove_tag(5);
        buf.remove_photo(5);
        assert_eq!(buf.draft.tags.len(), 1);
        assert_eq!(buf.draft.photos.len(), 1);
    }

    #[test]
    fn add_photos_respects_the_capacity_cap() {
        let mut buf = EditBuffer::open(None);
        let eight: Vec<String> = (0..8).map(|i| format!("p{i}")).collect();
        assert_eq!(buf.add_photos(eight), 8);

        let five: Vec<String> = (8..13).map(|i| format!("p{i}")).collect();
        assert_eq!(buf.add_photos(five), 2);
        assert_eq!(buf.draft.photos.len(), MAX_PHOTOS);
        // Submission order is preserved.
        assert_eq!(buf.draft.photos[8], "p8");
        assert_eq!(buf.draft.photos[9], "p9");
    }

    #[test]
    fn commit_closes_the_dirty_window() {
        let mut buf = EditBuffer::open(None);
        buf.draft.text = "written".to_string();
        buf.add_tag("tag");
        assert!(buf.is_dirty(None));
        buf.commit();
        assert!(!buf.is_dirty(None));
        assert_eq!(buf.original().text, "written");
    }
}
