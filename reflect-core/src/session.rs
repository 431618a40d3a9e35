//! The editing session controller: one editor at a time, local-first
//! mutations, explicit save/delete through the gateway, and milestone
//! detection on successful saves.

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::entry_key;
use crate::draft::EditBuffer;
use crate::entry::{Entry, MoodCategory};
use crate::gateway::{Gateway, GatewayError, SaveOutcome};
use crate::nudges::NudgeList;
use crate::progress::{ProgressEngine, detect_milestone_crossing};
use crate::undo::UndoSlot;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("an editor is already open")]
    EditorAlreadyOpen,
    #[error("no editor is open")]
    NoEditor,
    #[error("another request for this entry is still in flight")]
    RequestInFlight,
    #[error("nothing to rewrite: the draft text is empty")]
    EmptyDraft,
    #[error("no nudges collected")]
    NoNudges,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Result of a close attempt on a dirty editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The user declined to leave; nothing changed.
    Stayed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation; nothing changed.
    Declined,
}

/// What a successful save produced, reported exactly once per save.
#[derive(Debug, Clone)]
pub struct SaveReport {
    /// True when the server treated the empty save as a delete.
    pub deleted: bool,
    pub mood: Option<MoodCategory>,
    pub encouragement: Option<String>,
    /// The single milestone this save crossed, if any. The caller owns
    /// the celebratory side effect.
    pub milestone: Option<u32>,
}

/// The single live editor. Owns the draft, its original snapshot, the
/// undo slot and the nudge list for the open day.
#[derive(Debug)]
pub struct Editor {
    pub key: String,
    pub date: NaiveDate,
    pub buffer: EditBuffer,
    pub undo: UndoSlot,
    pub nudges: NudgeList,
    /// True while the day has no saved text, so the nudge-collection
    /// flow is offered instead of a blank page.
    pub nudge_mode: bool,
    /// Mood of the last saved version, as reported by the server.
    pub mood: Option<MoodCategory>,
    in_flight: bool,
}

/// Client session: the entry cache, the progress engine and at most one
/// open editor, all mutated through the operations below.
pub struct Session<G: Gateway> {
    gateway: G,
    entries: HashMap<String, Entry>,
    progress: ProgressEngine,
    editor: Option<Editor>,
}

impl<G: Gateway> Session<G> {
    /// Loads the journal and the progress snapshot. Both loads fail
    /// soft: an unreachable server yields a blank journal and default
    /// stats rather than an error.
    pub fn connect(gateway: G) -> Self {
        let entries = gateway.fetch_all();
        let mut progress = ProgressEngine::default();
        if let Ok(snapshot) = gateway.fetch_stats() {
            progress.ingest(snapshot);
        }
        Self {
            gateway,
            entries,
            progress,
            editor: None,
        }
    }

    pub fn entries(&self) -> &HashMap<String, Entry> {
        &self.entries
    }

    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn progress(&self) -> &ProgressEngine {
        &self.progress
    }

    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut Editor> {
        self.editor.as_mut()
    }

    pub fn is_dirty(&self, live_text: Option<&str>) -> bool {
        self.editor
            .as_ref()
            .map_or(false, |ed| ed.buffer.is_dirty(live_text))
    }

    /// Replaces the progress snapshot with a fresh fetch.
    pub fn refresh_progress(&mut self) -> Result<(), GatewayError> {
        let snapshot = self.gateway.fetch_stats()?;
        self.progress.ingest(snapshot);
        Ok(())
    }

    /// Opens an editor for `date`. Valid only while no editor is open.
    ///
    /// The draft starts as a deep copy of the stored entry for that day
    /// (or empty), the undo slot and nudge list are reset, and nudge
    /// mode is entered iff the day has no non-blank saved text.
    pub fn open_editor(&mut self, date: NaiveDate) -> Result<&Editor, SessionError> {
        if self.editor.is_some() {
            return Err(SessionError::EditorAlreadyOpen);
        }
        let key = entry_key(date);
        let existing = self.entries.get(&key);
        let nudge_mode = existing.map_or(true, |entry| !entry.has_text());
        let mood = existing
            .and_then(|entry| entry.sentiment.as_ref())
            .map(|s| s.mood);
        let editor = self.editor.insert(Editor {
            buffer: EditBuffer::open(existing),
            undo: UndoSlot::default(),
            nudges: NudgeList::default(),
            nudge_mode,
            mood,
            in_flight: false,
            key,
            date,
        });
        Ok(&*editor)
    }

    /// Closes the editor. A dirty editor asks `confirm` first; declining
    /// aborts the transition and leaves everything as it was.
    pub fn close_editor(
        &mut self,
        confirm: &mut dyn FnMut(&str) -> bool,
    ) -> Result<CloseOutcome, SessionError> {
        let editor = self.editor.as_ref().ok_or(SessionError::NoEditor)?;
        if editor.buffer.is_dirty(None)
            && !confirm("You have unsaved changes. Leave without saving?")
        {
            return Ok(CloseOutcome::Stayed);
        }
        self.editor = None;
        Ok(CloseOutcome::Closed)
    }

    /// Saves the draft through the gateway.
    ///
    /// The pre-save streak and journaled-today flag are captured before
    /// the request goes out; the milestone comparison is made against
    /// them after the snapshot refresh. On gateway failure the draft and
    /// original are left untouched and the editor stays dirty.
    pub fn save(&mut self, live_text: Option<&str>) -> Result<SaveReport, SessionError> {
        let (key, text, photos, tags) = {
            let editor = self.editor.as_mut().ok_or(SessionError::NoEditor)?;
            if editor.in_flight {
                return Err(SessionError::RequestInFlight);
            }
            if let Some(text) = live_text {
                editor.buffer.draft.text = text.to_string();
            }
            editor.in_flight = true;
            (
                editor.key.clone(),
                editor.buffer.draft.text.clone(),
                editor.buffer.draft.photos.clone(),
                editor.buffer.draft.tags.clone(),
            )
        };
        let prev_streak = self.progress.snapshot().current_streak;
        let was_journaled_today = self.progress.snapshot().journaled_today;

        let result = self.gateway.save(&key, &text, &photos, &tags);

        // Apply only while the same day's editor is still open; a
        // response that outlives its editor is discarded.
        let Some(editor) = self.editor.as_mut().filter(|ed| ed.key == key) else {
            return Err(SessionError::NoEditor);
        };
        editor.in_flight = false;
        let outcome = result?;

        let report = match outcome {
            SaveOutcome::Saved {
                entry,
                encouragement,
            } => {
                editor.buffer.commit();
                editor.mood = entry.sentiment.as_ref().map(|s| s.mood);
                editor.nudge_mode = false;
                let mood = editor.mood;
                self.entries.insert(key, entry);
                SaveReport {
                    deleted: false,
                    mood,
                    encouragement,
                    milestone: None,
                }
            }
            SaveOutcome::Deleted => {
                editor.buffer.commit();
                editor.mood = None;
                self.entries.remove(&key);
                SaveReport {
                    deleted: true,
                    mood: None,
                    encouragement: None,
                    milestone: None,
                }
            }
        };

        // A stale snapshot is acceptable; the save itself succeeded.
        let _ = self.refresh_progress();
        let milestone = detect_milestone_crossing(
            prev_streak,
            self.progress.snapshot().current_streak,
            was_journaled_today,
        );
        Ok(SaveReport { milestone, ..report })
    }

    /// Deletes the stored entry for the open day, after confirmation.
    /// The local cache entry is removed only on confirmed success, and
    /// success closes the editor.
    pub fn delete(
        &mut self,
        confirm: &mut dyn FnMut(&str) -> bool,
    ) -> Result<DeleteOutcome, SessionError> {
        let key = {
            let editor = self.editor.as_mut().ok_or(SessionError::NoEditor)?;
            if editor.in_flight {
                return Err(SessionError::RequestInFlight);
            }
            if !confirm("Delete this entry? This cannot be undone.") {
                return Ok(DeleteOutcome::Declined);
            }
            editor.in_flight = true;
            editor.key.clone()
        };

        let result = self.gateway.delete(&key);

        let Some(editor) = self.editor.as_mut().filter(|ed| ed.key == key) else {
            return Err(SessionError::NoEditor);
        };
        editor.in_flight = false;
        result?;

        self.entries.remove(&key);
        self.editor = None;
        let _ = self.refresh_progress();
        Ok(DeleteOutcome::Deleted)
    }

    /// Rewrites the draft text through the AI service. Refuses blank
    /// text without a network call. The current text is snapshotted into
    /// the undo slot before dispatch, and the snapshot survives failure
    /// so the action is always undoable.
    pub fn rewrite(&mut self, live_text: Option<&str>) -> Result<(), SessionError> {
        let (key, text) = {
            let editor = self.editor.as_mut().ok_or(SessionError::NoEditor)?;
            if let Some(text) = live_text {
                editor.buffer.draft.text = text.to_string();
            }
            if editor.buffer.draft.text.trim().is_empty() {
                return Err(SessionError::EmptyDraft);
            }
            editor.undo.snapshot(&editor.buffer.draft.text);
            (editor.key.clone(), editor.buffer.draft.text.clone())
        };

        let result = self.gateway.rewrite(&text);

        let Some(editor) = self.editor.as_mut().filter(|ed| ed.key == key) else {
            return Err(SessionError::NoEditor);
        };
        let rewritten = result?;
        editor.buffer.draft.text = rewritten;
        Ok(())
    }

    /// Restores the pre-rewrite text if a snapshot exists. Returns
    /// whether anything was restored; an empty slot is a no-op.
    pub fn undo(&mut self) -> bool {
        let Some(editor) = self.editor.as_mut() else {
            return false;
        };
        match editor.undo.restore() {
            Some(text) => {
                editor.buffer.draft.text = text;
                true
            }
            None => false,
        }
    }

    /// Consumes the collected nudges and asks the AI service for a full
    /// entry. On success the draft text is replaced wholesale and nudge
    /// mode ends. On failure the nudges stay consumed: the request
    /// payload already carried them and they are not restored.
    pub fn generate_from_nudges(&mut self) -> Result<(), SessionError> {
        let (key, nudges, date_label) = {
            let editor = self.editor.as_mut().ok_or(SessionError::NoEditor)?;
            if editor.in_flight {
                return Err(SessionError::RequestInFlight);
            }
            if editor.nudges.is_empty() {
                return Err(SessionError::NoNudges);
            }
            editor.in_flight = true;
            let label = editor.date.format("%A, %d %b %Y").to_string();
            (editor.key.clone(), editor.nudges.consume(), label)
        };

        let result = self.gateway.generate_from_nudges(&nudges, &date_label);

        let Some(editor) = self.editor.as_mut().filter(|ed| ed.key == key) else {
            return Err(SessionError::NoEditor);
        };
        editor.in_flight = false;
        let generated = result?;
        editor.buffer.draft.text = generated;
        editor.nudge_mode = false;
        Ok(())
    }

    /// Whole-journal snapshot from the gateway.
    pub fn export(&self) -> Result<serde_json::Value, SessionError> {
        Ok(self.gateway.export()?)
    }

    /// Restores a journal snapshot, then reloads the cache and stats.
    pub fn import(&mut self, payload: &serde_json::Value) -> Result<usize, SessionError> {
        let count = self.gateway.import(payload)?;
        self.entries = self.gateway.fetch_all();
        let _ = self.refresh_progress();
        Ok(count)
    }
}
