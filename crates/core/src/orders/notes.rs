//! Order Notes
//!
//! Notes are append-only and kept in two lists, one written by staff and one
//! by the customer.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who a note is addressed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    /// Internal note written by staff.
    Admin,

    /// Note left by or for the customer.
    Customer,
}

impl NoteKind {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteKind {
    type Err = NoteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            other => Err(NoteError::UnknownKind(other.to_string())),
        }
    }
}

/// Errors raised when adding a note.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    /// Note text is blank after trimming.
    #[error("note text is required")]
    EmptyText,

    /// Note type is neither `admin` nor `customer`.
    #[error("unknown note type: {0}")]
    UnknownKind(String),
}

/// A single note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Trimmed note text.
    pub text: String,

    /// Author identifier.
    pub created_by: String,

    /// When the note was written.
    pub created_at: Timestamp,
}

impl Note {
    /// Build a note, trimming `text`.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::EmptyText`] when nothing is left after trimming.
    pub fn new(text: &str, created_by: &str, created_at: Timestamp) -> Result<Self, NoteError> {
        let text = text.trim();

        if text.is_empty() {
            return Err(NoteError::EmptyText);
        }

        Ok(Self {
            text: text.to_string(),
            created_by: created_by.to_string(),
            created_at,
        })
    }
}

/// A note labelled with the list it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedNote {
    /// Origin list.
    #[serde(rename = "type")]
    pub kind: NoteKind,

    /// The note itself.
    #[serde(flatten)]
    pub note: Note,
}

/// Admin and customer notes for one order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteLedger {
    admin: Vec<Note>,
    customer: Vec<Note>,
}

impl NoteLedger {
    /// Rebuild a ledger from stored notes in insertion order.
    #[must_use]
    pub fn from_notes<I>(notes: I) -> Self
    where
        I: IntoIterator<Item = TaggedNote>,
    {
        let mut ledger = Self::default();

        for TaggedNote { kind, note } in notes {
            ledger.list_mut(kind).push(note);
        }

        ledger
    }

    /// Append a note to the list for `kind` and return it.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::EmptyText`] for blank text.
    pub fn append(
        &mut self,
        kind: NoteKind,
        text: &str,
        created_by: &str,
        created_at: Timestamp,
    ) -> Result<Note, NoteError> {
        let note = Note::new(text, created_by, created_at)?;

        self.list_mut(kind).push(note.clone());

        Ok(note)
    }

    /// Staff notes in insertion order.
    #[must_use]
    pub fn admin(&self) -> &[Note] {
        &self.admin
    }

    /// Customer notes in insertion order.
    #[must_use]
    pub fn customer(&self) -> &[Note] {
        &self.customer
    }

    /// Total number of notes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.admin.len() + self.customer.len()
    }

    /// `true` when there are no notes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.admin.is_empty() && self.customer.is_empty()
    }

    /// Both lists merged, newest first.
    ///
    /// Notes sharing a timestamp keep their relative order, admin notes
    /// ahead of customer notes.
    #[must_use]
    pub fn timeline(&self) -> Vec<TaggedNote> {
        let mut notes: Vec<TaggedNote> = self
            .admin
            .iter()
            .map(|note| (NoteKind::Admin, note))
            .chain(self.customer.iter().map(|note| (NoteKind::Customer, note)))
            .map(|(kind, note)| TaggedNote {
                kind,
                note: note.clone(),
            })
            .collect();

        notes.sort_by(|a, b| b.note.created_at.cmp(&a.note.created_at));

        notes
    }

    fn list_mut(&mut self, kind: NoteKind) -> &mut Vec<Note> {
        match kind {
            NoteKind::Admin => &mut self.admin,
            NoteKind::Customer => &mut self.customer,
        }
    }
}
