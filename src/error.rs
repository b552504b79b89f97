//! Error taxonomy of the shell core. Every variant is recovered locally by
//! the router or the section that raised it; none of them ends the session.

use thiserror::Error;

use crate::sections::SectionName;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShellError {
    /// A navigation request named a section that does not exist.
    #[error("Section not found: {0}")]
    InvalidSection(String),

    /// The view host has no container for a known section.
    #[error("Section element not found: {}", .0.container_id())]
    MissingContainer(SectionName),

    /// A song, schedule or article lookup found nothing.
    #[error("{kind} not found: {key}")]
    LookupMiss { kind: &'static str, key: String },

    /// One share mechanism failed. The share chain moves on to the next one.
    #[error("{mechanism} failed: {reason}")]
    ClipboardFailure {
        mechanism: &'static str,
        reason: String,
    },

    #[error("Song title \"{0}\" is used by more than one song")]
    DuplicateSongTitle(String),

    #[error("Schedule for {minister} on {date} has no colours")]
    EmptyColorList { minister: String, date: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unknown service slot: {0}")]
    UnknownSlot(String),

    #[error("Invalid location \"{url}\": {reason}")]
    InvalidLocation { url: String, reason: String },
}

impl ShellError {
    pub(crate) fn lookup_miss(kind: &'static str, key: impl Into<String>) -> Self {
        ShellError::LookupMiss {
            kind,
            key: key.into(),
        }
    }
}
