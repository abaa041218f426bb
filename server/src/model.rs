//! Todo domain types shared by the store, service and HTTP layers.
//!
//! # Design
//! `TodoId` is a positive integer assigned by the store at insert time and
//! never reused. The HTTP layer only ever sees it through `FromStr`, so a
//! malformed path segment is rejected before any store round trip.

use std::{fmt, num::NonZeroU64, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned identifier of a todo item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(NonZeroU64);

impl TodoId {
    /// Returns `None` for zero, which no store ever assigns.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid todo id '{0}'")]
pub struct ParseTodoIdError(pub String);

impl FromStr for TodoId {
    type Err = ParseTodoIdError;

    /// Accepts plain decimal digits only: no sign, no whitespace, no zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseTodoIdError(s.to_string()));
        }
        s.parse::<u64>()
            .ok()
            .and_then(TodoId::new)
            .ok_or_else(|| ParseTodoIdError(s.to_string()))
    }
}

/// A single todo item as stored and as returned by the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub body: String,
    pub completed: bool,
}

/// A validated item that has not been persisted yet. The store assigns the id
/// and always starts it out as not completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTodo {
    pub body: String,
}

/// Partial field update applied by `TodoStore::update_fields`. `None` leaves
/// the stored field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn completed(value: bool) -> Self {
        Self {
            completed: Some(value),
        }
    }
}
