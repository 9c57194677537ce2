use super::types::Record;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Empty,
    NonEmpty,
}

/// Append-only list of records for one worksheet session.
///
/// Insertion order is display order and export order. Nothing is ever
/// removed or edited; the whole store is dropped with the session.
#[derive(Debug, Clone)]
pub struct SessionStore<R> {
    records: Vec<R>,
}

impl<R> Default for SessionStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> SessionStore<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Read-only snapshot of every record, oldest first
    pub fn all(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn state(&self) -> StoreState {
        if self.records.is_empty() {
            StoreState::Empty
        } else {
            StoreState::NonEmpty
        }
    }
}

impl<R: Record> SessionStore<R> {
    /// Append a record to the end of the session.
    ///
    /// Records without a coin name (empty or whitespace) are rejected and the
    /// store is left untouched. Duplicate coin names are kept as separate rows.
    pub fn append(&mut self, record: R) -> Result<&R, ValidationError> {
        if record.coin().trim().is_empty() {
            log::debug!("Rejected record with empty coin name");
            return Err(ValidationError::EmptyCoin);
        }

        log::debug!(
            "Appending '{}' as row {}",
            record.coin(),
            self.records.len() + 1
        );
        self.records.push(record);
        // Just pushed, so the last element exists
        Ok(&self.records[self.records.len() - 1])
    }
}
