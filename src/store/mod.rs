//! Narrow interfaces over the two external stores.
//!
//! `SchedulingStore` is backed by a Google Sheet and `KnowledgeStore` by a
//! Supabase project. Both are shared immutable handles; every call goes to
//! the remote service and no slot state is cached in-process.

mod google_auth;
mod sheets;
mod supabase;

pub use google_auth::ServiceAccountAuth;
pub use sheets::GoogleSheetsStore;
pub use supabase::SupabaseKnowledgeStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    AvailabilitySlot, KnowledgeDocument, KnowledgeMatch, QaPair, SlotIdentifier, SlotRecord,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Slot not found")]
    NotFound,
    #[error("Slot is already booked")]
    Conflict,
    #[error("Store request failed (status {status}): {message}")]
    Http { status: u16, message: String },
    #[error("Store authentication failed: {0}")]
    Auth(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected store response: {0}")]
    Malformed(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait SchedulingStore: Send + Sync {
    /// Current contents of the schedule, in store order.
    async fn list_slots(&self) -> StoreResult<Vec<SlotRecord>>;

    /// Writes the booking only if the slot is still free at read time.
    ///
    /// The read and the write are separate calls; a concurrent booking that
    /// lands between them is not detected.
    async fn book_if_free(
        &self,
        slot: &SlotIdentifier,
        student_name: &str,
        contact_info: &str,
    ) -> StoreResult<()>;

    async fn append_slot(&self, slot: &SlotIdentifier) -> StoreResult<()>;

    /// Appends every slot in one request and returns how many were written.
    async fn append_slots(&self, slots: &[SlotIdentifier]) -> StoreResult<usize>;

    async fn find_available(&self, date: &str, subject: &str) -> StoreResult<Vec<AvailabilitySlot>> {
        let slots = self.list_slots().await?;
        Ok(slots
            .iter()
            .filter(|record| record.is_open_for(date, subject))
            .map(AvailabilitySlot::from)
            .collect())
    }
}

#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Nearest stored documents with similarity at or above `threshold`.
    async fn match_documents(
        &self,
        embedding: &[f32],
        threshold: f32,
        count: usize,
    ) -> StoreResult<Vec<KnowledgeMatch>>;

    async fn list_qa_pairs(&self) -> StoreResult<Vec<QaPair>>;

    /// Removes every indexed document.
    async fn clear_documents(&self) -> StoreResult<()>;

    async fn insert_document(&self, document: &KnowledgeDocument) -> StoreResult<()>;
}

/// First row matching `slot` that is still open.
///
/// Duplicate rows for the same slot are allowed; a booked copy never hides
/// a free one. `Conflict` only when every matching row is booked.
pub fn locate_bookable<'a>(records: &'a [SlotRecord], slot: &SlotIdentifier) -> StoreResult<&'a SlotRecord> {
    let mut matching = records.iter().filter(|record| record.slot.matches(slot)).peekable();
    if matching.peek().is_none() {
        return Err(StoreError::NotFound);
    }
    matching.find(|record| record.is_available()).ok_or(StoreError::Conflict)
}

/// Reads a non-2xx response into a `StoreError::Http`.
pub(crate) async fn error_for_status(response: reqwest::Response) -> StoreResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(StoreError::Http { status, message })
}
