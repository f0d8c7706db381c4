//! Domain error types.

use common::EntityId;
use store::StoreError;
use thiserror::Error;

/// Errors that abort request handling.
///
/// Validation problems are not errors; they are collected in a
/// [`ValidationOutcome`](crate::ValidationOutcome) and re-render a form.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An id-based owner lookup found nothing.
    #[error("Owner not found with id: {0}")]
    OwnerNotFound(EntityId),

    /// Search pages are numbered from 1.
    #[error("Invalid page number: {0}")]
    InvalidPage(u32),

    /// The store returned an owner without an id after saving or searching.
    #[error("Stored owner has no id")]
    UnsavedOwner,

    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
