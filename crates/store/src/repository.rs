use async_trait::async_trait;

use crate::{EntityId, Owner, Page, PageRequest, Result, Vet};

/// Persistence for clinic owners.
///
/// All implementations must be thread-safe (Send + Sync); handlers share one
/// repository across concurrent requests.
#[async_trait]
pub trait OwnerRepository: Send + Sync {
    /// Loads an owner together with their pets.
    ///
    /// Returns None if no owner has this id.
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Owner>>;

    /// Inserts an unsaved owner or updates an existing one.
    ///
    /// Returns the stored owner with its id populated.
    async fn save(&self, owner: Owner) -> Result<Owner>;

    /// Finds owners whose last name starts with `prefix` (case-sensitive).
    ///
    /// An empty prefix matches every owner. Results are ordered by id.
    async fn find_by_last_name_starting_with(
        &self,
        prefix: &str,
        request: PageRequest,
    ) -> Result<Page<Owner>>;
}

/// Read access to the clinic's veterinarians.
#[async_trait]
pub trait VetRepository: Send + Sync {
    /// Returns every vet with their specialties.
    async fn find_all(&self) -> Result<Vec<Vet>>;
}
