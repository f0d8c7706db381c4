//! Data access for the clinic: entities, repository traits and backends.

pub mod error;
pub mod memory;
pub mod model;
pub mod page;
pub mod postgres;
pub mod repository;

pub use common::EntityId;
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use model::{NamedEntity, Owner, Pet, PetType, Specialty, Vet, Visit};
pub use page::{Page, PageRequest};
pub use postgres::PostgresStore;
pub use repository::{OwnerRepository, VetRepository};
