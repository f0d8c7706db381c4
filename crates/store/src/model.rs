//! Clinic entities as they are persisted.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::EntityId;

/// An entity identified by id and a display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub id: Option<EntityId>,
    pub name: Option<String>,
}

impl NamedEntity {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }
}

impl std::fmt::Display for NamedEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => f.write_str("<null>"),
        }
    }
}

/// Kind of animal, e.g. "cat" or "dog".
pub type PetType = NamedEntity;

/// Veterinary specialty, e.g. "radiology".
pub type Specialty = NamedEntity;

/// A visit of a pet to the clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub id: Option<EntityId>,
    pub date: NaiveDate,
    pub description: String,
}

impl Visit {
    /// Creates an unsaved visit dated today.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: None,
            date: Utc::now().date_naive(),
            description: description.into(),
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

/// A pet belonging to an owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Option<EntityId>,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub pet_type: Option<PetType>,
    pub visits: Vec<Visit>,
}

impl Pet {
    /// Creates an unsaved pet.
    pub fn new(name: impl Into<String>, birth_date: NaiveDate, pet_type: PetType) -> Self {
        Self {
            id: None,
            name: name.into(),
            birth_date: Some(birth_date),
            pet_type: Some(pet_type),
            visits: Vec::new(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn add_visit(&mut self, visit: Visit) {
        self.visits.push(visit);
    }
}

/// A clinic customer.
///
/// `id` stays `None` until the repository assigns it on first save and is
/// never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: Option<EntityId>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
    pub pets: Vec<Pet>,
}

impl Owner {
    /// Creates a blank, unsaved owner.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Attaches a pet. Pets that already carry an id belong elsewhere and are ignored.
    pub fn add_pet(&mut self, pet: Pet) {
        if pet.is_new() {
            self.pets.push(pet);
        }
    }

    /// Looks up a pet by name, ignoring case.
    ///
    /// With `ignore_new` set, pets that have not been saved yet are skipped.
    pub fn pet(&self, name: &str, ignore_new: bool) -> Option<&Pet> {
        self.pets
            .iter()
            .filter(|pet| !ignore_new || !pet.is_new())
            .find(|pet| pet.name.eq_ignore_ascii_case(name))
    }

    pub fn pet_by_id(&self, id: EntityId) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id == Some(id))
    }
}

/// A veterinarian.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vet {
    pub id: Option<EntityId>,
    pub first_name: String,
    pub last_name: String,
    specialties: Vec<Specialty>,
}

impl Vet {
    pub fn new(id: impl Into<EntityId>, first_name: &str, last_name: &str) -> Self {
        Self {
            id: Some(id.into()),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            specialties: Vec::new(),
        }
    }

    /// Adds a specialty, keeping the list sorted by name.
    pub fn add_specialty(&mut self, specialty: Specialty) {
        if self.specialties.contains(&specialty) {
            return;
        }
        self.specialties.push(specialty);
        self.specialties.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn specialties(&self) -> &[Specialty] {
        &self.specialties
    }

    pub fn nr_of_specialties(&self) -> usize {
        self.specialties.len()
    }
}
