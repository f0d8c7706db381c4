use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::{
    EntityId, NamedEntity, Owner, Page, PageRequest, Pet, Result, StoreError, Vet, Visit,
    repository::{OwnerRepository, VetRepository},
};

#[derive(Default)]
struct State {
    owners: BTreeMap<EntityId, Owner>,
    vets: Vec<Vet>,
    last_owner_id: i32,
    last_pet_id: i32,
}

impl State {
    fn assign_pet_ids(&mut self, owner: &mut Owner) {
        for pet in owner.pets.iter_mut().filter(|pet| pet.is_new()) {
            self.last_pet_id += 1;
            pet.id = Some(EntityId::new(self.last_pet_id));
        }
    }
}

/// In-memory clinic store.
///
/// Provides the same interface as the PostgreSQL implementation. Owner ids
/// are assigned sequentially starting at 1.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the sample clinic owners, pets and vets.
    pub fn with_demo_data() -> Self {
        let mut state = State::default();

        for mut owner in demo_owners() {
            state.last_owner_id += 1;
            owner.id = Some(EntityId::new(state.last_owner_id));
            state.assign_pet_ids(&mut owner);
            if let Some(id) = owner.id {
                state.owners.insert(id, owner);
            }
        }
        state.vets = demo_vets();

        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Returns the number of stored owners.
    pub async fn owner_count(&self) -> usize {
        self.state.read().await.owners.len()
    }

    /// Registers a vet.
    pub async fn add_vet(&self, vet: Vet) {
        self.state.write().await.vets.push(vet);
    }

    /// Removes all owners and vets.
    pub async fn clear(&self) {
        *self.state.write().await = State::default();
    }
}

#[async_trait]
impl OwnerRepository for InMemoryStore {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Owner>> {
        Ok(self.state.read().await.owners.get(&id).cloned())
    }

    async fn save(&self, mut owner: Owner) -> Result<Owner> {
        let mut state = self.state.write().await;

        let id = match owner.id {
            Some(id) if !state.owners.contains_key(&id) => {
                return Err(StoreError::MissingOwner(id));
            }
            Some(id) => id,
            None => {
                state.last_owner_id += 1;
                EntityId::new(state.last_owner_id)
            }
        };

        owner.id = Some(id);
        state.assign_pet_ids(&mut owner);
        state.owners.insert(id, owner.clone());

        tracing::debug!(owner_id = %id, "owner stored");
        Ok(owner)
    }

    async fn find_by_last_name_starting_with(
        &self,
        prefix: &str,
        request: PageRequest,
    ) -> Result<Page<Owner>> {
        let state = self.state.read().await;

        // BTreeMap iteration keeps results ordered by id.
        let matches: Vec<&Owner> = state
            .owners
            .values()
            .filter(|owner| owner.last_name.starts_with(prefix))
            .collect();

        let total = matches.len() as u64;
        let content = matches
            .into_iter()
            .skip(request.offset())
            .take(request.size())
            .cloned()
            .collect();

        Ok(Page::new(content, request, total))
    }
}

#[async_trait]
impl VetRepository for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Vet>> {
        Ok(self.state.read().await.vets.clone())
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn demo_owners() -> Vec<Owner> {
    let cat = NamedEntity::new(1, "cat");
    let dog = NamedEntity::new(2, "dog");
    let lizard = NamedEntity::new(3, "lizard");
    let snake = NamedEntity::new(4, "snake");
    let bird = NamedEntity::new(5, "bird");
    let hamster = NamedEntity::new(6, "hamster");

    let owner = |first: &str, last: &str, address: &str, city: &str, telephone: &str| Owner {
        id: None,
        first_name: first.to_string(),
        last_name: last.to_string(),
        address: address.to_string(),
        city: city.to_string(),
        telephone: telephone.to_string(),
        pets: Vec::new(),
    };

    let mut george = owner("George", "Franklin", "110 W. Liberty St.", "Madison", "6085551023");
    george.add_pet(Pet::new("Leo", date(2010, 9, 7), cat.clone()));

    let mut betty = owner("Betty", "Davis", "638 Cardinal Ave.", "Sun Prairie", "6085551749");
    betty.add_pet(Pet::new("Basil", date(2012, 8, 6), hamster));

    let mut eduardo = owner("Eduardo", "Rodriquez", "2693 Commerce St.", "McFarland", "6085558763");
    eduardo.add_pet(Pet::new("Rosy", date(2011, 4, 17), dog.clone()));
    eduardo.add_pet(Pet::new("Jewel", date(2010, 3, 7), dog.clone()));

    let mut harold = owner("Harold", "Davis", "563 Friendly St.", "Windsor", "6085553198");
    harold.add_pet(Pet::new("Iggy", date(2010, 11, 30), lizard));

    let mut peter = owner("Peter", "McTavish", "2387 S. Fair Way", "Madison", "6085552765");
    peter.add_pet(Pet::new("George", date(2010, 1, 20), snake));

    let mut jean = owner("Jean", "Coleman", "105 N. Lake St.", "Monona", "6085552654");
    let mut samantha = Pet::new("Samantha", date(2012, 9, 4), cat.clone());
    samantha.add_visit(Visit::new("rabies shot").on(date(2013, 1, 1)));
    samantha.add_visit(Visit::new("spayed").on(date(2013, 1, 4)));
    let mut max = Pet::new("Max", date(2012, 9, 4), cat.clone());
    max.add_visit(Visit::new("rabies shot").on(date(2013, 1, 2)));
    max.add_visit(Visit::new("neutered").on(date(2013, 1, 3)));
    jean.add_pet(samantha);
    jean.add_pet(max);

    let mut jeff = owner("Jeff", "Black", "1450 Oak Blvd.", "Monona", "6085555387");
    jeff.add_pet(Pet::new("Lucky", date(2011, 8, 6), bird.clone()));

    let mut maria = owner("Maria", "Escobito", "345 Maple St.", "Madison", "6085557683");
    maria.add_pet(Pet::new("Mulligan", date(2007, 2, 24), dog.clone()));

    let mut david = owner("David", "Schroeder", "2749 Blackhawk Trail", "Madison", "6085559435");
    david.add_pet(Pet::new("Freddy", date(2010, 3, 9), bird));

    let mut carlos = owner("Carlos", "Estaban", "2335 Independence La.", "Waunakee", "6085555487");
    carlos.add_pet(Pet::new("Lucky", date(2010, 6, 24), dog));
    carlos.add_pet(Pet::new("Sly", date(2012, 6, 8), cat));

    vec![
        george, betty, eduardo, harold, peter, jean, jeff, maria, david, carlos,
    ]
}

fn demo_vets() -> Vec<Vet> {
    let radiology = NamedEntity::new(1, "radiology");
    let surgery = NamedEntity::new(2, "surgery");
    let dentistry = NamedEntity::new(3, "dentistry");

    let mut leary = Vet::new(2, "Helen", "Leary");
    leary.add_specialty(radiology.clone());
    let mut douglas = Vet::new(3, "Linda", "Douglas");
    douglas.add_specialty(surgery.clone());
    douglas.add_specialty(dentistry);
    let mut ortega = Vet::new(4, "Rafael", "Ortega");
    ortega.add_specialty(surgery);
    let mut stevens = Vet::new(5, "Henry", "Stevens");
    stevens.add_specialty(radiology);

    vec![
        Vet::new(1, "James", "Carter"),
        leary,
        douglas,
        ortega,
        stevens,
        Vet::new(6, "Sharon", "Jenkins"),
    ]
}
