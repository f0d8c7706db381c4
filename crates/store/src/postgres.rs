use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    EntityId, NamedEntity, Owner, Page, PageRequest, Pet, Result, StoreError, Vet, Visit,
    repository::{OwnerRepository, VetRepository},
};

/// PostgreSQL-backed clinic store.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a pool to `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the schema and seed migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_owner(row: &PgRow) -> Result<Owner> {
        Ok(Owner {
            id: Some(EntityId::new(row.try_get("id")?)),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            telephone: row.try_get("telephone")?,
            pets: Vec::new(),
        })
    }

    /// Loads the pets (with type and visits) of every owner in `owner_ids`.
    async fn load_pets(&self, owner_ids: &[i32]) -> Result<HashMap<i32, Vec<Pet>>> {
        if owner_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let pet_rows = sqlx::query(
            r#"
            SELECT p.id, p.owner_id, p.name, p.birth_date, t.id AS type_id, t.name AS type_name
            FROM pets p
            LEFT JOIN types t ON t.id = p.type_id
            WHERE p.owner_id = ANY($1)
            ORDER BY p.name ASC
            "#,
        )
        .bind(owner_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut pets: Vec<(i32, Pet)> = Vec::with_capacity(pet_rows.len());
        for row in &pet_rows {
            let type_id: Option<i32> = row.try_get("type_id")?;
            let pet_type = match type_id {
                Some(id) => Some(NamedEntity {
                    id: Some(EntityId::new(id)),
                    name: row.try_get("type_name")?,
                }),
                None => None,
            };
            pets.push((
                row.try_get("owner_id")?,
                Pet {
                    id: Some(EntityId::new(row.try_get("id")?)),
                    name: row.try_get("name")?,
                    birth_date: row.try_get("birth_date")?,
                    pet_type,
                    visits: Vec::new(),
                },
            ));
        }

        let pet_ids: Vec<i32> = pets
            .iter()
            .filter_map(|(_, pet)| pet.id.map(i32::from))
            .collect();
        let visit_rows = sqlx::query(
            r#"
            SELECT id, pet_id, visit_date, description
            FROM visits
            WHERE pet_id = ANY($1)
            ORDER BY visit_date ASC, id ASC
            "#,
        )
        .bind(&pet_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut visits: HashMap<i32, Vec<Visit>> = HashMap::new();
        for row in &visit_rows {
            let date: NaiveDate = row.try_get("visit_date")?;
            visits.entry(row.try_get("pet_id")?).or_default().push(Visit {
                id: Some(EntityId::new(row.try_get("id")?)),
                date,
                description: row.try_get("description")?,
            });
        }

        let mut by_owner: HashMap<i32, Vec<Pet>> = HashMap::new();
        for (owner_id, mut pet) in pets {
            if let Some(id) = pet.id {
                pet.visits = visits.remove(&id.as_i32()).unwrap_or_default();
            }
            by_owner.entry(owner_id).or_default().push(pet);
        }
        Ok(by_owner)
    }
}

#[async_trait]
impl OwnerRepository for PostgresStore {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Owner>> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, address, city, telephone
            FROM owners
            WHERE id = $1
            "#,
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut owner = Self::row_to_owner(&row)?;
        owner.pets = self
            .load_pets(&[id.as_i32()])
            .await?
            .remove(&id.as_i32())
            .unwrap_or_default();
        Ok(Some(owner))
    }

    /// Stores the owner's contact details and inserts pets that have no id yet.
    /// Existing pet rows are left unchanged.
    async fn save(&self, mut owner: Owner) -> Result<Owner> {
        let mut tx = self.pool.begin().await?;

        let owner_id = match owner.id {
            None => {
                let id: i32 = sqlx::query_scalar(
                    r#"
                    INSERT INTO owners (first_name, last_name, address, city, telephone)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(&owner.first_name)
                .bind(&owner.last_name)
                .bind(&owner.address)
                .bind(&owner.city)
                .bind(&owner.telephone)
                .fetch_one(&mut *tx)
                .await?;
                EntityId::new(id)
            }
            Some(id) => {
                let updated = sqlx::query(
                    r#"
                    UPDATE owners
                    SET first_name = $1, last_name = $2, address = $3, city = $4, telephone = $5
                    WHERE id = $6
                    "#,
                )
                .bind(&owner.first_name)
                .bind(&owner.last_name)
                .bind(&owner.address)
                .bind(&owner.city)
                .bind(&owner.telephone)
                .bind(id.as_i32())
                .execute(&mut *tx)
                .await?;

                if updated.rows_affected() == 0 {
                    return Err(StoreError::MissingOwner(id));
                }
                id
            }
        };

        for pet in owner.pets.iter_mut().filter(|pet| pet.is_new()) {
            let type_id = pet
                .pet_type
                .as_ref()
                .and_then(|pet_type| pet_type.id)
                .map(i32::from);
            let pet_id: i32 = sqlx::query_scalar(
                r#"
                INSERT INTO pets (name, birth_date, type_id, owner_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(&pet.name)
            .bind(pet.birth_date)
            .bind(type_id)
            .bind(owner_id.as_i32())
            .fetch_one(&mut *tx)
            .await?;
            pet.id = Some(EntityId::new(pet_id));
        }

        tx.commit().await?;

        owner.id = Some(owner_id);
        tracing::debug!(owner_id = %owner_id, "owner stored");
        Ok(owner)
    }

    async fn find_by_last_name_starting_with(
        &self,
        prefix: &str,
        request: PageRequest,
    ) -> Result<Page<Owner>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM owners WHERE starts_with(last_name, $1)")
                .bind(prefix)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query(
            r#"
            SELECT id, first_name, last_name, address, city, telephone
            FROM owners
            WHERE starts_with(last_name, $1)
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(prefix)
        .bind(request.size() as i64)
        .bind(request.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut owners = rows
            .iter()
            .map(Self::row_to_owner)
            .collect::<Result<Vec<_>>>()?;

        let owner_ids: Vec<i32> = owners
            .iter()
            .filter_map(|owner| owner.id.map(i32::from))
            .collect();
        let mut pets = self.load_pets(&owner_ids).await?;
        for owner in &mut owners {
            if let Some(id) = owner.id {
                owner.pets = pets.remove(&id.as_i32()).unwrap_or_default();
            }
        }

        Ok(Page::new(owners, request, total.max(0) as u64))
    }
}

#[async_trait]
impl VetRepository for PostgresStore {
    async fn find_all(&self) -> Result<Vec<Vet>> {
        let rows = sqlx::query(
            r#"
            SELECT v.id, v.first_name, v.last_name, s.id AS specialty_id, s.name AS specialty_name
            FROM vets v
            LEFT JOIN vet_specialties vs ON vs.vet_id = v.id
            LEFT JOIN specialties s ON s.id = vs.specialty_id
            ORDER BY v.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut vets: Vec<Vet> = Vec::new();
        for row in &rows {
            let id = EntityId::new(row.try_get("id")?);
            if vets.last().and_then(|vet| vet.id) != Some(id) {
                let first_name: String = row.try_get("first_name")?;
                let last_name: String = row.try_get("last_name")?;
                vets.push(Vet::new(id, &first_name, &last_name));
            }

            let specialty_id: Option<i32> = row.try_get("specialty_id")?;
            if let (Some(specialty_id), Some(vet)) = (specialty_id, vets.last_mut()) {
                vet.add_specialty(NamedEntity {
                    id: Some(EntityId::new(specialty_id)),
                    name: row.try_get("specialty_name")?,
                });
            }
        }
        Ok(vets)
    }
}
