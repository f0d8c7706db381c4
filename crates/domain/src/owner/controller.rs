use common::EntityId;
use store::{Owner, OwnerRepository, PageRequest};

use super::{
    FormResult, OwnerSearch, PAGE_SIZE, VIEWS_FIND_OWNERS, VIEWS_OWNER_CREATE_OR_UPDATE_FORM,
    VIEWS_OWNER_DETAILS, VIEWS_OWNERS_LIST,
};
use crate::binding::FormBinder;
use crate::error::DomainError;
use crate::validation::ValidationOutcome;
use crate::view::{Model, ModelAndView, Target};

fn owner_path(id: EntityId) -> String {
    format!("/owners/{id}")
}

fn stored_id(owner: &Owner) -> Result<EntityId, DomainError> {
    owner.id.ok_or(DomainError::UnsavedOwner)
}

/// Handles the owner pages.
///
/// Every operation is independent: the controller keeps no state between
/// requests beyond its repository handle.
pub struct OwnerController<R: OwnerRepository> {
    owners: R,
}

impl<R: OwnerRepository> OwnerController<R> {
    /// Creates a new owner controller backed by the given repository.
    pub fn new(owners: R) -> Self {
        Self { owners }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.owners
    }

    /// Restricts form binding so `id` always comes from the path, never from input.
    pub fn set_allowed_fields(&self, binder: &mut FormBinder) {
        binder.set_disallowed_fields(&["id"]);
    }

    /// Loads the owner a form operates on.
    ///
    /// Without an id this is a fresh, unsaved owner.
    #[tracing::instrument(skip(self))]
    pub async fn find_owner(&self, owner_id: Option<EntityId>) -> Result<Owner, DomainError> {
        match owner_id {
            None => Ok(Owner::new()),
            Some(id) => self
                .owners
                .find_by_id(id)
                .await?
                .ok_or(DomainError::OwnerNotFound(id)),
        }
    }

    pub fn init_creation_form(&self) -> ModelAndView {
        ModelAndView::with_model(
            Target::View(VIEWS_OWNER_CREATE_OR_UPDATE_FORM),
            Model::new().with("owner", Owner::new()),
        )
    }

    /// Saves a new owner unless the submitted form had errors.
    #[tracing::instrument(skip(self, owner, outcome))]
    pub async fn process_creation_form(
        &self,
        owner: Owner,
        outcome: &ValidationOutcome,
    ) -> Result<FormResult, DomainError> {
        if outcome.has_errors() {
            return Ok(
                FormResult::new(Target::View(VIEWS_OWNER_CREATE_OR_UPDATE_FORM))
                    .flash("error", "There was an error in creating the owner."),
            );
        }

        let saved = self.owners.save(owner).await?;
        let id = stored_id(&saved)?;
        metrics::counter!("owners_created_total").increment(1);
        tracing::info!(owner_id = %id, "owner created");

        Ok(FormResult::new(Target::redirect(owner_path(id))).flash("message", "New Owner Created"))
    }

    pub fn init_find_form(&self) -> Target {
        Target::View(VIEWS_FIND_OWNERS)
    }

    /// Searches owners by last name prefix.
    ///
    /// `page` is 1-based and echoed back unchanged as `currentPage`; page 0
    /// fails with [`DomainError::InvalidPage`]. When exactly one owner
    /// matches in total, the list is skipped and the result redirects to
    /// that owner.
    #[tracing::instrument(skip(self, outcome))]
    pub async fn process_find_form(
        &self,
        page: u32,
        search: &OwnerSearch,
        outcome: &mut ValidationOutcome,
    ) -> Result<ModelAndView, DomainError> {
        if page == 0 {
            return Err(DomainError::InvalidPage(page));
        }
        let prefix = search.last_name.as_deref().unwrap_or("");
        let request = PageRequest::of((page - 1) as usize, PAGE_SIZE);

        let results = self
            .owners
            .find_by_last_name_starting_with(prefix, request)
            .await?;
        metrics::counter!("owner_searches_total").increment(1);

        if results.is_empty() {
            outcome.reject_value("lastName", "notFound", "not found");
            return Ok(Target::View(VIEWS_FIND_OWNERS).into());
        }

        if results.total_elements() == 1 {
            let id = stored_id(&results.content()[0])?;
            return Ok(Target::redirect(owner_path(id)).into());
        }

        let total_pages = results.total_pages();
        let total_items = results.total_elements();
        let model = Model::new()
            .with("currentPage", page)
            .with("totalPages", total_pages)
            .with("totalItems", total_items)
            .with("listOwners", results.into_content());

        Ok(ModelAndView::with_model(
            Target::View(VIEWS_OWNERS_LIST),
            model,
        ))
    }

    /// The owner to edit is loaded by the caller through [`find_owner`](Self::find_owner).
    pub fn init_update_owner_form(&self) -> Target {
        Target::View(VIEWS_OWNER_CREATE_OR_UPDATE_FORM)
    }

    /// Saves an edited owner.
    ///
    /// The owner's id must match `owner_id` from the path; an unset id never
    /// matches. On success the id is forced to the path id before saving.
    #[tracing::instrument(skip(self, owner, outcome))]
    pub async fn process_update_owner_form(
        &self,
        mut owner: Owner,
        outcome: &mut ValidationOutcome,
        owner_id: EntityId,
    ) -> Result<FormResult, DomainError> {
        if owner.id != Some(owner_id) {
            outcome.reject_value(
                "id",
                "mismatch",
                "The owner ID in the form does not match the URL.",
            );
            tracing::warn!(path_id = %owner_id, form_id = ?owner.id, "owner id mismatch");
            return Ok(
                FormResult::new(Target::redirect(format!("{}/edit", owner_path(owner_id))))
                    .flash("error", "Owner ID mismatch. Please try again."),
            );
        }

        if outcome.has_errors() {
            return Ok(
                FormResult::new(Target::View(VIEWS_OWNER_CREATE_OR_UPDATE_FORM))
                    .flash("error", "There was an error in updating the owner."),
            );
        }

        owner.id = Some(owner_id);
        self.owners.save(owner).await?;
        metrics::counter!("owners_updated_total").increment(1);
        tracing::info!(owner_id = %owner_id, "owner updated");

        Ok(
            FormResult::new(Target::redirect(owner_path(owner_id)))
                .flash("message", "Owner Values Updated"),
        )
    }

    /// Shows one owner with their pets.
    #[tracing::instrument(skip(self))]
    pub async fn show_owner(&self, owner_id: EntityId) -> Result<ModelAndView, DomainError> {
        let owner = self
            .owners
            .find_by_id(owner_id)
            .await?
            .ok_or(DomainError::OwnerNotFound(owner_id))?;

        Ok(ModelAndView::with_model(
            Target::View(VIEWS_OWNER_DETAILS),
            Model::new().with("owner", owner),
        ))
    }
}
