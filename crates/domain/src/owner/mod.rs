//! Owner pages: create, show, update and search.

mod controller;
mod validator;

pub use controller::OwnerController;
pub use validator::validate_owner;

use serde::Deserialize;

use crate::flash::FlashContext;
use crate::view::Target;

/// Create-or-update form for a single owner.
pub const VIEWS_OWNER_CREATE_OR_UPDATE_FORM: &str = "owners/createOrUpdateOwnerForm";

/// Search form.
pub const VIEWS_FIND_OWNERS: &str = "owners/findOwners";

/// Paged search results.
pub const VIEWS_OWNERS_LIST: &str = "owners/ownersList";

/// Single owner with pets and visits.
pub const VIEWS_OWNER_DETAILS: &str = "owners/ownerDetails";

/// Owners shown per search result page.
pub const PAGE_SIZE: usize = 5;

/// Search criteria from the find-owners form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSearch {
    /// Last name prefix; `None` matches every owner.
    pub last_name: Option<String>,
}

impl OwnerSearch {
    pub fn last_name(prefix: impl Into<String>) -> Self {
        Self {
            last_name: Some(prefix.into()),
        }
    }
}

/// Result of submitting a form: where to go next and what to flash there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResult {
    pub target: Target,
    pub flash: FlashContext,
}

impl FormResult {
    fn new(target: Target) -> Self {
        Self {
            target,
            flash: FlashContext::new(),
        }
    }

    fn flash(mut self, key: &str, message: &str) -> Self {
        self.flash.add(key, message);
        self
    }
}
