//! Binding untrusted form fields onto typed targets.

use common::EntityId;
use store::Owner;
use thiserror::Error;

use crate::owner::OwnerSearch;
use crate::validation::ValidationOutcome;

/// Why a single field could not be bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("Unknown field {0}")]
    UnknownField(String),

    #[error("Failed to convert value '{value}' for field '{field}'")]
    InvalidValue { field: String, value: String },
}

/// A target whose fields can be set from submitted form values.
pub trait Bindable {
    fn bind_field(&mut self, field: &str, value: &str) -> Result<(), BindError>;
}

/// Applies submitted form values to a [`Bindable`], skipping disallowed fields.
#[derive(Debug, Clone, Default)]
pub struct FormBinder {
    disallowed: Vec<String>,
}

impl FormBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the set of fields that input may never set.
    pub fn set_disallowed_fields(&mut self, fields: &[&str]) {
        self.disallowed = fields.iter().map(|field| field.to_string()).collect();
    }

    pub fn disallowed_fields(&self) -> &[String] {
        &self.disallowed
    }

    pub fn is_allowed(&self, field: &str) -> bool {
        !self.disallowed.iter().any(|disallowed| disallowed == field)
    }

    /// Binds every allowed field in `values` onto `target`.
    ///
    /// Unknown fields are ignored; values that fail to convert are recorded
    /// in `outcome` under the `typeMismatch` code.
    pub fn bind<'a, T, I>(&self, target: &mut T, values: I, outcome: &mut ValidationOutcome)
    where
        T: Bindable,
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (field, value) in values {
            if !self.is_allowed(field) {
                tracing::debug!(field, "skipping disallowed form field");
                continue;
            }
            match target.bind_field(field, value) {
                Ok(()) | Err(BindError::UnknownField(_)) => {}
                Err(err @ BindError::InvalidValue { .. }) => {
                    outcome.reject_value(field, "typeMismatch", err.to_string());
                }
            }
        }
    }
}

impl Bindable for Owner {
    fn bind_field(&mut self, field: &str, value: &str) -> Result<(), BindError> {
        match field {
            "id" => {
                self.id = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.parse::<EntityId>().map_err(|_| BindError::InvalidValue {
                        field: field.to_string(),
                        value: value.to_string(),
                    })?)
                };
            }
            "firstName" => self.first_name = value.to_string(),
            "lastName" => self.last_name = value.to_string(),
            "address" => self.address = value.to_string(),
            "city" => self.city = value.to_string(),
            "telephone" => self.telephone = value.to_string(),
            other => return Err(BindError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

impl Bindable for OwnerSearch {
    fn bind_field(&mut self, field: &str, value: &str) -> Result<(), BindError> {
        match field {
            "lastName" => {
                self.last_name = Some(value.to_string());
                Ok(())
            }
            other => Err(BindError::UnknownField(other.to_string())),
        }
    }
}
