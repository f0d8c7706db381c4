//! Request handling core of the clinic web application.
//!
//! This crate provides:
//! - `OwnerController` for creating, showing, updating and searching owners
//! - `HealthController` for the database/application health report
//! - form binding, validation outcomes and flash messages
//! - the view model handed to a `ViewRenderer`

pub mod binding;
pub mod error;
pub mod flash;
pub mod health;
pub mod owner;
pub mod validation;
pub mod view;

pub use binding::{BindError, Bindable, FormBinder};
pub use error::DomainError;
pub use flash::FlashContext;
pub use health::{ComponentHealth, HealthController, HealthReport, Status};
pub use owner::{FormResult, OwnerController, OwnerSearch, validate_owner};
pub use validation::{FieldError, ValidationOutcome};
pub use view::{Model, ModelAndView, ModelValue, RenderError, Target, ViewRenderer};
