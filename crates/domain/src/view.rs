//! View names, redirect targets and the model handed to a renderer.

use serde::Serialize;
use serde::ser::SerializeMap;
use store::Owner;
use thiserror::Error;

use crate::validation::FieldError;

/// Where a handled request goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Render the named view.
    View(&'static str),
    /// Redirect the browser to a path.
    Redirect(String),
}

impl Target {
    pub fn redirect(path: impl Into<String>) -> Self {
        Target::Redirect(path.into())
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Target::Redirect(_))
    }

    pub fn view_name(&self) -> Option<&'static str> {
        match self {
            Target::View(name) => Some(name),
            Target::Redirect(_) => None,
        }
    }

    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Target::View(_) => None,
            Target::Redirect(path) => Some(path),
        }
    }
}

/// Renders as the view name, or as `redirect:<path>` for redirects.
impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::View(name) => f.write_str(name),
            Target::Redirect(path) => write!(f, "redirect:{path}"),
        }
    }
}

/// A value exposed to a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModelValue {
    Owner(Box<Owner>),
    Owners(Vec<Owner>),
    Int(u32),
    Long(u64),
    Text(String),
    Errors(Vec<FieldError>),
}

impl From<Owner> for ModelValue {
    fn from(owner: Owner) -> Self {
        ModelValue::Owner(Box::new(owner))
    }
}

impl From<Vec<Owner>> for ModelValue {
    fn from(owners: Vec<Owner>) -> Self {
        ModelValue::Owners(owners)
    }
}

impl From<u32> for ModelValue {
    fn from(value: u32) -> Self {
        ModelValue::Int(value)
    }
}

impl From<u64> for ModelValue {
    fn from(value: u64) -> Self {
        ModelValue::Long(value)
    }
}

impl From<String> for ModelValue {
    fn from(value: String) -> Self {
        ModelValue::Text(value)
    }
}

impl From<&str> for ModelValue {
    fn from(value: &str) -> Self {
        ModelValue::Text(value.to_string())
    }
}

/// Named attributes for a view, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    attributes: Vec<(String, ModelValue)>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing an existing value in place.
    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<ModelValue>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ModelValue>) -> Self {
        self.add_attribute(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ModelValue> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelValue)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl Serialize for Model {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len()))?;
        for (key, value) in &self.attributes {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A target together with the model it should be rendered with.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAndView {
    pub target: Target,
    pub model: Model,
}

impl ModelAndView {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            model: Model::new(),
        }
    }

    pub fn with_model(target: Target, model: Model) -> Self {
        Self { target, model }
    }

    pub fn view_name(&self) -> Option<&'static str> {
        self.target.view_name()
    }
}

impl From<Target> for ModelAndView {
    fn from(target: Target) -> Self {
        Self::new(target)
    }
}

/// Failure to turn a view and model into output.
#[derive(Debug, Error)]
#[error("Failed to render view {view}: {reason}")]
pub struct RenderError {
    pub view: String,
    pub reason: String,
}

/// Turns a logical view name and its model into displayable output.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view_name: &str, model: &Model) -> Result<String, RenderError>;
}
