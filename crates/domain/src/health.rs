//! Point-in-time health report for the database and the application.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use store::VetRepository;

/// Health of a component or of the whole service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Up,
    Down,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Up => "UP",
            Status::Down => "DOWN",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one component with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentHealth {
    pub status: Status,
    pub details: String,
}

impl ComponentHealth {
    pub fn up(details: impl Into<String>) -> Self {
        Self {
            status: Status::Up,
            details: details.into(),
        }
    }

    pub fn down(details: impl Into<String>) -> Self {
        Self {
            status: Status::Down,
            details: details.into(),
        }
    }
}

/// Aggregate health, UP only when every component is UP.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: Status,
    pub timestamp: DateTime<Utc>,
    #[serde(serialize_with = "serialize_components")]
    components: Vec<(&'static str, ComponentHealth)>,
}

impl HealthReport {
    /// Builds a report from components in display order.
    pub fn new(components: Vec<(&'static str, ComponentHealth)>) -> Self {
        let status = if components
            .iter()
            .all(|(_, component)| component.status == Status::Up)
        {
            Status::Up
        } else {
            Status::Down
        };

        Self {
            status,
            timestamp: Utc::now(),
            components,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == Status::Up
    }

    pub fn component(&self, name: &str) -> Option<&ComponentHealth> {
        self.components
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, component)| component)
    }

    pub fn components(&self) -> impl Iterator<Item = (&'static str, &ComponentHealth)> {
        self.components.iter().map(|(name, component)| (*name, component))
    }
}

fn serialize_components<S: Serializer>(
    components: &[(&'static str, ComponentHealth)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(components.len()))?;
    for (name, component) in components {
        map.serialize_entry(name, component)?;
    }
    map.end()
}

/// Probes the database through a cheap read and reports component health.
///
/// A failed probe is reported once as DOWN; nothing is retried.
pub struct HealthController<V: VetRepository> {
    vets: V,
}

impl<V: VetRepository> HealthController<V> {
    pub fn new(vets: V) -> Self {
        Self { vets }
    }

    #[tracing::instrument(skip(self))]
    pub async fn health(&self) -> HealthReport {
        let database = self.check_database().await;
        let application = ComponentHealth::up("Application is running");

        let report = HealthReport::new(vec![("database", database), ("application", application)]);
        metrics::counter!("health_checks_total", "status" => report.status.as_str()).increment(1);
        report
    }

    async fn check_database(&self) -> ComponentHealth {
        match self.vets.find_all().await {
            Ok(_) => ComponentHealth::up("Database connection is healthy"),
            Err(err) => {
                tracing::error!(error = %err, "database health check failed");
                ComponentHealth::down(format!("Database connection failed: {err}"))
            }
        }
    }
}
