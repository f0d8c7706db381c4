//! One-shot messages carried across a redirect.

use std::collections::BTreeMap;

/// Messages to show once on the page a redirect lands on.
///
/// Keys are `"message"` for success notices and `"error"` for failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashContext {
    messages: BTreeMap<String, String>,
}

impl FlashContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message under `key`, replacing any previous one.
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(key.into(), message.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages
            .iter()
            .map(|(key, message)| (key.as_str(), message.as_str()))
    }
}
