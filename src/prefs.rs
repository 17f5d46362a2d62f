//! Persisted UI preferences and the floating-text effect they drive.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Words used when no custom floating texts are configured.
pub const DEFAULT_FLOATING_TEXTS: [&str; 5] =
    ["perfect", "good", "excellent", "extraordinary", "legend"];

/// The stored preference object. Fields other settings pages write into
/// the same file are ignored on load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    #[serde(default)]
    pub floating_text_enabled: bool,
    #[serde(default)]
    pub floating_texts: Vec<String>,
}

/// A partial update, as broadcast when the settings form is saved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PreferenceChange {
    pub floating_text_enabled: Option<bool>,
    pub floating_texts: Option<Vec<String>>,
}

impl UiPreferences {
    /// Merges a change. An empty text list leaves the current texts alone.
    /// Returns whether anything changed.
    pub fn apply_change(&mut self, change: PreferenceChange) -> bool {
        let mut changed = false;
        if let Some(enabled) = change.floating_text_enabled
            && enabled != self.floating_text_enabled
        {
            tracing::info!(enabled, "floating text toggled");
            self.floating_text_enabled = enabled;
            changed = true;
        }
        if let Some(texts) = change.floating_texts
            && !texts.is_empty()
            && texts != self.floating_texts
        {
            self.floating_texts = texts;
            changed = true;
        }
        changed
    }

    /// Parses a JSON change payload and merges it.
    pub fn apply_json(&mut self, payload: &str) -> Result<bool> {
        let change: PreferenceChange = serde_json::from_str(payload)?;
        Ok(self.apply_change(change))
    }

    pub fn texts(&self) -> Vec<&str> {
        if self.floating_texts.is_empty() {
            DEFAULT_FLOATING_TEXTS.to_vec()
        } else {
            self.floating_texts.iter().map(String::as_str).collect()
        }
    }
}

/// Hands out the next word to float over the screen.
#[derive(Debug, Default)]
pub struct FloatingText {
    next: usize,
}

impl FloatingText {
    pub fn spawn<'a>(&mut self, prefs: &'a UiPreferences) -> Option<&'a str> {
        if !prefs.floating_text_enabled {
            return None;
        }
        let texts = prefs.texts();
        let text = texts[self.next % texts.len()];
        self.next = self.next.wrapping_add(1);
        Some(text)
    }
}
