//! Build property bags, personal-build overrides and `${name}` substitution.
//!
//! Property values may reference other properties of the same bag:
//! - `${propertyA}` is replaced by the current value of `propertyA`
//! - references are resolved in insertion order, so a property sees the
//!   already-substituted values of the properties before it
//! - unknown references are left untouched

use indexmap::IndexMap;
use regex::Regex;
use rtc_scm_core::ConsoleOutput;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

use crate::{ConfigError, ConfigResult};

/// Property names read by the resolution engine.
pub mod keys {
    pub const WORKSPACE_UUID: &str = "workspaceUUID";
    pub const FETCH_DESTINATION: &str = "fetchDestination";
    pub const ACCEPT_BEFORE_FETCH: &str = "acceptBeforeFetch";
    pub const DELETE_DESTINATION_BEFORE_FETCH: &str = "deleteDestinationBeforeFetch";
    pub const CREATE_FOLDERS_FOR_COMPONENTS: &str = "createFoldersForComponents";
    pub const INCLUDE_COMPONENTS: &str = "includeComponents";
    pub const LOAD_COMPONENTS: &str = "loadComponents";
    pub const COMPONENT_LOAD_RULES: &str = "componentLoadRules";
    pub const LOAD_POLICY: &str = "loadPolicy";
    pub const COMPONENT_LOAD_CONFIG: &str = "componentLoadConfig";
    pub const LOAD_METHOD: &str = "loadMethod";
}

// Matches ${name}; names may contain dots and dashes
static PROPERTY_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^${}\s]+)\}").expect("valid property reference regex"));

/// Insertion-ordered string properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyBag {
    entries: IndexMap<String, String>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a property. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Trimmed value, treating blank values as absent.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// `"true"` in any case is true, any other value false, absent `default`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.value(key) {
            Some(v) => v.eq_ignore_ascii_case("true"),
            None => default,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace values with personal-build overrides.
    ///
    /// Every override must change the bag; an override equal to the value it
    /// replaces fails with [`ConfigError::OverrideNotApplied`].
    pub fn apply_overrides(&mut self, overrides: &PropertyBag) -> ConfigResult<()> {
        for (key, value) in overrides.iter() {
            match self.insert(key, value) {
                Some(previous) if previous == value => {
                    return Err(ConfigError::OverrideNotApplied {
                        property: key.to_string(),
                        value: previous,
                    });
                }
                previous => {
                    debug!(property = key, ?previous, value, "Applied personal build override");
                }
            }
        }
        Ok(())
    }

    /// Substitute `${name}` references, reporting each changed property to the
    /// console.
    pub fn substitute(&self, console: &dyn ConsoleOutput) -> PropertyBag {
        let mut result = self.clone();

        for index in 0..result.entries.len() {
            let Some((key, value)) = result.entries.get_index(index) else {
                continue;
            };
            if !PROPERTY_REF.is_match(value) {
                continue;
            }

            let substituted = PROPERTY_REF
                .replace_all(value, |caps: &regex::Captures| {
                    let name = &caps[1];
                    match result.entries.get(name) {
                        Some(replacement) if name != key.as_str() => replacement.clone(),
                        _ => caps[0].to_string(),
                    }
                })
                .into_owned();

            if substituted != *value {
                console.log(&format!(
                    "Substituted value of property \"{}\": \"{}\" -> \"{}\"",
                    key, value, substituted
                ));
                let key = key.clone();
                result.entries.insert(key, substituted);
            }
        }

        result
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = PropertyBag::new();
        for (k, v) in iter {
            bag.insert(k, v);
        }
        bag
    }
}
