//! Build sources a configuration is resolved from.

use rtc_scm_core::ItemId;

use crate::policy::{ComponentLoadConfig, LoadPolicy, SourceKind};
use crate::properties::{keys, PropertyBag};
use crate::{ConfigError, ConfigResult};

/// Stored properties of a build definition, optionally with personal-build
/// overrides for this one run.
#[derive(Debug, Clone)]
pub struct BuildDefinitionSource {
    pub definition_id: String,
    pub properties: PropertyBag,
    pub personal_build: Option<PropertyBag>,
}

#[derive(Debug, Clone)]
pub struct WorkspaceSource {
    pub workspace: ItemId,
    pub name: String,
    pub properties: PropertyBag,
    /// Replacements applied to `properties` before substitution.
    pub overrides: Option<PropertyBag>,
}

#[derive(Debug, Clone)]
pub struct StreamSource {
    pub stream: ItemId,
    pub name: String,
    /// Workspace the stream is loaded through, if the caller names one.
    pub base_workspace: Option<String>,
    /// Name of the snapshot taken of the stream for this build.
    pub snapshot: Option<String>,
    pub properties: PropertyBag,
}

#[derive(Debug, Clone)]
pub struct SnapshotSource {
    pub snapshot: ItemId,
    pub name: String,
    pub properties: PropertyBag,
}

#[derive(Debug, Clone)]
pub enum ConfigurationSource {
    BuildDefinition(BuildDefinitionSource),
    Workspace(WorkspaceSource),
    Stream(StreamSource),
    Snapshot(SnapshotSource),
}

impl ConfigurationSource {
    pub fn build_definition(definition_id: impl Into<String>, properties: PropertyBag) -> Self {
        ConfigurationSource::BuildDefinition(BuildDefinitionSource {
            definition_id: definition_id.into(),
            properties,
            personal_build: None,
        })
    }

    pub fn workspace(workspace: ItemId, name: impl Into<String>, properties: PropertyBag) -> Self {
        ConfigurationSource::Workspace(WorkspaceSource {
            workspace,
            name: name.into(),
            properties,
            overrides: None,
        })
    }

    pub fn stream(stream: ItemId, name: impl Into<String>, properties: PropertyBag) -> Self {
        ConfigurationSource::Stream(StreamSource {
            stream,
            name: name.into(),
            base_workspace: None,
            snapshot: None,
            properties,
        })
    }

    pub fn snapshot(snapshot: ItemId, name: impl Into<String>, properties: PropertyBag) -> Self {
        ConfigurationSource::Snapshot(SnapshotSource {
            snapshot,
            name: name.into(),
            properties,
        })
    }

    /// Attach property overrides: the personal-build overrides of a build
    /// definition, or the overrides of a workspace load. Streams and snapshots
    /// take no overrides.
    pub fn with_overrides(mut self, overrides: PropertyBag) -> ConfigResult<Self> {
        match &mut self {
            ConfigurationSource::BuildDefinition(def) => def.personal_build = Some(overrides),
            ConfigurationSource::Workspace(ws) => ws.overrides = Some(overrides),
            ConfigurationSource::Stream(_) | ConfigurationSource::Snapshot(_) => {
                return Err(ConfigError::OverridesNotSupported(self.kind()));
            }
        }
        Ok(self)
    }

    /// Overrides to apply before substitution, if any.
    pub fn overrides(&self) -> Option<&PropertyBag> {
        match self {
            ConfigurationSource::BuildDefinition(def) => def.personal_build.as_ref(),
            ConfigurationSource::Workspace(ws) => ws.overrides.as_ref(),
            ConfigurationSource::Stream(_) | ConfigurationSource::Snapshot(_) => None,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            ConfigurationSource::BuildDefinition(_) => SourceKind::BuildDefinition,
            ConfigurationSource::Workspace(_) => SourceKind::Workspace,
            ConfigurationSource::Stream(_) => SourceKind::Stream,
            ConfigurationSource::Snapshot(_) => SourceKind::Snapshot,
        }
    }

    pub fn properties(&self) -> &PropertyBag {
        match self {
            ConfigurationSource::BuildDefinition(def) => &def.properties,
            ConfigurationSource::Workspace(ws) => &ws.properties,
            ConfigurationSource::Stream(stream) => &stream.properties,
            ConfigurationSource::Snapshot(snapshot) => &snapshot.properties,
        }
    }
}

/// Builds the property bag of an ad-hoc source from typed parameters.
#[derive(Debug, Clone, Default)]
pub struct LoadOptionsBuilder {
    properties: PropertyBag,
}

impl LoadOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_policy(mut self, policy: LoadPolicy) -> Self {
        let value = match policy {
            LoadPolicy::Unset => return self,
            LoadPolicy::UseComponentLoadConfig => LoadPolicy::USE_COMPONENT_LOAD_CONFIG,
            LoadPolicy::UseLoadRules => LoadPolicy::USE_LOAD_RULES,
        };
        self.properties.insert(keys::LOAD_POLICY, value);
        self
    }

    pub fn component_load_config(mut self, config: ComponentLoadConfig) -> Self {
        let value = match config {
            ComponentLoadConfig::Unset => return self,
            ComponentLoadConfig::LoadAllComponents => ComponentLoadConfig::LOAD_ALL_COMPONENTS,
            ComponentLoadConfig::ExcludeSomeComponents => {
                ComponentLoadConfig::EXCLUDE_SOME_COMPONENTS
            }
        };
        self.properties.insert(keys::COMPONENT_LOAD_CONFIG, value);
        self
    }

    /// Comma-separated component names or ids.
    pub fn components(mut self, components: impl Into<String>) -> Self {
        self.properties.insert(keys::LOAD_COMPONENTS, components);
        self
    }

    /// One or more `component/file` specs separated by `;`.
    pub fn load_rules(mut self, specs: impl Into<String>) -> Self {
        self.properties.insert(keys::COMPONENT_LOAD_RULES, specs);
        self
    }

    pub fn create_folders_for_components(mut self, create: bool) -> Self {
        self.properties
            .insert(keys::CREATE_FOLDERS_FOR_COMPONENTS, create.to_string());
        self
    }

    pub fn accept_before_fetch(mut self, accept: bool) -> Self {
        self.properties
            .insert(keys::ACCEPT_BEFORE_FETCH, accept.to_string());
        self
    }

    pub fn delete_destination_before_fetch(mut self, delete: bool) -> Self {
        self.properties
            .insert(keys::DELETE_DESTINATION_BEFORE_FETCH, delete.to_string());
        self
    }

    pub fn fetch_destination(mut self, destination: impl Into<String>) -> Self {
        self.properties.insert(keys::FETCH_DESTINATION, destination);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn build(self) -> PropertyBag {
        self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_options_builder() {
        let props = LoadOptionsBuilder::new()
            .load_policy(LoadPolicy::UseLoadRules)
            .component_load_config(ComponentLoadConfig::Unset)
            .load_rules("Comp/ws.loadRule")
            .create_folders_for_components(true)
            .build();

        assert_eq!(props.get(keys::LOAD_POLICY), Some("useLoadRules"));
        assert_eq!(props.get(keys::COMPONENT_LOAD_CONFIG), None);
        assert_eq!(props.get(keys::COMPONENT_LOAD_RULES), Some("Comp/ws.loadRule"));
        assert!(props.get_bool(keys::CREATE_FOLDERS_FOR_COMPONENTS, false));
    }

    #[test]
    fn test_overrides_by_source_kind() {
        let overrides = PropertyBag::new().with("a", "b");

        let def = ConfigurationSource::build_definition("def", PropertyBag::new())
            .with_overrides(overrides.clone())
            .unwrap();
        assert!(matches!(
            def,
            ConfigurationSource::BuildDefinition(BuildDefinitionSource {
                personal_build: Some(_),
                ..
            })
        ));

        let ws = ConfigurationSource::workspace(ItemId::new(), "ws", PropertyBag::new())
            .with_overrides(overrides.clone())
            .unwrap();
        assert_eq!(ws.overrides(), Some(&overrides));

        let err = ConfigurationSource::stream(ItemId::new(), "stream", PropertyBag::new())
            .with_overrides(overrides.clone())
            .unwrap_err();
        assert!(matches!(err, ConfigError::OverridesNotSupported(SourceKind::Stream)));

        let err = ConfigurationSource::snapshot(ItemId::new(), "snap", PropertyBag::new())
            .with_overrides(overrides)
            .unwrap_err();
        assert!(matches!(err, ConfigError::OverridesNotSupported(SourceKind::Snapshot)));
    }
}
