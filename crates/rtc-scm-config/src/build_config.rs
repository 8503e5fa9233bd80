//! The resolved load configuration of a build.

use rtc_scm_core::{ComponentHandle, ConsoleOutput, ItemId, RepositoryLookup, Scope};
use serde::Serialize;
use tracing::{debug, info};

use crate::components::resolve_component_list;
use crate::load_rules::resolve_load_rules;
use crate::policy::{effective_mode, ComponentLoadConfig, LoadPolicy, ResolutionMode, SourceKind};
use crate::properties::{keys, PropertyBag};
use crate::scope::{ResolvedLoadRule, ScopeResolver};
use crate::source::ConfigurationSource;
use crate::{ConfigError, ConfigResult};

/// What to load, how, and from where. Immutable once resolved.
#[derive(Debug, Clone)]
pub struct BuildConfiguration {
    source_kind: SourceKind,
    mode: ResolutionMode,
    scope: Scope,
    definition_id: Option<String>,
    workspace_name: Option<String>,
    snapshot_name: Option<String>,
    personal_build: bool,
    load_rules: Vec<ResolvedLoadRule>,
    components: Vec<ComponentHandle>,
    include_components: bool,
    create_folders_for_components: bool,
    accept_before_fetch: bool,
    delete_destination_before_fetch: bool,
    fetch_destination: Option<String>,
    load_method: Option<String>,
    properties: PropertyBag,
}

impl BuildConfiguration {
    /// Resolve the configuration of `source` against `repository`.
    ///
    /// Deprecation warnings and property substitutions are written to
    /// `console`. Any parse or lookup failure aborts the resolution.
    pub fn resolve(
        source: &ConfigurationSource,
        repository: &dyn RepositoryLookup,
        console: &dyn ConsoleOutput,
    ) -> ConfigResult<Self> {
        let source_kind = source.kind();

        let mut properties = source.properties().clone();
        if let Some(overrides) = source.overrides() {
            properties.apply_overrides(overrides)?;
            info!(
                source = %source_kind,
                overrides = overrides.len(),
                "Applied property overrides"
            );
        }
        let personal_build = source_kind.is_build_definition() && source.overrides().is_some();
        let properties = properties.substitute(console);

        let scope = match source {
            ConfigurationSource::BuildDefinition(_) => build_workspace(&properties, repository)?,
            ConfigurationSource::Workspace(ws) => Scope::workspace(ws.workspace, ws.name.clone()),
            ConfigurationSource::Stream(stream) => Scope::stream(stream.stream, stream.name.clone()),
            ConfigurationSource::Snapshot(snapshot) => {
                Scope::snapshot(snapshot.snapshot, snapshot.name.clone())
            }
        };

        let mode = effective_mode(
            source_kind,
            LoadPolicy::from_raw(properties.value(keys::LOAD_POLICY)),
            ComponentLoadConfig::from_raw(properties.value(keys::COMPONENT_LOAD_CONFIG)),
        );
        debug!(source = %source_kind, ?mode, scope = %scope.name, "Selected resolution mode");

        let resolver = ScopeResolver::new(repository, &scope);

        let load_rules = match properties.value(keys::COMPONENT_LOAD_RULES) {
            Some(raw) if mode.uses_load_rules(true) => {
                resolve_load_rules(&resolver, raw, mode.strict_load_rules(), console)?
            }
            Some(_) => {
                debug!(?mode, "Ignoring configured load rules");
                Vec::new()
            }
            None => Vec::new(),
        };

        let components = match properties.value(keys::LOAD_COMPONENTS) {
            Some(raw) if mode.uses_component_list(true) => {
                resolve_component_list(&resolver, raw)?
            }
            Some(_) => {
                debug!(?mode, "Ignoring configured component list");
                Vec::new()
            }
            None => Vec::new(),
        };

        let include_components = mode == ResolutionMode::Legacy
            && properties.get_bool(keys::INCLUDE_COMPONENTS, false);
        let create_folders_for_components = mode.create_folders_for_components(
            properties.get_bool(keys::CREATE_FOLDERS_FOR_COMPONENTS, false),
        );
        let accept_before_fetch = match source_kind {
            SourceKind::BuildDefinition | SourceKind::Workspace => {
                properties.get_bool(keys::ACCEPT_BEFORE_FETCH, true)
            }
            SourceKind::Stream | SourceKind::Snapshot => false,
        };

        let (definition_id, workspace_name, snapshot_name) = match source {
            ConfigurationSource::BuildDefinition(def) => (
                Some(def.definition_id.clone()),
                Some(scope.name.clone()),
                None,
            ),
            ConfigurationSource::Workspace(ws) => (None, Some(ws.name.clone()), None),
            ConfigurationSource::Stream(stream) => {
                (None, stream.base_workspace.clone(), stream.snapshot.clone())
            }
            ConfigurationSource::Snapshot(snapshot) => (None, None, Some(snapshot.name.clone())),
        };

        let config = BuildConfiguration {
            source_kind,
            mode,
            definition_id,
            workspace_name,
            snapshot_name,
            personal_build,
            load_rules,
            components,
            include_components,
            create_folders_for_components,
            accept_before_fetch,
            delete_destination_before_fetch: properties
                .get_bool(keys::DELETE_DESTINATION_BEFORE_FETCH, false),
            fetch_destination: properties.value(keys::FETCH_DESTINATION).map(String::from),
            load_method: properties.value(keys::LOAD_METHOD).map(String::from),
            scope,
            properties,
        };

        info!(
            source = %config.source_kind,
            scope = %config.scope.name,
            load_rules = config.load_rules.len(),
            components = config.components.len(),
            "Resolved load configuration"
        );
        Ok(config)
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Workspace, stream or snapshot the load is resolved against.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn is_build_definition_configuration(&self) -> bool {
        self.source_kind.is_build_definition()
    }

    pub fn is_stream_load(&self) -> bool {
        self.source_kind == SourceKind::Stream
    }

    pub fn is_snapshot_load(&self) -> bool {
        self.source_kind == SourceKind::Snapshot
    }

    pub fn is_personal_build(&self) -> bool {
        self.personal_build
    }

    pub fn is_load_policy_set(&self) -> bool {
        self.mode.is_load_policy_set()
    }

    pub fn is_load_policy_set_to_use_load_rules(&self) -> bool {
        self.mode.is_load_policy_set_to_use_load_rules()
    }

    pub fn is_load_policy_set_to_use_component_load_config(&self) -> bool {
        self.mode.is_load_policy_set_to_use_component_load_config()
    }

    pub fn is_component_load_config_set_to_exclude_some_components(&self) -> bool {
        self.mode
            .is_component_load_config_set_to_exclude_some_components()
    }

    /// Load-rule files in effect. Empty under component-load-config, even when
    /// load rules are configured.
    pub fn component_load_rules(&self) -> &[ResolvedLoadRule] {
        &self.load_rules
    }

    /// Components to exclude (or, for legacy definitions with
    /// `includeComponents`, to include). Empty unless the mode uses them.
    pub fn components(&self) -> &[ComponentHandle] {
        &self.components
    }

    pub fn include_components(&self) -> bool {
        self.include_components
    }

    pub fn create_folders_for_components(&self) -> bool {
        self.create_folders_for_components
    }

    pub fn accept_before_fetch(&self) -> bool {
        self.accept_before_fetch
    }

    pub fn is_delete_needed(&self) -> bool {
        self.delete_destination_before_fetch
    }

    pub fn fetch_destination(&self) -> Option<&str> {
        self.fetch_destination.as_deref()
    }

    pub fn load_method(&self) -> Option<&str> {
        self.load_method.as_deref()
    }

    pub fn definition_id(&self) -> Option<&str> {
        self.definition_id.as_deref()
    }

    pub fn workspace_name(&self) -> Option<&str> {
        self.workspace_name.as_deref()
    }

    pub fn snapshot_name(&self) -> Option<&str> {
        self.snapshot_name.as_deref()
    }

    /// Build properties after personal-build overrides and substitution.
    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    pub fn summary(&self) -> ConfigurationSummary {
        ConfigurationSummary {
            source: self.source_kind,
            mode: self.mode,
            scope: self.scope.clone(),
            definition_id: self.definition_id.clone(),
            workspace_name: self.workspace_name.clone(),
            snapshot_name: self.snapshot_name.clone(),
            personal_build: self.personal_build,
            load_policy_set: self.is_load_policy_set(),
            load_rules: self.load_rules.clone(),
            components: self.components.clone(),
            include_components: self.include_components,
            create_folders_for_components: self.create_folders_for_components,
            accept_before_fetch: self.accept_before_fetch,
            delete_destination_before_fetch: self.delete_destination_before_fetch,
            fetch_destination: self.fetch_destination.clone(),
            load_method: self.load_method.clone(),
            properties: self.properties.clone(),
        }
    }
}

/// Serializable snapshot of a [`BuildConfiguration`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSummary {
    pub source: SourceKind,
    pub mode: ResolutionMode,
    pub scope: Scope,
    pub definition_id: Option<String>,
    pub workspace_name: Option<String>,
    pub snapshot_name: Option<String>,
    pub personal_build: bool,
    pub load_policy_set: bool,
    pub load_rules: Vec<ResolvedLoadRule>,
    pub components: Vec<ComponentHandle>,
    pub include_components: bool,
    pub create_folders_for_components: bool,
    pub accept_before_fetch: bool,
    pub delete_destination_before_fetch: bool,
    pub fetch_destination: Option<String>,
    pub load_method: Option<String>,
    pub properties: PropertyBag,
}

/// Scope of a build definition: its build workspace.
fn build_workspace(properties: &PropertyBag, repository: &dyn RepositoryLookup) -> ConfigResult<Scope> {
    let raw = properties
        .value(keys::WORKSPACE_UUID)
        .ok_or_else(|| ConfigError::MissingProperty(keys::WORKSPACE_UUID.to_string()))?;
    let id = ItemId::parse_token(raw).ok_or_else(|| ConfigError::InvalidValue {
        property: keys::WORKSPACE_UUID.to_string(),
        value: raw.to_string(),
    })?;
    let name = repository
        .workspace_name(&id)?
        .ok_or(ConfigError::WorkspaceNotFound(id))?;
    Ok(Scope::workspace(id, name))
}
