//! Load policy precedence.
//!
//! Build definitions created before load policies existed carry neither
//! `loadPolicy` nor `componentLoadConfig`; they keep the legacy behaviour.
//! Ad-hoc workspace, stream and snapshot sources are always policy aware and
//! default to component-load-config when no policy is named.
//!
//! | source           | loadPolicy              | mode                           |
//! |------------------|-------------------------|--------------------------------|
//! | build definition | absent                  | `Legacy`                       |
//! | any              | `useLoadRules`          | `LoadRules`                    |
//! | any              | other value             | `ComponentLoadConfig`          |
//! | ad-hoc           | absent                  | `ComponentLoadConfig`          |

use serde::Serialize;
use tracing::warn;

/// Where the raw properties came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    BuildDefinition,
    Workspace,
    Stream,
    Snapshot,
}

impl SourceKind {
    pub fn is_build_definition(&self) -> bool {
        matches!(self, SourceKind::BuildDefinition)
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::BuildDefinition => write!(f, "build definition"),
            SourceKind::Workspace => write!(f, "workspace"),
            SourceKind::Stream => write!(f, "stream"),
            SourceKind::Snapshot => write!(f, "snapshot"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadPolicy {
    Unset,
    UseComponentLoadConfig,
    UseLoadRules,
}

impl LoadPolicy {
    pub const USE_COMPONENT_LOAD_CONFIG: &'static str = "useComponentLoadConfig";
    pub const USE_LOAD_RULES: &'static str = "useLoadRules";

    /// Parse a stored `loadPolicy` value.
    ///
    /// An unrecognised value still counts as a policy being set, which selects
    /// component-load-config.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None => LoadPolicy::Unset,
            Some(Self::USE_LOAD_RULES) => LoadPolicy::UseLoadRules,
            Some(Self::USE_COMPONENT_LOAD_CONFIG) => LoadPolicy::UseComponentLoadConfig,
            Some(other) => {
                warn!(value = other, "Unrecognised loadPolicy, using component load configuration");
                LoadPolicy::UseComponentLoadConfig
            }
        }
    }
}

impl std::fmt::Display for LoadPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadPolicy::Unset => write!(f, "unset"),
            LoadPolicy::UseComponentLoadConfig => write!(f, "{}", Self::USE_COMPONENT_LOAD_CONFIG),
            LoadPolicy::UseLoadRules => write!(f, "{}", Self::USE_LOAD_RULES),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentLoadConfig {
    Unset,
    LoadAllComponents,
    ExcludeSomeComponents,
}

impl ComponentLoadConfig {
    pub const LOAD_ALL_COMPONENTS: &'static str = "loadAllComponents";
    pub const EXCLUDE_SOME_COMPONENTS: &'static str = "excludeSomeComponents";

    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None => ComponentLoadConfig::Unset,
            Some(Self::EXCLUDE_SOME_COMPONENTS) => ComponentLoadConfig::ExcludeSomeComponents,
            Some(Self::LOAD_ALL_COMPONENTS) => ComponentLoadConfig::LoadAllComponents,
            Some(other) => {
                warn!(value = other, "Unrecognised componentLoadConfig, loading all components");
                ComponentLoadConfig::LoadAllComponents
            }
        }
    }
}

/// Which components are loaded under the component-load-config policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentSelection {
    LoadAll,
    ExcludeSome,
}

/// The single mode a resolution runs in. Selected once; everything else the
/// configuration reports is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionMode {
    /// Build definition without a stored load policy.
    Legacy,
    LoadRules,
    ComponentLoadConfig(ComponentSelection),
}

/// Select the resolution mode from the source kind and raw property values.
pub fn effective_mode(
    source: SourceKind,
    load_policy: LoadPolicy,
    component_load_config: ComponentLoadConfig,
) -> ResolutionMode {
    let policy_set = load_policy != LoadPolicy::Unset || !source.is_build_definition();
    if !policy_set {
        return ResolutionMode::Legacy;
    }
    if load_policy == LoadPolicy::UseLoadRules {
        return ResolutionMode::LoadRules;
    }
    match component_load_config {
        ComponentLoadConfig::ExcludeSomeComponents => {
            ResolutionMode::ComponentLoadConfig(ComponentSelection::ExcludeSome)
        }
        ComponentLoadConfig::LoadAllComponents | ComponentLoadConfig::Unset => {
            ResolutionMode::ComponentLoadConfig(ComponentSelection::LoadAll)
        }
    }
}

impl ResolutionMode {
    pub fn is_load_policy_set(&self) -> bool {
        !matches!(self, ResolutionMode::Legacy)
    }

    pub fn is_load_policy_set_to_use_load_rules(&self) -> bool {
        matches!(self, ResolutionMode::LoadRules)
    }

    pub fn is_load_policy_set_to_use_component_load_config(&self) -> bool {
        matches!(self, ResolutionMode::ComponentLoadConfig(_))
    }

    pub fn is_component_load_config_set_to_exclude_some_components(&self) -> bool {
        matches!(
            self,
            ResolutionMode::ComponentLoadConfig(ComponentSelection::ExcludeSome)
        )
    }

    /// Load rules dictate the on-disk layout, so they never get per-component
    /// folders.
    pub fn create_folders_for_components(&self, requested: bool) -> bool {
        requested && !self.is_load_policy_set_to_use_load_rules()
    }

    /// Whether the configured component list takes effect.
    pub fn uses_component_list(&self, list_configured: bool) -> bool {
        match self {
            ResolutionMode::Legacy => list_configured,
            ResolutionMode::ComponentLoadConfig(ComponentSelection::ExcludeSome) => true,
            _ => false,
        }
    }

    /// Whether the configured load rules take effect.
    pub fn uses_load_rules(&self, rules_configured: bool) -> bool {
        match self {
            ResolutionMode::Legacy => rules_configured,
            ResolutionMode::LoadRules => true,
            ResolutionMode::ComponentLoadConfig(_) => false,
        }
    }

    /// Multiple load-rule files and non-XML load rules are errors rather than
    /// deprecation warnings.
    pub fn strict_load_rules(&self) -> bool {
        self.is_load_policy_set_to_use_load_rules()
    }
}
