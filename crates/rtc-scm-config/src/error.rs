//! Configuration resolution errors.

use rtc_scm_core::{ItemId, RepositoryError, Scope};
use thiserror::Error;

use crate::path_spec::{FileRef, PathSpecError};
use crate::policy::SourceKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("KDL parse error: {0}")]
    Parse(#[from] kdl::KdlError),

    #[error("invalid source descriptor: {0}")]
    Descriptor(String),

    #[error(transparent)]
    PathSpec(#[from] PathSpecError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(
        "load rule files were specified for more than one component ({}); only a single load rule file is supported when the load policy is useLoadRules",
        .components.join(", ")
    )]
    MultipleLoadRuleFiles { components: Vec<String> },

    #[error(
        "load rule file '{file}' in component '{component}' is not in XML format; it must be converted before it can be used with the useLoadRules load policy"
    )]
    LoadRulesNotInXmlFormat { component: String, file: String },

    #[error("personal build override of property '{property}' did not change its value '{value}'")]
    OverrideNotApplied { property: String, value: String },

    #[error("{0} sources do not take property overrides")]
    OverridesNotSupported(SourceKind),

    #[error("missing required property: {0}")]
    MissingProperty(String),

    #[error("invalid value for {property}: {value}")]
    InvalidValue { property: String, value: String },

    #[error("build workspace with ID {0} could not be found")]
    WorkspaceNotFound(ItemId),

    #[error("repository lookup failed: {0}")]
    Repository(#[from] RepositoryError),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// A component or file that could not be resolved within a scope.
///
/// Carries only identifiers; wording is chosen per scope kind by
/// [`crate::messages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupError {
    pub scope: Scope,
    pub kind: LookupErrorKind,
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::messages::lookup_message(self))
    }
}

impl std::error::Error for LookupError {}

impl LookupError {
    pub fn new(scope: &Scope, kind: LookupErrorKind) -> Self {
        Self {
            scope: scope.clone(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupErrorKind {
    /// No component with this id exists in the repository.
    ComponentIdNotFound { id: ItemId },
    /// The component exists but is not part of the scope.
    ComponentIdNotFoundInScope { id: ItemId, name: String },
    /// No component with this name exists in the repository.
    ComponentNotFound { name: String },
    /// Components with this name exist, but none in the scope.
    ComponentNotFoundInScope { name: String },
    /// More than one component in the scope has this name.
    DuplicateComponentName { name: String, count: usize },
    FileNotFound { component: String, file: FileRef },
    NotAFile { component: String, file: FileRef },
}
