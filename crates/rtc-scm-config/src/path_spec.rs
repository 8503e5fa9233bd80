//! Load-rule path specs: `<componentNameOrId>/<filePathOrFileId>`.

use rtc_scm_core::ItemId;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathSpecError {
    #[error("load rule path '{0}' is not of the form <component>/<file>")]
    InvalidFormat(String),

    #[error("load rule path '{0}' does not name a component before the first '/'")]
    MissingComponent(String),

    #[error("load rule path '{0}' does not name a file after the component")]
    MissingFilePath(String),
}

/// A parsed `component/file` pair, not yet resolved against any scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LoadRulePathSpec {
    pub component: String,
    pub file: String,
}

impl LoadRulePathSpec {
    pub fn component_ref(&self) -> ComponentRef {
        ComponentRef::parse(&self.component)
    }

    pub fn file_ref(&self) -> FileRef {
        FileRef::parse(&self.file)
    }
}

impl std::fmt::Display for LoadRulePathSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.component, self.file)
    }
}

impl std::str::FromStr for LoadRulePathSpec {
    type Err = PathSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parse a single path spec. The file part may itself contain `/`.
pub fn parse(spec: &str) -> Result<LoadRulePathSpec, PathSpecError> {
    let spec = spec.trim();
    let Some((component, file)) = spec.split_once('/') else {
        return Err(PathSpecError::InvalidFormat(spec.to_string()));
    };

    if component.trim().is_empty() {
        return Err(PathSpecError::MissingComponent(spec.to_string()));
    }
    if file.trim().is_empty() {
        return Err(PathSpecError::MissingFilePath(spec.to_string()));
    }

    Ok(LoadRulePathSpec {
        component: component.trim().to_string(),
        file: file.trim().to_string(),
    })
}

/// Parse a serialized list of path specs separated by `;` or newlines.
pub fn parse_list(specs: &str) -> Result<Vec<LoadRulePathSpec>, PathSpecError> {
    specs
        .split([';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse)
        .collect()
}

/// Component half of a path spec or component-list token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentRef {
    Id(ItemId),
    Name(String),
}

impl ComponentRef {
    pub fn parse(token: &str) -> Self {
        match ItemId::parse_token(token) {
            Some(id) => ComponentRef::Id(id),
            None => ComponentRef::Name(token.trim().to_string()),
        }
    }
}

impl std::fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentRef::Id(id) => write!(f, "{}", id),
            ComponentRef::Name(name) => write!(f, "{}", name),
        }
    }
}

/// File half of a path spec: a file item id, or a path from the component root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileRef {
    Id(ItemId),
    /// Always starts with `/`.
    Path(String),
}

impl FileRef {
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match ItemId::parse_token(token) {
            Some(id) => FileRef::Id(id),
            None if token.starts_with('/') => FileRef::Path(token.to_string()),
            None => FileRef::Path(format!("/{}", token)),
        }
    }
}

impl std::fmt::Display for FileRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileRef::Id(id) => write!(f, "{}", id),
            FileRef::Path(path) => write!(f, "{}", path),
        }
    }
}
