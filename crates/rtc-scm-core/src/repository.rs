//! Repository handles and the read-only lookup contract.

use serde::{Deserialize, Serialize};

use crate::{ItemId, RepositoryResult};

/// Kind of configuration a load is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Workspace,
    Stream,
    Snapshot,
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeKind::Workspace => write!(f, "workspace"),
            ScopeKind::Stream => write!(f, "stream"),
            ScopeKind::Snapshot => write!(f, "snapshot"),
        }
    }
}

impl std::str::FromStr for ScopeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "workspace" => Ok(ScopeKind::Workspace),
            "stream" => Ok(ScopeKind::Stream),
            "snapshot" => Ok(ScopeKind::Snapshot),
            _ => Err(format!("Unknown scope kind: {}", s)),
        }
    }
}

/// A workspace, stream or snapshot that components and files are looked up in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub kind: ScopeKind,
    pub id: ItemId,
    pub name: String,
}

impl Scope {
    pub fn new(kind: ScopeKind, id: ItemId, name: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            name: name.into(),
        }
    }

    pub fn workspace(id: ItemId, name: impl Into<String>) -> Self {
        Self::new(ScopeKind::Workspace, id, name)
    }

    pub fn stream(id: ItemId, name: impl Into<String>) -> Self {
        Self::new(ScopeKind::Stream, id, name)
    }

    pub fn snapshot(id: ItemId, name: impl Into<String>) -> Self {
        Self::new(ScopeKind::Snapshot, id, name)
    }
}

/// Handle to a component in the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentHandle {
    pub id: ItemId,
    pub name: String,
}

/// Whether a versionable item is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Folder,
}

/// A file or folder in a component's version tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionableItem {
    pub id: ItemId,
    /// Path from the component root, always starting with `/`.
    pub path: String,
    pub kind: ItemKind,
}

impl VersionableItem {
    pub fn is_file(&self) -> bool {
        self.kind == ItemKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }
}

/// Read-only lookups against the SCM repository.
///
/// Every call is a single blocking round trip. Implementations own any
/// deadline, retry or cancellation policy.
pub trait RepositoryLookup: Send + Sync {
    /// Name of the repository workspace with the given id, if it exists.
    fn workspace_name(&self, id: &ItemId) -> RepositoryResult<Option<String>>;

    /// Component with the given id, anywhere in the repository.
    fn component_by_id(&self, id: &ItemId) -> RepositoryResult<Option<ComponentHandle>>;

    /// Components in `scope` whose name is exactly `name`.
    fn components_by_name(&self, scope: &Scope, name: &str)
    -> RepositoryResult<Vec<ComponentHandle>>;

    /// Components anywhere in the repository whose name is exactly `name`.
    fn repository_components_by_name(&self, name: &str) -> RepositoryResult<Vec<ComponentHandle>>;

    /// Whether `component` is part of `scope`.
    fn is_member(&self, scope: &Scope, component: &ComponentHandle) -> RepositoryResult<bool>;

    /// Item at `path` (starting with `/`) in the component's tree at `scope`.
    fn file_by_path(
        &self,
        scope: &Scope,
        component: &ComponentHandle,
        path: &str,
    ) -> RepositoryResult<Option<VersionableItem>>;

    /// Item with the given id in the component's tree at `scope`.
    fn file_by_id(
        &self,
        scope: &Scope,
        component: &ComponentHandle,
        id: &ItemId,
    ) -> RepositoryResult<Option<VersionableItem>>;

    /// Contents of a file as configured in `scope`.
    fn file_contents(
        &self,
        scope: &Scope,
        component: &ComponentHandle,
        file: &VersionableItem,
    ) -> RepositoryResult<String>;
}
