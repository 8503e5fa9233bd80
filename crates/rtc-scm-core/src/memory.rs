//! In-memory repository, loadable from a JSON snapshot.
//!
//! Used for offline resolution from the CLI and as the lookup backend in tests.
//! Files belong to a component and are visible in every scope the component is
//! a member of.

use serde::{Deserialize, Serialize};

use crate::repository::{
    ComponentHandle, ItemKind, RepositoryLookup, Scope, ScopeKind, VersionableItem,
};
use crate::{ItemId, RepositoryError, RepositoryResult};

/// A workspace, stream or snapshot with its component membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeRecord {
    pub kind: ScopeKind,
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub components: Vec<ItemId>,
}

/// A file or folder stored in a component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: ItemId,
    pub component: ItemId,
    pub path: String,
    #[serde(default = "default_kind")]
    pub kind: ItemKind,
    #[serde(default)]
    pub contents: String,
}

fn default_kind() -> ItemKind {
    ItemKind::File
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryRepository {
    #[serde(default)]
    pub components: Vec<ComponentHandle>,
    #[serde(default)]
    pub scopes: Vec<ScopeRecord>,
    #[serde(default)]
    pub files: Vec<FileRecord>,
    /// When set, every lookup fails with `RepositoryError::Unavailable`.
    #[serde(skip)]
    unavailable: Option<String>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a repository snapshot from JSON.
    pub fn from_json(json: &str) -> RepositoryResult<Self> {
        serde_json::from_str(json).map_err(|e| RepositoryError::InvalidData(e.to_string()))
    }

    /// Register a component with a fresh id.
    pub fn add_component(&mut self, name: &str) -> ComponentHandle {
        let component = ComponentHandle {
            id: ItemId::new(),
            name: name.to_string(),
        };
        self.components.push(component.clone());
        component
    }

    /// Register a scope containing `members`.
    pub fn add_scope(
        &mut self,
        kind: ScopeKind,
        name: &str,
        members: &[&ComponentHandle],
    ) -> Scope {
        let record = ScopeRecord {
            kind,
            id: ItemId::new(),
            name: name.to_string(),
            components: members.iter().map(|c| c.id).collect(),
        };
        let scope = Scope::new(kind, record.id, name);
        self.scopes.push(record);
        scope
    }

    /// Store a file in `component` at `path`.
    pub fn add_file(
        &mut self,
        component: &ComponentHandle,
        path: &str,
        contents: &str,
    ) -> VersionableItem {
        self.add_item(component, path, ItemKind::File, contents)
    }

    /// Store a folder in `component` at `path`.
    pub fn add_folder(&mut self, component: &ComponentHandle, path: &str) -> VersionableItem {
        self.add_item(component, path, ItemKind::Folder, "")
    }

    /// Make every subsequent lookup fail.
    pub fn set_unavailable(&mut self, reason: &str) {
        self.unavailable = Some(reason.to_string());
    }

    fn add_item(
        &mut self,
        component: &ComponentHandle,
        path: &str,
        kind: ItemKind,
        contents: &str,
    ) -> VersionableItem {
        let record = FileRecord {
            id: ItemId::new(),
            component: component.id,
            path: normalize_path(path),
            kind,
            contents: contents.to_string(),
        };
        let item = record.to_item();
        self.files.push(record);
        item
    }

    fn check_available(&self) -> RepositoryResult<()> {
        match &self.unavailable {
            Some(reason) => Err(RepositoryError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn scope_record(&self, scope: &Scope) -> Option<&ScopeRecord> {
        self.scopes
            .iter()
            .find(|s| s.id == scope.id && s.kind == scope.kind)
    }

    fn contains(&self, scope: &Scope, component: &ItemId) -> bool {
        self.scope_record(scope)
            .is_some_and(|s| s.components.contains(component))
    }

    fn find_file<F>(
        &self,
        scope: &Scope,
        component: &ComponentHandle,
        predicate: F,
    ) -> Option<VersionableItem>
    where
        F: Fn(&FileRecord) -> bool,
    {
        if !self.contains(scope, &component.id) {
            return None;
        }
        self.files
            .iter()
            .find(|f| f.component == component.id && predicate(f))
            .map(FileRecord::to_item)
    }
}

impl FileRecord {
    fn to_item(&self) -> VersionableItem {
        VersionableItem {
            id: self.id,
            path: normalize_path(&self.path),
            kind: self.kind,
        }
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

impl RepositoryLookup for InMemoryRepository {
    fn workspace_name(&self, id: &ItemId) -> RepositoryResult<Option<String>> {
        self.check_available()?;
        Ok(self
            .scopes
            .iter()
            .find(|s| s.kind == ScopeKind::Workspace && s.id == *id)
            .map(|s| s.name.clone()))
    }

    fn component_by_id(&self, id: &ItemId) -> RepositoryResult<Option<ComponentHandle>> {
        self.check_available()?;
        Ok(self.components.iter().find(|c| c.id == *id).cloned())
    }

    fn components_by_name(
        &self,
        scope: &Scope,
        name: &str,
    ) -> RepositoryResult<Vec<ComponentHandle>> {
        self.check_available()?;
        Ok(self
            .components
            .iter()
            .filter(|c| c.name == name && self.contains(scope, &c.id))
            .cloned()
            .collect())
    }

    fn repository_components_by_name(&self, name: &str) -> RepositoryResult<Vec<ComponentHandle>> {
        self.check_available()?;
        Ok(self
            .components
            .iter()
            .filter(|c| c.name == name)
            .cloned()
            .collect())
    }

    fn is_member(&self, scope: &Scope, component: &ComponentHandle) -> RepositoryResult<bool> {
        self.check_available()?;
        Ok(self.contains(scope, &component.id))
    }

    fn file_by_path(
        &self,
        scope: &Scope,
        component: &ComponentHandle,
        path: &str,
    ) -> RepositoryResult<Option<VersionableItem>> {
        self.check_available()?;
        let path = normalize_path(path);
        Ok(self.find_file(scope, component, |f| normalize_path(&f.path) == path))
    }

    fn file_by_id(
        &self,
        scope: &Scope,
        component: &ComponentHandle,
        id: &ItemId,
    ) -> RepositoryResult<Option<VersionableItem>> {
        self.check_available()?;
        Ok(self.find_file(scope, component, |f| f.id == *id))
    }

    fn file_contents(
        &self,
        scope: &Scope,
        component: &ComponentHandle,
        file: &VersionableItem,
    ) -> RepositoryResult<String> {
        self.check_available()?;
        if !self.contains(scope, &component.id) {
            return Err(RepositoryError::InvalidData(format!(
                "component '{}' is not in {} '{}'",
                component.name, scope.kind, scope.name
            )));
        }
        self.files
            .iter()
            .find(|f| f.id == file.id && f.kind == ItemKind::File)
            .map(|f| f.contents.clone())
            .ok_or_else(|| RepositoryError::InvalidData(format!("no file content for {}", file.id)))
    }
}
