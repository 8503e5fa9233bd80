//! Resolution of component and file references within a workspace, stream or
//! snapshot.

use rtc_scm_core::{ComponentHandle, ItemId, RepositoryLookup, Scope, VersionableItem};
use serde::Serialize;
use tracing::debug;

use crate::error::{LookupError, LookupErrorKind};
use crate::path_spec::{ComponentRef, FileRef, LoadRulePathSpec};
use crate::ConfigResult;

/// A load-rule file confirmed to exist, and to be a file, in the scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLoadRule {
    pub component: ComponentHandle,
    pub file: VersionableItem,
}

/// Resolves references against one scope. Every lookup is a single call to
/// the repository; nothing is cached.
pub struct ScopeResolver<'a> {
    repository: &'a dyn RepositoryLookup,
    scope: &'a Scope,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(repository: &'a dyn RepositoryLookup, scope: &'a Scope) -> Self {
        Self { repository, scope }
    }

    pub fn scope(&self) -> &Scope {
        self.scope
    }

    /// Resolve a parsed `component/file` spec.
    pub fn resolve_spec(&self, spec: &LoadRulePathSpec) -> ConfigResult<ResolvedLoadRule> {
        self.resolve(&spec.component_ref(), &spec.file_ref())
    }

    pub fn resolve(
        &self,
        component: &ComponentRef,
        file: &FileRef,
    ) -> ConfigResult<ResolvedLoadRule> {
        let component = self.resolve_component(component)?;
        let file = self.resolve_file(&component, file)?;
        debug!(
            scope = %self.scope.name,
            component = %component.name,
            file = %file.path,
            "Resolved load rule file"
        );
        Ok(ResolvedLoadRule { component, file })
    }

    /// Resolve a component by id or by name.
    ///
    /// A name shared by several components in the scope is reported as a
    /// duplicate before any not-found handling happens.
    pub fn resolve_component(&self, component: &ComponentRef) -> ConfigResult<ComponentHandle> {
        match component {
            ComponentRef::Id(id) => {
                let Some(handle) = self.repository.component_by_id(id)? else {
                    return Err(self.error(LookupErrorKind::ComponentIdNotFound { id: *id }));
                };
                if !self.repository.is_member(self.scope, &handle)? {
                    return Err(self.error(LookupErrorKind::ComponentIdNotFoundInScope {
                        id: *id,
                        name: handle.name,
                    }));
                }
                Ok(handle)
            }
            ComponentRef::Name(name) => {
                let mut matches = self.repository.components_by_name(self.scope, name)?;
                if matches.len() > 1 {
                    return Err(self.error(LookupErrorKind::DuplicateComponentName {
                        name: name.clone(),
                        count: matches.len(),
                    }));
                }
                if let Some(handle) = matches.pop() {
                    return Ok(handle);
                }

                let elsewhere = self.repository.repository_components_by_name(name)?;
                let kind = if elsewhere.is_empty() {
                    LookupErrorKind::ComponentNotFound { name: name.clone() }
                } else {
                    LookupErrorKind::ComponentNotFoundInScope { name: name.clone() }
                };
                Err(self.error(kind))
            }
        }
    }

    /// Look a component id up anywhere in the repository, without any scope
    /// membership check.
    pub fn find_component_by_id(&self, id: &ItemId) -> ConfigResult<Option<ComponentHandle>> {
        Ok(self.repository.component_by_id(id)?)
    }

    /// Resolve a file in the component's tree as configured in the scope.
    pub fn resolve_file(
        &self,
        component: &ComponentHandle,
        file: &FileRef,
    ) -> ConfigResult<VersionableItem> {
        let item = match file {
            FileRef::Id(id) => self.repository.file_by_id(self.scope, component, id)?,
            FileRef::Path(path) => self.repository.file_by_path(self.scope, component, path)?,
        };

        let Some(item) = item else {
            return Err(self.error(LookupErrorKind::FileNotFound {
                component: component.name.clone(),
                file: file.clone(),
            }));
        };
        if item.is_folder() {
            return Err(self.error(LookupErrorKind::NotAFile {
                component: component.name.clone(),
                file: file.clone(),
            }));
        }
        Ok(item)
    }

    /// Contents of a resolved load-rule file.
    pub fn load_rule_contents(&self, rule: &ResolvedLoadRule) -> ConfigResult<String> {
        Ok(self
            .repository
            .file_contents(self.scope, &rule.component, &rule.file)?)
    }

    fn error(&self, kind: LookupErrorKind) -> crate::ConfigError {
        LookupError::new(self.scope, kind).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use crate::path_spec::parse;
    use rtc_scm_core::{InMemoryRepository, RepositoryError, ScopeKind};

    struct Fixture {
        repo: InMemoryRepository,
        scope: Scope,
        comp: ComponentHandle,
        outsider: ComponentHandle,
        rule: VersionableItem,
        folder: VersionableItem,
    }

    fn fixture(kind: ScopeKind) -> Fixture {
        let mut repo = InMemoryRepository::new();
        let comp = repo.add_component("Comp");
        let outsider = repo.add_component("Outsider");
        let scope = repo.add_scope(kind, "Build Scope", &[&comp]);
        let rule = repo.add_file(&comp, "/sub/deep/ws.loadRule", "<?xml version=\"1.0\"?>");
        let folder = repo.add_folder(&comp, "/sub");
        Fixture {
            repo,
            scope,
            comp,
            outsider,
            rule,
            folder,
        }
    }

    fn lookup_kind(result: ConfigResult<impl std::fmt::Debug>) -> LookupErrorKind {
        match result {
            Err(ConfigError::Lookup(err)) => err.kind,
            other => panic!("expected lookup error, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_by_name_and_path() {
        let f = fixture(ScopeKind::Workspace);
        let resolver = ScopeResolver::new(&f.repo, &f.scope);

        let resolved = resolver
            .resolve_spec(&parse("Comp/sub/deep/ws.loadRule").unwrap())
            .unwrap();
        assert_eq!(resolved.component, f.comp);
        assert_eq!(resolved.file, f.rule);
    }

    #[test]
    fn test_resolve_by_ids() {
        let f = fixture(ScopeKind::Stream);
        let resolver = ScopeResolver::new(&f.repo, &f.scope);

        let spec = parse(&format!("{}/{}", f.comp.id, f.rule.id)).unwrap();
        let resolved = resolver.resolve_spec(&spec).unwrap();
        assert_eq!(resolved.file.id, f.rule.id);
    }

    #[test]
    fn test_unknown_component_id() {
        let f = fixture(ScopeKind::Snapshot);
        let resolver = ScopeResolver::new(&f.repo, &f.scope);
        let id = ItemId::new();

        let kind = lookup_kind(resolver.resolve_component(&ComponentRef::Id(id)));
        assert_eq!(kind, LookupErrorKind::ComponentIdNotFound { id });
    }

    #[test]
    fn test_component_id_outside_scope() {
        let f = fixture(ScopeKind::Workspace);
        let resolver = ScopeResolver::new(&f.repo, &f.scope);

        let kind = lookup_kind(resolver.resolve_component(&ComponentRef::Id(f.outsider.id)));
        assert_eq!(
            kind,
            LookupErrorKind::ComponentIdNotFoundInScope {
                id: f.outsider.id,
                name: "Outsider".to_string(),
            }
        );
    }

    #[test]
    fn test_component_name_not_found() {
        let f = fixture(ScopeKind::Workspace);
        let resolver = ScopeResolver::new(&f.repo, &f.scope);

        let kind = lookup_kind(resolver.resolve_component(&ComponentRef::Name("Nope".into())));
        assert_eq!(
            kind,
            LookupErrorKind::ComponentNotFound {
                name: "Nope".to_string()
            }
        );

        let kind = lookup_kind(resolver.resolve_component(&ComponentRef::Name("Outsider".into())));
        assert_eq!(
            kind,
            LookupErrorKind::ComponentNotFoundInScope {
                name: "Outsider".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_component_name() {
        let mut f = fixture(ScopeKind::Stream);
        let twin = f.repo.add_component("Twin");
        let twin2 = f.repo.add_component("Twin");
        let scope = f.repo.add_scope(ScopeKind::Stream, "Twins", &[&twin, &twin2]);
        let resolver = ScopeResolver::new(&f.repo, &scope);

        let kind = lookup_kind(resolver.resolve_spec(&parse("Twin/ws.loadRule").unwrap()));
        assert_eq!(
            kind,
            LookupErrorKind::DuplicateComponentName {
                name: "Twin".to_string(),
                count: 2,
            }
        );
    }

    #[test]
    fn test_missing_file() {
        let f = fixture(ScopeKind::Workspace);
        let resolver = ScopeResolver::new(&f.repo, &f.scope);

        let kind = lookup_kind(resolver.resolve_spec(&parse("Comp/missing.loadRule").unwrap()));
        assert_eq!(
            kind,
            LookupErrorKind::FileNotFound {
                component: "Comp".to_string(),
                file: FileRef::Path("/missing.loadRule".to_string()),
            }
        );
    }

    #[test]
    fn test_folder_is_rejected() {
        let f = fixture(ScopeKind::Snapshot);
        let resolver = ScopeResolver::new(&f.repo, &f.scope);

        let kind = lookup_kind(resolver.resolve_spec(&parse("Comp/sub").unwrap()));
        assert!(matches!(kind, LookupErrorKind::NotAFile { file: FileRef::Path(_), .. }));

        let spec = parse(&format!("Comp/{}", f.folder.id)).unwrap();
        let kind = lookup_kind(resolver.resolve_spec(&spec));
        assert_eq!(
            kind,
            LookupErrorKind::NotAFile {
                component: "Comp".to_string(),
                file: FileRef::Id(f.folder.id),
            }
        );
    }

    #[test]
    fn test_repository_failure_propagates() {
        let mut f = fixture(ScopeKind::Workspace);
        f.repo.set_unavailable("offline");
        let resolver = ScopeResolver::new(&f.repo, &f.scope);

        let err = resolver.resolve_spec(&parse("Comp/ws.loadRule").unwrap()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Repository(RepositoryError::Unavailable(_))
        ));
    }
}
