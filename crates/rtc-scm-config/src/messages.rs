//! Operator-facing wording for lookup failures.
//!
//! The resolver only records what went wrong and where. The vocabulary an
//! operator sees (repository workspace, stream, snapshot) is chosen here.

use rtc_scm_core::{Scope, ScopeKind};

use crate::error::{LookupError, LookupErrorKind};
use crate::path_spec::FileRef;

/// How a scope is referred to in sentences, e.g. `repository workspace "ws"`.
pub fn scope_phrase(scope: &Scope) -> String {
    let noun = match scope.kind {
        ScopeKind::Workspace => "repository workspace",
        ScopeKind::Stream => "stream",
        ScopeKind::Snapshot => "snapshot",
    };
    format!("{} \"{}\"", noun, scope.name)
}

pub fn lookup_message(error: &LookupError) -> String {
    let scope = &error.scope;
    let phrase = scope_phrase(scope);

    match &error.kind {
        LookupErrorKind::ComponentIdNotFound { id } => format!(
            "Component with ID \"{}\" specified for {} could not be found in the repository",
            id, phrase
        ),
        LookupErrorKind::ComponentIdNotFoundInScope { id, name } => match scope.kind {
            ScopeKind::Workspace => format!(
                "Component \"{}\" with ID \"{}\" is not in {}",
                name, id, phrase
            ),
            ScopeKind::Stream => format!(
                "Component \"{}\" with ID \"{}\" is not part of the configuration of {}",
                name, id, phrase
            ),
            ScopeKind::Snapshot => format!(
                "Component \"{}\" with ID \"{}\" was not captured in {}",
                name, id, phrase
            ),
        },
        LookupErrorKind::ComponentNotFound { name } => format!(
            "Component \"{}\" specified for {} could not be found in the repository",
            name, phrase
        ),
        LookupErrorKind::ComponentNotFoundInScope { name } => match scope.kind {
            ScopeKind::Workspace => format!("Component \"{}\" is not in {}", name, phrase),
            ScopeKind::Stream => format!(
                "Component \"{}\" is not part of the configuration of {}",
                name, phrase
            ),
            ScopeKind::Snapshot => format!("Component \"{}\" was not captured in {}", name, phrase),
        },
        LookupErrorKind::DuplicateComponentName { name, count } => match scope.kind {
            ScopeKind::Workspace => format!(
                "{} components named \"{}\" were found in {}; specify the component by ID instead",
                count, name, phrase
            ),
            ScopeKind::Stream => format!(
                "{} has {} components named \"{}\"; specify the component by ID instead",
                capitalize(&phrase),
                count,
                name
            ),
            ScopeKind::Snapshot => format!(
                "{} captured {} components named \"{}\"; specify the component by ID instead",
                capitalize(&phrase),
                count,
                name
            ),
        },
        LookupErrorKind::FileNotFound { component, file } => match file {
            FileRef::Id(id) => format!(
                "File with ID \"{}\" could not be found in component \"{}\" of {}",
                id, component, phrase
            ),
            FileRef::Path(path) => format!(
                "File \"{}\" could not be found in component \"{}\" of {}",
                path, component, phrase
            ),
        },
        LookupErrorKind::NotAFile { component, file } => match file {
            FileRef::Id(id) => format!(
                "Item with ID \"{}\" in component \"{}\" of {} is a folder; load rules must be a file",
                id, component, phrase
            ),
            FileRef::Path(path) => format!(
                "Path \"{}\" in component \"{}\" of {} is a folder; load rules must be a file",
                path, component, phrase
            ),
        },
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
