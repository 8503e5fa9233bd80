//! Load-configuration resolution for RTC SCM builds.
//!
//! This crate decides what a build loads, how, and from where:
//! - Load-rule path specs (`component/file`)
//! - Resolution of components and files within a workspace, stream or snapshot
//! - Load policy precedence between legacy and policy-aware configurations
//! - Personal-build overrides and `${name}` property substitution
//! - KDL descriptors for build sources

pub mod build_config;
pub mod components;
pub mod descriptor;
pub mod error;
pub mod load_rules;
pub mod messages;
pub mod path_spec;
pub mod policy;
pub mod properties;
pub mod scope;
pub mod source;

pub use build_config::{BuildConfiguration, ConfigurationSummary};
pub use error::{ConfigError, ConfigResult, LookupError, LookupErrorKind};
pub use path_spec::{ComponentRef, FileRef, LoadRulePathSpec, PathSpecError};
pub use policy::{
    ComponentLoadConfig, ComponentSelection, LoadPolicy, ResolutionMode, SourceKind,
    effective_mode,
};
pub use properties::{PropertyBag, keys};
pub use scope::{ResolvedLoadRule, ScopeResolver};
pub use source::{ConfigurationSource, LoadOptionsBuilder};
