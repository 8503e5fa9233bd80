//! Core domain types and collaborator traits for RTC SCM load configuration.
//!
//! This crate contains:
//! - Repository item identifiers
//! - Scope, component and file handles
//! - The read-only `RepositoryLookup` contract and an in-memory implementation
//! - The `ConsoleOutput` contract for build diagnostics

pub mod console;
pub mod error;
pub mod id;
pub mod memory;
pub mod repository;

pub use console::{BufferedConsole, ConsoleMessage, ConsoleOutput, TracingConsole};
pub use error::{RepositoryError, RepositoryResult};
pub use id::ItemId;
pub use memory::InMemoryRepository;
pub use repository::{
    ComponentHandle, ItemKind, RepositoryLookup, Scope, ScopeKind, VersionableItem,
};
