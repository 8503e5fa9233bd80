//! Offline load-configuration resolution.

use anyhow::{Context, Result};
use rtc_scm_config::BuildConfiguration;
use rtc_scm_config::descriptor::parse_source;
use rtc_scm_core::{InMemoryRepository, TracingConsole};
use tracing::info;

/// Resolve a source descriptor against a JSON repository snapshot.
pub fn resolve(source_path: &str, repository_path: &str, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(source_path)
        .with_context(|| format!("Failed to read source descriptor: {}", source_path))?;
    let source = parse_source(&content)
        .with_context(|| format!("Failed to parse source descriptor: {}", source_path))?;

    let repo_json = std::fs::read_to_string(repository_path)
        .with_context(|| format!("Failed to read repository file: {}", repository_path))?;
    let repository = InMemoryRepository::from_json(&repo_json)
        .with_context(|| format!("Failed to load repository: {}", repository_path))?;

    info!(source = %source.kind(), "Resolving load configuration");

    let config = BuildConfiguration::resolve(&source, &repository, &TracingConsole)
        .context("Failed to resolve load configuration")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config.summary())?);
        return Ok(());
    }

    println!("Source:      {}", config.source_kind());
    println!(
        "Scope:       {} \"{}\" ({})",
        config.scope().kind,
        config.scope().name,
        config.scope().id
    );
    if let Some(definition) = config.definition_id() {
        println!("Definition:  {}", definition);
    }
    if let Some(snapshot) = config.snapshot_name() {
        println!("Snapshot:    {}", snapshot);
    }
    println!("Mode:        {:?}", config.mode());
    if config.is_personal_build() {
        println!("Personal build");
    }

    if !config.component_load_rules().is_empty() {
        println!("\nLoad rules:");
        for rule in config.component_load_rules() {
            println!("  {}{}", rule.component.name, rule.file.path);
        }
    }

    if !config.components().is_empty() {
        let heading = if config.include_components() {
            "Included components"
        } else {
            "Excluded components"
        };
        println!("\n{}:", heading);
        for component in config.components() {
            println!("  {} ({})", component.name, component.id);
        }
    }

    println!();
    println!(
        "Create folders for components: {}",
        config.create_folders_for_components()
    );
    println!("Accept before fetch:           {}", config.accept_before_fetch());
    println!("Delete before fetch:           {}", config.is_delete_needed());
    if let Some(destination) = config.fetch_destination() {
        println!("Fetch destination:             {}", destination);
    }

    Ok(())
}
