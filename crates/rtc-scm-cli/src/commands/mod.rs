//! CLI command implementations.

pub mod resolve;

use anyhow::{Result, bail};
use rtc_scm_config::path_spec;
use rtc_scm_config::{ComponentRef, FileRef};

/// Parse each load-rule path spec and report how it would be looked up.
pub fn check_paths(specs: &[String]) -> Result<()> {
    let mut invalid = 0;
    for spec in specs {
        match path_spec::parse(spec) {
            Ok(parsed) => {
                let component = match parsed.component_ref() {
                    ComponentRef::Id(id) => format!("component id {}", id),
                    ComponentRef::Name(name) => format!("component \"{}\"", name),
                };
                let file = match parsed.file_ref() {
                    FileRef::Id(id) => format!("file id {}", id),
                    FileRef::Path(path) => format!("file {}", path),
                };
                println!("✓ {}: {}, {}", spec, component, file);
            }
            Err(e) => {
                println!("✗ {}: {}", spec, e);
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        bail!("{} of {} path specs are invalid", invalid, specs.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_paths_accepts_valid_specs() {
        let specs = vec![
            "Comp/rules/build.loadrule".to_string(),
            "5b0e2a7e-8e0c-4d0e-9a7b-2f4c2b7e9d11/ws.loadrule".to_string(),
        ];
        assert!(check_paths(&specs).is_ok());
    }

    #[test]
    fn test_check_paths_counts_invalid_specs() {
        let specs = vec![
            "Comp/ok.loadrule".to_string(),
            "testLoadRule".to_string(),
            "/ws.loadrule".to_string(),
        ];
        let err = check_paths(&specs).unwrap_err();
        assert_eq!(err.to_string(), "2 of 3 path specs are invalid");
    }
}
