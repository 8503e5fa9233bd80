//! Load-rule resolution and validation.

use indexmap::IndexMap;
use rtc_scm_core::{ConsoleOutput, ItemId};
use tracing::{debug, warn};

use crate::path_spec::parse_list;
use crate::scope::{ResolvedLoadRule, ScopeResolver};
use crate::{ConfigError, ConfigResult};

/// Resolve the serialized `componentLoadRules` value.
///
/// Repeated entries for the same file are resolved once. With `strict` set
/// (explicit `useLoadRules` policy) load-rule files from more than one
/// component, or a file not in XML format, is an error. Otherwise both are
/// accepted with a deprecation warning on the console.
pub fn resolve_load_rules(
    resolver: &ScopeResolver<'_>,
    raw: &str,
    strict: bool,
    console: &dyn ConsoleOutput,
) -> ConfigResult<Vec<ResolvedLoadRule>> {
    let specs = parse_list(raw)?;

    let mut resolved: IndexMap<(ItemId, ItemId), ResolvedLoadRule> = IndexMap::new();
    for spec in &specs {
        let rule = resolver.resolve_spec(spec)?;
        if resolved.contains_key(&(rule.component.id, rule.file.id)) {
            debug!(spec = %spec, "Skipping repeated load rule entry");
            continue;
        }
        resolved.insert((rule.component.id, rule.file.id), rule);
    }
    let rules: Vec<ResolvedLoadRule> = resolved.into_values().collect();

    let mut contributors: IndexMap<ItemId, &str> = IndexMap::new();
    for rule in &rules {
        contributors
            .entry(rule.component.id)
            .or_insert(rule.component.name.as_str());
    }
    if contributors.len() > 1 {
        let components: Vec<String> = contributors.values().map(|n| n.to_string()).collect();
        if strict {
            return Err(ConfigError::MultipleLoadRuleFiles { components });
        }
        warn!(?components, "Load rule files configured for multiple components");
        console.log(&format!(
            "Warning: load rule files are specified for more than one component ({}). \
             This is deprecated; use a single load rule file with the useLoadRules load policy.",
            components.join(", ")
        ));
    }

    for rule in &rules {
        let contents = resolver.load_rule_contents(rule)?;
        if !is_xml_load_rule(&contents) {
            if strict {
                return Err(ConfigError::LoadRulesNotInXmlFormat {
                    component: rule.component.name.clone(),
                    file: rule.file.path.clone(),
                });
            }
            console.log(&format!(
                "Warning: load rule file \"{}\" in component \"{}\" uses the old load rule format. \
                 This is deprecated; convert it to the XML format.",
                rule.file.path, rule.component.name
            ));
        }
    }

    Ok(rules)
}

/// Whether load-rule content is XML rather than the old line-based format.
pub fn is_xml_load_rule(contents: &str) -> bool {
    contents
        .trim_start_matches('\u{feff}')
        .trim_start()
        .starts_with('<')
}
