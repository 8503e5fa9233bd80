//! KDL descriptors for build sources.
//!
//! ```kdl
//! source "stream" id="1c9ad3c4-..." name="Build Stream" snapshot="nightly" {
//!     property "loadPolicy" "useLoadRules"
//!     property "componentLoadRules" "Comp/rules/build.loadrule"
//! }
//!
//! source "build-definition" id="my.build.definition" {
//!     property "workspaceUUID" "5b0e2a7e-..."
//!     personal-build {
//!         property "deleteDestinationBeforeFetch" #true
//!     }
//! }
//!
//! source "workspace" id="5b0e2a7e-..." name="Build Workspace" {
//!     property "fetchDestination" "${root}/src"
//!     overrides {
//!         property "root" "/tmp/build"
//!     }
//! }
//! ```

use kdl::{KdlDocument, KdlNode, KdlValue};
use rtc_scm_core::ItemId;

use crate::properties::PropertyBag;
use crate::source::{
    BuildDefinitionSource, ConfigurationSource, SnapshotSource, StreamSource, WorkspaceSource,
};
use crate::{ConfigError, ConfigResult};

/// Parse a build source descriptor from KDL text.
pub fn parse_source(kdl: &str) -> ConfigResult<ConfigurationSource> {
    let doc: KdlDocument = kdl.parse()?;

    let mut sources = doc.nodes().iter().filter(|n| n.name().value() == "source");
    let node = sources
        .next()
        .ok_or_else(|| ConfigError::Descriptor("missing source node".to_string()))?;
    if sources.next().is_some() {
        return Err(ConfigError::Descriptor(
            "only one source node is allowed".to_string(),
        ));
    }

    let kind = get_first_string_arg(node)
        .ok_or_else(|| ConfigError::Descriptor("source kind".to_string()))?;
    let overrides_block = match kind.as_str() {
        "build-definition" => Some("personal-build"),
        "workspace" => Some("overrides"),
        _ => None,
    };
    let properties = parse_properties(node.children(), overrides_block)?;

    match kind.as_str() {
        "build-definition" => {
            let definition_id = get_string_prop(node, "id")
                .ok_or_else(|| missing("id", &kind))?;
            let personal_build = parse_block(node, "personal-build")?;
            Ok(ConfigurationSource::BuildDefinition(BuildDefinitionSource {
                definition_id,
                properties,
                personal_build,
            }))
        }
        "workspace" => Ok(ConfigurationSource::Workspace(WorkspaceSource {
            workspace: get_id_prop(node, &kind)?,
            name: get_name_prop(node, &kind)?,
            properties,
            overrides: parse_block(node, "overrides")?,
        })),
        "stream" => Ok(ConfigurationSource::Stream(StreamSource {
            stream: get_id_prop(node, &kind)?,
            name: get_name_prop(node, &kind)?,
            base_workspace: get_string_prop(node, "base-workspace"),
            snapshot: get_string_prop(node, "snapshot"),
            properties,
        })),
        "snapshot" => Ok(ConfigurationSource::Snapshot(SnapshotSource {
            snapshot: get_id_prop(node, &kind)?,
            name: get_name_prop(node, &kind)?,
            properties,
        })),
        other => Err(ConfigError::Descriptor(format!(
            "unknown source kind: {}",
            other
        ))),
    }
}

/// Properties of a nested overrides block, if the source has one.
fn parse_block(node: &KdlNode, name: &str) -> ConfigResult<Option<PropertyBag>> {
    match child(node, name) {
        Some(block) => Ok(Some(parse_properties(block.children(), None)?)),
        None => Ok(None),
    }
}

/// Collect `property` nodes. `block` names the one nested block allowed
/// alongside them; any other node is rejected.
fn parse_properties(
    children: Option<&KdlDocument>,
    block: Option<&str>,
) -> ConfigResult<PropertyBag> {
    let mut properties = PropertyBag::new();
    let Some(children) = children else {
        return Ok(properties);
    };

    for node in children.nodes() {
        let name = node.name().value();
        if Some(name) == block {
            continue;
        }
        if name != "property" {
            return Err(ConfigError::Descriptor(format!("unexpected node '{}'", name)));
        }
        let args: Vec<&KdlValue> = node
            .entries()
            .iter()
            .filter(|e| e.name().is_none())
            .map(|e| e.value())
            .collect();
        let (Some(key), Some(value)) = (
            args.first().and_then(|v| v.as_string()),
            args.get(1).and_then(|v| value_to_string(v)),
        ) else {
            return Err(ConfigError::Descriptor(
                "property needs a name and a string or boolean value".to_string(),
            ));
        };
        properties.insert(key, value);
    }

    Ok(properties)
}

fn missing(field: &str, kind: &str) -> ConfigError {
    ConfigError::Descriptor(format!("{} source is missing '{}'", kind, field))
}

fn get_id_prop(node: &KdlNode, kind: &str) -> ConfigResult<ItemId> {
    let raw = get_string_prop(node, "id").ok_or_else(|| missing("id", kind))?;
    ItemId::parse_token(&raw)
        .ok_or_else(|| ConfigError::Descriptor(format!("invalid {} id: {}", kind, raw)))
}

fn get_name_prop(node: &KdlNode, kind: &str) -> ConfigResult<String> {
    get_string_prop(node, "name").ok_or_else(|| missing("name", kind))
}

// Helper functions for extracting values from KDL nodes

fn value_to_string(value: &KdlValue) -> Option<String> {
    value
        .as_string()
        .map(|s| s.to_string())
        .or_else(|| value.as_bool().map(|b| b.to_string()))
}

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_string_prop(node: &KdlNode, name: &str) -> Option<String> {
    node.get(name)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}

fn child<'a>(node: &'a KdlNode, name: &str) -> Option<&'a KdlNode> {
    node.children()?
        .nodes()
        .iter()
        .find(|c| c.name().value() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::SourceKind;

    #[test]
    fn test_parse_stream_source() {
        let id = ItemId::new();
        let kdl = format!(
            r#"
            source "stream" id="{id}" name="Build Stream" base-workspace="Stream WS" snapshot="nightly" {{
                property "loadPolicy" "useLoadRules"
                property "componentLoadRules" "Comp/rules/build.loadrule"
                property "createFoldersForComponents" #true
            }}
        "#
        );

        let source = parse_source(&kdl).unwrap();
        let ConfigurationSource::Stream(stream) = source else {
            panic!("expected stream source");
        };
        assert_eq!(stream.stream, id);
        assert_eq!(stream.name, "Build Stream");
        assert_eq!(stream.base_workspace.as_deref(), Some("Stream WS"));
        assert_eq!(stream.snapshot.as_deref(), Some("nightly"));
        assert_eq!(stream.properties.get("loadPolicy"), Some("useLoadRules"));
        assert_eq!(stream.properties.get("createFoldersForComponents"), Some("true"));
    }

    #[test]
    fn test_parse_build_definition_with_personal_build() {
        let kdl = r#"
            source "build-definition" id="my.def" {
                property "workspaceUUID" "5b0e2a7e-8e0c-4d0e-9a7b-2f4c2b7e9d11"
                property "propertyC" "original"
                personal-build {
                    property "propertyC" "overwritten"
                }
            }
        "#;

        let source = parse_source(kdl).unwrap();
        assert_eq!(source.kind(), SourceKind::BuildDefinition);
        let ConfigurationSource::BuildDefinition(def) = source else {
            panic!("expected build definition");
        };
        assert_eq!(def.definition_id, "my.def");
        assert_eq!(def.properties.len(), 2);
        let overrides = def.personal_build.unwrap();
        assert_eq!(overrides.get("propertyC"), Some("overwritten"));
    }

    #[test]
    fn test_missing_and_invalid_fields() {
        assert!(matches!(
            parse_source(r#"source "snapshot" name="snap""#),
            Err(ConfigError::Descriptor(_))
        ));
        assert!(matches!(
            parse_source(r#"source "workspace" id="not-an-id" name="ws""#),
            Err(ConfigError::Descriptor(_))
        ));
        assert!(matches!(
            parse_source(r#"source "branch" id="x""#),
            Err(ConfigError::Descriptor(_))
        ));
        assert!(matches!(
            parse_source("pipeline \"nope\""),
            Err(ConfigError::Descriptor(_))
        ));
    }

    #[test]
    fn test_property_needs_value() {
        let id = ItemId::new();
        let kdl = format!(
            r#"source "snapshot" id="{id}" name="snap" {{
                property "loadPolicy"
            }}"#
        );
        assert!(matches!(
            parse_source(&kdl),
            Err(ConfigError::Descriptor(_))
        ));
    }

    #[test]
    fn test_parse_workspace_overrides() {
        let id = ItemId::new();
        let kdl = format!(
            r#"source "workspace" id="{id}" name="ws" {{
                property "propertyC" "original"
                overrides {{
                    property "propertyC" "overwritten"
                }}
            }}"#
        );

        let source = parse_source(&kdl).unwrap();
        let overrides = source.overrides().unwrap();
        assert_eq!(overrides.get("propertyC"), Some("overwritten"));
        assert_eq!(source.properties().len(), 1);
    }

    #[test]
    fn test_unknown_child_nodes_rejected() {
        let id = ItemId::new();
        let misspelled = format!(
            r#"source "workspace" id="{id}" name="ws" {{
                proprety "loadPolicy" "useLoadRules"
            }}"#
        );
        assert!(matches!(
            parse_source(&misspelled),
            Err(ConfigError::Descriptor(ref msg)) if msg.contains("proprety")
        ));

        let snapshot_overrides = format!(
            r#"source "snapshot" id="{id}" name="snap" {{
                personal-build {{
                    property "a" "b"
                }}
            }}"#
        );
        assert!(matches!(
            parse_source(&snapshot_overrides),
            Err(ConfigError::Descriptor(_))
        ));

        let nested = r#"source "build-definition" id="def" {
            personal-build {
                personal-build
            }
        }"#;
        assert!(matches!(parse_source(nested), Err(ConfigError::Descriptor(_))));
    }

    #[test]
    fn test_invalid_kdl() {
        assert!(matches!(parse_source("source {"), Err(ConfigError::Parse(_))));
    }
}
