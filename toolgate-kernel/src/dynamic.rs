//! Operations that let a client discover and enable toolsets at runtime.
//!
//! They are classified as reads because they never touch remote data, so
//! they stay available in read-only mode.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use toolgate_primitives::ToolsetId;
use toolgate_primitives::catalog::DYNAMIC;
use toolgate_tools::{
    Operation, OperationDescriptor, OperationHandler, OperationMetadata, ToolError, ToolResult,
    Toolset, ToolsetGroup,
};
use tracing::info;

use crate::advertised::AdvertisedTools;
use crate::error::ServerResult;

/// Lists every toolset with its enabled flag.
pub const LIST_AVAILABLE_TOOLSETS: &str = "list_available_toolsets";
/// Lists the operations of one toolset.
pub const GET_TOOLSET_TOOLS: &str = "get_toolset_tools";
/// Enables one toolset and advertises its operations.
pub const ENABLE_TOOLSET: &str = "enable_toolset";

#[derive(Debug, Deserialize)]
struct ToolsetArgs {
    toolset: String,
}

fn parse_args(input: Value) -> ToolResult<ToolsetArgs> {
    serde_json::from_value(input).map_err(|err| {
        ToolError::invalid_input(format!("expected a string `toolset` argument: {err}"))
    })
}

fn upgrade(group: &Weak<ToolsetGroup>) -> ToolResult<Arc<ToolsetGroup>> {
    group
        .upgrade()
        .ok_or_else(|| ToolError::execution("toolset registry is no longer available"))
}

fn brief(operations: &[OperationDescriptor]) -> Vec<Value> {
    operations
        .iter()
        .map(|op| json!({ "name": op.name, "description": op.description }))
        .collect()
}

struct ListAvailableToolsets {
    group: Weak<ToolsetGroup>,
}

#[async_trait]
impl OperationHandler for ListAvailableToolsets {
    async fn invoke(&self, _input: Value) -> ToolResult<Value> {
        let toolsets: Vec<_> = upgrade(&self.group)?
            .list_toolsets()
            .into_iter()
            .filter(|summary| summary.id != DYNAMIC.id)
            .collect();
        serde_json::to_value(toolsets).map_err(|err| ToolError::execution(err.to_string()))
    }
}

struct GetToolsetTools {
    group: Weak<ToolsetGroup>,
}

#[async_trait]
impl OperationHandler for GetToolsetTools {
    async fn invoke(&self, input: Value) -> ToolResult<Value> {
        let ToolsetArgs { toolset } = parse_args(input)?;
        let snapshot = upgrade(&self.group)?.describe(&toolset)?;
        Ok(json!({
            "toolset": snapshot.id,
            "description": snapshot.description,
            "enabled": snapshot.enabled,
            "read_operations": brief(&snapshot.read_operations),
            "write_operations": brief(&snapshot.write_operations),
        }))
    }
}

struct EnableToolset {
    group: Weak<ToolsetGroup>,
    advertised: Arc<AdvertisedTools>,
}

#[async_trait]
impl OperationHandler for EnableToolset {
    async fn invoke(&self, input: Value) -> ToolResult<Value> {
        let ToolsetArgs { toolset } = parse_args(input)?;
        let group = upgrade(&self.group)?;
        let activation = group.activate(&toolset)?;
        if !activation.changed {
            // A concurrent caller may have flipped the flag without publishing
            // yet; publishing is idempotent, so the list is complete on return.
            let snapshot = group.describe(&toolset)?;
            self.advertised.publish(
                snapshot
                    .read_operations
                    .into_iter()
                    .chain(snapshot.write_operations)
                    .collect(),
            );
            return Ok(json!({
                "toolset": toolset,
                "enabled": true,
                "message": format!("toolset `{toolset}` is already enabled"),
            }));
        }

        // The registry flag is already set, so dispatch accepts these
        // operations before the list update reaches the client.
        let added = self.advertised.publish(activation.operations);
        info!(toolset = %toolset, tools = added.len(), "toolset operations advertised");
        Ok(json!({
            "toolset": toolset,
            "enabled": true,
            "message": format!("enabled toolset `{toolset}`"),
            "tools": added,
        }))
    }
}

fn toolset_argument_schema(ids: &[String]) -> Value {
    json!({
        "type": "object",
        "properties": {
            "toolset": {
                "type": "string",
                "description": "Identifier of the toolset",
                "enum": ids,
            }
        },
        "required": ["toolset"],
    })
}

/// Builds the always-enabled `dynamic` toolset for `group`.
///
/// Add it after every other toolset so the argument schemas can enumerate
/// their identifiers. The handlers keep only a weak reference to `group`,
/// which owns them once the toolset is registered.
///
/// # Errors
///
/// Returns an error if the built-in metadata fails validation.
pub fn dynamic_toolset(
    group: &Arc<ToolsetGroup>,
    advertised: &Arc<AdvertisedTools>,
) -> ServerResult<Toolset> {
    let ids = group.toolset_ids();
    let weak = Arc::downgrade(group);

    let list = Operation::new(
        OperationMetadata::read(
            LIST_AVAILABLE_TOOLSETS,
            "List the toolsets that can be enabled, and whether each is enabled already",
        )?
        .with_title("List available toolsets")
        .with_input_schema(json!({ "type": "object", "properties": {} })),
        ListAvailableToolsets {
            group: Weak::clone(&weak),
        },
    );
    let describe = Operation::new(
        OperationMetadata::read(
            GET_TOOLSET_TOOLS,
            "List the tools a toolset provides, to decide whether it is worth enabling",
        )?
        .with_title("List tools in a toolset")
        .with_input_schema(toolset_argument_schema(&ids)),
        GetToolsetTools {
            group: Weak::clone(&weak),
        },
    );
    let enable = Operation::new(
        OperationMetadata::read(ENABLE_TOOLSET, "Enable a toolset so its tools can be called")?
            .with_title("Enable a toolset")
            .with_input_schema(toolset_argument_schema(&ids)),
        EnableToolset {
            group: weak,
            advertised: Arc::clone(advertised),
        },
    );

    Ok(Toolset::new(ToolsetId::new(DYNAMIC.id)?, DYNAMIC.description)
        .with_read_operations([list, describe, enable])?
        .always_enabled())
}

#[cfg(test)]
mod tests {
    use toolgate_tools::{ErrorCategory, OperationKind};

    use super::*;

    fn op(name: &str, kind: OperationKind) -> Operation {
        Operation::new(
            OperationMetadata::new(name, format!("{name} operation"), kind).unwrap(),
            |_input: Value| async move { Ok::<_, ToolError>(Value::Null) },
        )
    }

    fn setup(read_only: bool) -> (Arc<ToolsetGroup>, Arc<AdvertisedTools>) {
        let group = Arc::new(ToolsetGroup::new(read_only));
        group
            .add_toolset(
                Toolset::new(ToolsetId::new("gists").unwrap(), "Gists")
                    .with_read_operations([op("list_gists", OperationKind::Read)])
                    .unwrap()
                    .with_write_operations([op("create_gist", OperationKind::Write)])
                    .unwrap(),
            )
            .unwrap();
        group
            .add_toolset(
                Toolset::new(ToolsetId::new("labels").unwrap(), "Labels")
                    .with_write_operations([op("create_label", OperationKind::Write)])
                    .unwrap(),
            )
            .unwrap();
        let advertised = Arc::new(AdvertisedTools::new());
        group
            .add_toolset(dynamic_toolset(&group, &advertised).unwrap())
            .unwrap();
        (group, advertised)
    }

    async fn call(group: &ToolsetGroup, name: &str, input: Value) -> ToolResult<Value> {
        group.resolve_for_dispatch(name)?.invoke(input).await
    }

    #[test]
    fn meta_operations_are_always_enabled_reads() {
        let (group, _) = setup(true);
        let snapshot = group.get(DYNAMIC.id).unwrap();
        assert!(snapshot.enabled);
        assert_eq!(snapshot.read_operations.len(), 3);
        assert!(snapshot.write_operations.is_empty());
        assert!(group.set_enabled(DYNAMIC.id, false).is_err());
        assert!(group.resolve_for_dispatch(ENABLE_TOOLSET).is_ok());
    }

    #[tokio::test]
    async fn lists_toolsets_without_itself() {
        let (group, _) = setup(false);
        let listed = call(&group, LIST_AVAILABLE_TOOLSETS, json!({})).await.unwrap();
        let ids: Vec<_> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["gists", "labels"]);
        assert_eq!(listed[0]["enabled"], json!(false));
    }

    #[tokio::test]
    async fn enable_publishes_then_reports_already_enabled() {
        let (group, advertised) = setup(false);
        let mut events = advertised.subscribe();

        let first = call(&group, ENABLE_TOOLSET, json!({ "toolset": "gists" }))
            .await
            .unwrap();
        assert_eq!(first["tools"], json!(["list_gists", "create_gist"]));
        assert!(group.is_enabled("gists"));
        assert!(advertised.contains("create_gist"));
        assert!(events.try_recv().is_ok());

        let second = call(&group, ENABLE_TOOLSET, json!({ "toolset": "gists" }))
            .await
            .unwrap();
        assert!(second["message"].as_str().unwrap().contains("already enabled"));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn already_enabled_reply_implies_advertised() {
        let (group, advertised) = setup(false);
        // Flag flipped by another caller that has not published yet.
        assert!(group.activate("gists").unwrap().changed);
        assert!(!advertised.contains("list_gists"));

        let reply = call(&group, ENABLE_TOOLSET, json!({ "toolset": "gists" }))
            .await
            .unwrap();
        assert!(reply["message"].as_str().unwrap().contains("already enabled"));
        assert!(advertised.contains("list_gists"));
        assert!(advertised.contains("create_gist"));
    }

    #[tokio::test]
    async fn read_only_refuses_write_only_toolsets() {
        let (group, advertised) = setup(true);
        let err = call(&group, ENABLE_TOOLSET, json!({ "toolset": "labels" }))
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Policy);
        assert!(!group.is_enabled("labels"));

        let enabled = call(&group, ENABLE_TOOLSET, json!({ "toolset": "gists" }))
            .await
            .unwrap();
        assert_eq!(enabled["tools"], json!(["list_gists"]));
        assert!(!advertised.contains("create_gist"));
    }

    #[tokio::test]
    async fn describe_hides_writes_under_read_only() {
        let (group, _) = setup(true);
        let tools = call(&group, GET_TOOLSET_TOOLS, json!({ "toolset": "gists" }))
            .await
            .unwrap();
        assert_eq!(tools["read_operations"][0]["name"], json!("list_gists"));
        assert_eq!(tools["write_operations"], json!([]));
    }

    #[tokio::test]
    async fn bad_arguments_are_validation_errors() {
        let (group, _) = setup(false);
        for input in [json!({}), json!({ "toolset": 3 }), Value::Null] {
            let err = call(&group, ENABLE_TOOLSET, input).await.unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Validation);
        }
        let err = call(&group, GET_TOOLSET_TOOLS, json!({ "toolset": "nope" }))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn handlers_fail_cleanly_after_registry_drop() {
        let group = Arc::new(ToolsetGroup::new(false));
        let advertised = Arc::new(AdvertisedTools::new());
        let toolset = dynamic_toolset(&group, &advertised).unwrap();
        let enable = Arc::clone(toolset.operation(ENABLE_TOOLSET).unwrap());
        drop(toolset);
        drop(group);

        let err = enable
            .invoke(json!({ "toolset": "gists" }))
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Execution);
    }
}
