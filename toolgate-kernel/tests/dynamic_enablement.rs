use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Value, json};
use toolgate_config::{ConfigLoader, Overrides, ServerConfig};
use toolgate_kernel::dynamic::{ENABLE_TOOLSET, GET_TOOLSET_TOOLS, LIST_AVAILABLE_TOOLSETS};
use toolgate_kernel::{Server, ToolListEvent};
use toolgate_primitives::ToolsetId;
use toolgate_tools::{ErrorCategory, Operation, OperationKind, OperationMetadata, ToolError, Toolset};

fn operation(name: &str, kind: OperationKind) -> Operation {
    let owned = name.to_owned();
    Operation::new(
        OperationMetadata::new(name, format!("{name} operation"), kind).unwrap(),
        move |input: Value| {
            let name = owned.clone();
            async move { Ok::<_, ToolError>(json!({ "operation": name, "input": input })) }
        },
    )
}

fn toolset(id: &str, reads: &[&str], writes: &[&str]) -> Toolset {
    Toolset::new(ToolsetId::new(id).unwrap(), format!("{id} toolset"))
        .with_read_operations(reads.iter().map(|n| operation(n, OperationKind::Read)))
        .unwrap()
        .with_write_operations(writes.iter().map(|n| operation(n, OperationKind::Write)))
        .unwrap()
}

fn toolsets() -> Vec<Toolset> {
    vec![
        toolset("context", &["get_me"], &[]),
        toolset("repos", &["get_file_contents"], &["create_branch"]),
        toolset("issues", &["list_issues"], &["create_issue"]),
        toolset("pull_requests", &["list_pull_requests"], &["merge_pull_request"]),
        toolset("users", &["search_users"], &[]),
        toolset("actions", &["list_workflows"], &["run_workflow"]),
        toolset("gists", &["list_gists", "get_gist"], &["create_gist"]),
        toolset("labels", &[], &["create_label"]),
    ]
}

fn server(config: ServerConfig) -> Arc<Server> {
    Arc::new(
        Server::builder(config)
            .with_toolsets(toolsets())
            .build()
            .unwrap(),
    )
}

fn config_from(vars: &[(&str, &str)], overrides: Overrides) -> ServerConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    ConfigLoader::with_lookup(move |key: &str| vars.get(key).cloned())
        .load_with(overrides)
        .unwrap()
}

fn names(server: &Server) -> Vec<String> {
    server.list_tools().into_iter().map(|tool| tool.name).collect()
}

#[tokio::test]
async fn startup_resolves_environment_into_enabled_toolsets() {
    let config = config_from(
        &[("TOOLGATE_TOOLSETS", " actions ,  default  ,typo_repo")],
        Overrides::default(),
    );
    let server = server(config);

    assert_eq!(
        server.resolved_toolsets(),
        [
            "actions",
            "typo_repo",
            "context",
            "repos",
            "issues",
            "pull_requests",
            "users"
        ]
    );
    assert_eq!(server.invalid_toolsets(), ["typo_repo"]);
    assert_eq!(
        server.registry().enabled_ids(),
        ["context", "repos", "issues", "pull_requests", "users", "actions"]
    );
    assert!(names(&server).contains(&"run_workflow".to_owned()));
    assert!(!names(&server).contains(&"list_gists".to_owned()));
    assert!(server.instructions().contains("get_me"));
}

#[tokio::test]
async fn cli_overrides_replace_environment() {
    let config = config_from(
        &[("TOOLGATE_TOOLSETS", "all"), ("TOOLGATE_READ_ONLY", "false")],
        Overrides {
            toolsets: Some(vec!["gists".into()]),
            read_only: Some(true),
            dynamic_toolsets: None,
        },
    );
    let server = server(config);

    assert_eq!(server.registry().enabled_ids(), ["gists"]);
    assert_eq!(names(&server), ["list_gists", "get_gist"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn calls_after_enable_observe_the_toolset() {
    let server = server(ServerConfig {
        dynamic_toolsets: true,
        toolsets: vec![],
        ..ServerConfig::default()
    });

    let early = server.call("list_gists", json!({})).await;
    assert_eq!(early.error_kind, Some(ErrorCategory::NotEnabled));

    let enabled = server
        .call(ENABLE_TOOLSET, json!({ "toolset": "gists" }))
        .await;
    assert!(!enabled.is_error, "{enabled:?}");

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let server = Arc::clone(&server);
            let name = if i % 2 == 0 { "list_gists" } else { "get_gist" };
            tokio::spawn(async move { server.call(name, json!({ "i": i })).await })
        })
        .collect();
    for handle in handles {
        let response = handle.await.unwrap();
        assert!(!response.is_error, "{response:?}");
    }
}

#[tokio::test]
async fn numeric_disable_flag_suppresses_instructions() {
    let config = config_from(
        &[("TOOLGATE_DISABLE_INSTRUCTIONS", "1")],
        Overrides::default(),
    );
    assert!(config.disable_instructions);
    assert!(server(config).instructions().is_empty());
}

#[tokio::test]
async fn enable_reply_waits_for_publication() {
    let server = server(ServerConfig {
        dynamic_toolsets: true,
        toolsets: vec![],
        ..ServerConfig::default()
    });
    // Another caller flipped the flag and has not published yet.
    assert!(server.registry().activate("gists").unwrap().changed);

    let response = server
        .call(ENABLE_TOOLSET, json!({ "toolset": "gists" }))
        .await;
    assert!(!response.is_error);
    assert!(names(&server).contains(&"list_gists".to_owned()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_enables_publish_once() {
    let server = server(ServerConfig {
        dynamic_toolsets: true,
        toolsets: vec![],
        ..ServerConfig::default()
    });
    let mut events = server.subscribe();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            server
                .spawn_call(ENABLE_TOOLSET, json!({ "toolset": "issues" }))
                .unwrap()
        })
        .collect();
    let mut newly_enabled = 0;
    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert!(!response.is_error);
        assert!(names(&server).contains(&"list_issues".to_owned()));
        if response.content.get("tools").is_some() {
            newly_enabled += 1;
        }
    }
    assert_eq!(newly_enabled, 1);

    assert_eq!(
        events.recv().await.unwrap(),
        ToolListEvent::Changed {
            added: vec!["list_issues".into(), "create_issue".into()]
        }
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn read_only_never_surfaces_writes() {
    let server = server(ServerConfig {
        read_only: true,
        dynamic_toolsets: true,
        toolsets: vec!["default".into()],
        ..ServerConfig::default()
    });

    let response = server
        .call(ENABLE_TOOLSET, json!({ "toolset": "labels" }))
        .await;
    assert_eq!(response.error_kind, Some(ErrorCategory::Policy));

    for id in ["gists", "actions"] {
        let response = server.call(ENABLE_TOOLSET, json!({ "toolset": id })).await;
        assert!(!response.is_error);
    }
    assert!(
        server
            .list_tools()
            .iter()
            .all(|tool| tool.kind == OperationKind::Read)
    );
    assert!(
        server
            .registry()
            .list_enabled_operations(false)
            .iter()
            .all(|tool| tool.kind == OperationKind::Read)
    );

    let hidden = server.call("create_gist", json!({})).await;
    assert_eq!(hidden.error_kind, Some(ErrorCategory::NotFound));

    let listed = server.call(LIST_AVAILABLE_TOOLSETS, json!({})).await;
    let labels = listed
        .content
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["id"] == "labels")
        .unwrap()
        .clone();
    assert_eq!(labels["can_enable"], json!(false));
}

#[tokio::test]
async fn describe_after_enable_lists_operations() {
    let server = server(ServerConfig {
        dynamic_toolsets: true,
        toolsets: vec![],
        ..ServerConfig::default()
    });

    server
        .call(ENABLE_TOOLSET, json!({ "toolset": "gists" }))
        .await;
    let described = server
        .call(GET_TOOLSET_TOOLS, json!({ "toolset": "gists" }))
        .await;
    assert!(!described.is_error);
    assert_eq!(described.content["enabled"], json!(true));
    assert!(
        !described.content["read_operations"]
            .as_array()
            .unwrap()
            .is_empty()
    );

    let again = server
        .call(ENABLE_TOOLSET, json!({ "toolset": "gists" }))
        .await;
    assert!(!again.is_error);
    assert!(
        again.content["message"]
            .as_str()
            .unwrap()
            .contains("already enabled")
    );

    let unknown = server
        .call(ENABLE_TOOLSET, json!({ "toolset": "nope" }))
        .await;
    assert_eq!(unknown.error_kind, Some(ErrorCategory::NotFound));
}
