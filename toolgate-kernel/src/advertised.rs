//! The tool list as currently advertised to the client.
//!
//! The list only ever tells clients what they may call. Dispatch decides
//! from the registry, so a stale list never lets a disabled toolset through.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use tokio::sync::broadcast;
use toolgate_tools::OperationDescriptor;
use tracing::debug;

const EVENT_CAPACITY: usize = 16;

/// Notification sent after the advertised list changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolListEvent {
    /// Operations were added; carries their names.
    Changed {
        /// Names that became visible.
        added: Vec<String>,
    },
}

/// Shared, append-mostly list of advertised operations.
#[derive(Debug)]
pub struct AdvertisedTools {
    tools: RwLock<Vec<OperationDescriptor>>,
    events: broadcast::Sender<ToolListEvent>,
}

impl Default for AdvertisedTools {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvertisedTools {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            tools: RwLock::new(Vec::new()),
            events,
        }
    }

    /// Replaces the whole list without notifying subscribers. Used once the
    /// startup set is known.
    pub fn replace(&self, tools: Vec<OperationDescriptor>) {
        *self.tools.write().unwrap_or_else(PoisonError::into_inner) = tools;
    }

    /// Appends operations not already advertised and notifies subscribers.
    /// Returns the names actually added.
    pub fn publish(&self, operations: Vec<OperationDescriptor>) -> Vec<String> {
        let added: Vec<String> = {
            let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
            let mut known: HashSet<String> = tools.iter().map(|tool| tool.name.clone()).collect();
            let mut added = Vec::new();
            for operation in operations {
                if known.insert(operation.name.clone()) {
                    added.push(operation.name.clone());
                    tools.push(operation);
                }
            }
            added
        };

        if !added.is_empty() {
            debug!(added = ?added, "advertised tool list changed");
            // No subscribers is not an error.
            let _ = self.events.send(ToolListEvent::Changed {
                added: added.clone(),
            });
        }
        added
    }

    /// Copy of the current list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<OperationDescriptor> {
        self.tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` if an operation with this name is advertised.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|tool| tool.name == name)
    }

    /// Subscribes to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ToolListEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use toolgate_tools::OperationKind;

    use super::*;

    fn descriptor(name: &str) -> OperationDescriptor {
        OperationDescriptor {
            name: name.into(),
            description: format!("{name} operation"),
            title: None,
            kind: OperationKind::Read,
            toolset: "gists".into(),
            input_schema: json!({ "type": "object" }),
        }
    }

    #[tokio::test]
    async fn publish_appends_and_notifies() {
        let tools = AdvertisedTools::new();
        tools.replace(vec![descriptor("get_me")]);
        let mut events = tools.subscribe();

        let added = tools.publish(vec![descriptor("list_gists"), descriptor("get_me")]);
        assert_eq!(added, ["list_gists"]);
        assert!(tools.contains("list_gists"));
        assert_eq!(tools.snapshot().len(), 2);

        assert_eq!(
            events.recv().await.unwrap(),
            ToolListEvent::Changed {
                added: vec!["list_gists".into()]
            }
        );
    }

    #[test]
    fn publishing_nothing_new_is_silent() {
        let tools = AdvertisedTools::new();
        tools.replace(vec![descriptor("get_me")]);
        let mut events = tools.subscribe();

        assert!(tools.publish(vec![descriptor("get_me")]).is_empty());
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn publish_without_subscribers_succeeds() {
        let tools = AdvertisedTools::default();
        assert_eq!(tools.publish(vec![descriptor("a")]), ["a"]);
    }
}
