//! Startup wiring and call dispatch.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use toolgate_config::{Resolution, ServerConfig};
use toolgate_primitives::{CallId, KnownToolsets};
use toolgate_prompts::InstructionComposer;
use toolgate_tools::{EnableOptions, OperationDescriptor, ToolResult, Toolset, ToolsetGroup};
use tracing::{debug, info};

use crate::advertised::{AdvertisedTools, ToolListEvent};
use crate::dynamic::dynamic_toolset;
use crate::envelope::CallResponse;
use crate::error::ServerResult;
use crate::scheduler::{SchedulerResult, TaskScheduler};

/// Assembles a [`Server`] from configuration and pre-built toolsets.
#[derive(Debug)]
pub struct ServerBuilder {
    config: ServerConfig,
    known: KnownToolsets,
    toolsets: Vec<Toolset>,
    scheduler: TaskScheduler,
    composer: Option<InstructionComposer>,
}

impl ServerBuilder {
    /// Starts from `config`, validating specifiers against the built-in catalog.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            known: KnownToolsets::catalog(),
            toolsets: Vec::new(),
            scheduler: TaskScheduler::default(),
            composer: None,
        }
    }

    /// Replaces the universe specifiers are validated against.
    #[must_use]
    pub fn with_known_toolsets(mut self, known: KnownToolsets) -> Self {
        self.known = known;
        self
    }

    /// Adds one toolset, disabled until resolution enables it.
    #[must_use]
    pub fn with_toolset(mut self, toolset: Toolset) -> Self {
        self.toolsets.push(toolset);
        self
    }

    /// Adds several toolsets in order.
    #[must_use]
    pub fn with_toolsets<I>(mut self, toolsets: I) -> Self
    where
        I: IntoIterator<Item = Toolset>,
    {
        self.toolsets.extend(toolsets);
        self
    }

    /// Uses a custom scheduler for [`Server::spawn_call`].
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: TaskScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Overrides the instruction composer. Defaults to one honouring
    /// [`ServerConfig::disable_instructions`].
    #[must_use]
    pub fn with_instruction_composer(mut self, composer: InstructionComposer) -> Self {
        self.composer = Some(composer);
        self
    }

    /// Resolves the configuration and wires the registry.
    ///
    /// Resolved identifiers without a supplied toolset are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Registration`](crate::ServerError::Registration)
    /// when two toolsets share an identifier or operation name.
    pub fn build(self) -> ServerResult<Server> {
        let Self {
            config,
            known,
            toolsets,
            scheduler,
            composer,
        } = self;

        let resolution = config.resolve_toolsets(&known);
        info!(
            enabled = ?resolution.enabled,
            invalid = ?resolution.invalid,
            read_only = config.read_only,
            dynamic = config.dynamic_toolsets,
            "toolsets resolved"
        );

        let group = Arc::new(ToolsetGroup::new(config.read_only));
        for toolset in toolsets {
            group.add_toolset(toolset)?;
        }
        group.enable_toolsets(&resolution.enabled, EnableOptions::default())?;

        let advertised = Arc::new(AdvertisedTools::new());
        if config.dynamic_toolsets {
            group.add_toolset(dynamic_toolset(&group, &advertised)?)?;
        }
        advertised.replace(group.list_enabled_operations(false));

        let composer =
            composer.unwrap_or_else(|| InstructionComposer::new(config.disable_instructions));
        let instructions = composer.compose(&group.enabled_ids());

        info!(
            toolsets = group.len(),
            tools = advertised.snapshot().len(),
            "server ready"
        );
        Ok(Server {
            group,
            advertised,
            scheduler,
            resolution,
            instructions,
        })
    }
}

/// A wired registry ready to serve calls.
#[derive(Debug)]
pub struct Server {
    group: Arc<ToolsetGroup>,
    advertised: Arc<AdvertisedTools>,
    scheduler: TaskScheduler,
    resolution: Resolution,
    instructions: String,
}

impl Server {
    /// Shorthand for [`ServerBuilder::new`].
    #[must_use]
    pub fn builder(config: ServerConfig) -> ServerBuilder {
        ServerBuilder::new(config)
    }

    /// The live registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ToolsetGroup> {
        &self.group
    }

    /// Instructions composed at startup; empty when disabled.
    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Identifiers enabled by configuration at startup.
    #[must_use]
    pub fn resolved_toolsets(&self) -> &[String] {
        &self.resolution.enabled
    }

    /// Specifiers that matched no known toolset.
    #[must_use]
    pub fn invalid_toolsets(&self) -> &[String] {
        &self.resolution.invalid
    }

    /// Operations currently advertised to the client.
    #[must_use]
    pub fn list_tools(&self) -> Vec<OperationDescriptor> {
        self.advertised.snapshot()
    }

    /// Subscribes to tool-list change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ToolListEvent> {
        self.advertised.subscribe()
    }

    /// Dispatches a call and returns the raw result.
    ///
    /// # Errors
    ///
    /// Returns the registry's dispatch error or whatever the handler returns.
    pub async fn try_call(&self, name: &str, arguments: Value) -> ToolResult<Value> {
        invoke(&self.group, name, arguments).await
    }

    /// Dispatches a call on the current task.
    pub async fn call(&self, name: &str, arguments: Value) -> CallResponse {
        dispatch(&self.group, name, arguments).await
    }

    /// Dispatches several calls concurrently on the current task. Responses
    /// are returned in request order.
    pub async fn call_all<I, S>(&self, calls: I) -> Vec<CallResponse>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        join_all(calls.into_iter().map(|(name, arguments)| async move {
            dispatch(&self.group, name.as_ref(), arguments).await
        }))
        .await
    }

    /// Dispatches a call on the scheduler so independent calls overlap.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Scheduler`](crate::ServerError::Scheduler) once
    /// the server is shutting down.
    pub fn spawn_call(
        &self,
        name: impl Into<String>,
        arguments: Value,
    ) -> ServerResult<JoinHandle<SchedulerResult<CallResponse>>> {
        let group = Arc::clone(&self.group);
        let name = name.into();
        let handle = self
            .scheduler
            .spawn(async move { dispatch(&group, &name, arguments).await })?;
        Ok(handle)
    }

    /// Stops accepting scheduled calls.
    pub fn shutdown(&self) {
        info!("server shutting down");
        self.scheduler.close();
    }
}

async fn invoke(group: &ToolsetGroup, name: &str, arguments: Value) -> ToolResult<Value> {
    // The lock is released before the handler runs.
    let operation = group.resolve_for_dispatch(name)?;
    operation.invoke(arguments).await
}

async fn dispatch(group: &ToolsetGroup, name: &str, arguments: Value) -> CallResponse {
    let call_id = CallId::new();
    debug!(%call_id, operation = name, "dispatching call");
    let result = invoke(group, name, arguments).await;
    if let Err(err) = &result {
        debug!(%call_id, operation = name, error = %err, "call failed");
    }
    CallResponse::from(result)
}
