//! Invokable operations and their metadata.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ToolError, ToolResult};

const MAX_NAME_LEN: usize = 128;

/// Whether an operation only reads remote state or may change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Read-only operation, visible in read-only mode.
    Read,
    /// Mutating operation, hidden in read-only mode.
    Write,
}

/// Metadata describing a registered operation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OperationMetadata {
    name: String,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    kind: OperationKind,
    input_schema: Value,
}

impl OperationMetadata {
    /// Creates metadata for the supplied name and classification.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidMetadata`] if the name is empty, too long,
    /// or contains characters other than ASCII alphanumerics, `_` and `-`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: OperationKind,
    ) -> ToolResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            description: description.into(),
            title: None,
            kind,
            input_schema: json!({ "type": "object", "properties": {} }),
        })
    }

    /// Shorthand for [`OperationKind::Read`] metadata.
    ///
    /// # Errors
    ///
    /// See [`OperationMetadata::new`].
    pub fn read(name: impl Into<String>, description: impl Into<String>) -> ToolResult<Self> {
        Self::new(name, description, OperationKind::Read)
    }

    /// Shorthand for [`OperationKind::Write`] metadata.
    ///
    /// # Errors
    ///
    /// See [`OperationMetadata::new`].
    pub fn write(name: impl Into<String>, description: impl Into<String>) -> ToolResult<Self> {
        Self::new(name, description, OperationKind::Write)
    }

    /// Sets a short display title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the JSON schema describing accepted arguments.
    #[must_use]
    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    /// Returns the operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the optional display title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the read/write classification.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns the JSON input schema.
    #[must_use]
    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }
}

fn validate_name(name: &str) -> ToolResult<()> {
    if name.trim().is_empty() {
        return Err(ToolError::InvalidMetadata {
            reason: "operation name cannot be empty".into(),
        });
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ToolError::InvalidMetadata {
            reason: format!("operation name length must be <= {MAX_NAME_LEN}"),
        });
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ToolError::InvalidMetadata {
            reason: format!("operation name `{name}` contains unsupported characters"),
        });
    }
    Ok(())
}

/// Trait implemented by operation handlers.
#[async_trait]
pub trait OperationHandler: Send + Sync {
    /// Invokes the operation with the given JSON arguments, returning JSON output.
    async fn invoke(&self, input: Value) -> ToolResult<Value>;
}

#[async_trait]
impl<F, Fut> OperationHandler for F
where
    F: Send + Sync + Fn(Value) -> Fut,
    Fut: Future<Output = ToolResult<Value>> + Send,
{
    async fn invoke(&self, input: Value) -> ToolResult<Value> {
        (self)(input).await
    }
}

/// An operation: metadata plus the handler that carries it out.
///
/// Operations are immutable once built and are shared between the registry
/// and in-flight calls through `Arc`.
#[derive(Clone)]
pub struct Operation {
    metadata: OperationMetadata,
    handler: Arc<dyn OperationHandler>,
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.metadata.name)
            .field("kind", &self.metadata.kind)
            .finish_non_exhaustive()
    }
}

impl Operation {
    /// Pairs metadata with a handler.
    #[must_use]
    pub fn new<H>(metadata: OperationMetadata, handler: H) -> Self
    where
        H: OperationHandler + 'static,
    {
        Self {
            metadata,
            handler: Arc::new(handler),
        }
    }

    /// Returns the associated metadata.
    #[must_use]
    pub fn metadata(&self) -> &OperationMetadata {
        &self.metadata
    }

    /// Returns the operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata.name()
    }

    /// Returns the read/write classification.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.metadata.kind()
    }

    /// Executes the handler.
    ///
    /// # Errors
    ///
    /// Propagates whatever the handler returns.
    pub async fn invoke(&self, input: Value) -> ToolResult<Value> {
        self.handler.invoke(input).await
    }

    /// Builds the advertised view of this operation for the owning toolset.
    #[must_use]
    pub fn descriptor(&self, toolset: &str) -> OperationDescriptor {
        OperationDescriptor {
            name: self.metadata.name.clone(),
            description: self.metadata.description.clone(),
            title: self.metadata.title.clone(),
            kind: self.metadata.kind,
            toolset: toolset.to_owned(),
            input_schema: self.metadata.input_schema.clone(),
        }
    }
}

/// Handler-free view of an operation, as listed to clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Operation name.
    pub name: String,
    /// Operation description.
    pub description: String,
    /// Optional display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Read/write classification.
    pub kind: OperationKind,
    /// Owning toolset.
    pub toolset: String,
    /// JSON schema for the arguments.
    pub input_schema: Value,
}
