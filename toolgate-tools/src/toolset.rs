//! Named groups of operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use toolgate_primitives::ToolsetId;

use crate::error::{ToolError, ToolResult};
use crate::operation::{Operation, OperationKind};

/// Parameterised resource exposed alongside a toolset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTemplate {
    /// Template name.
    pub name: String,
    /// RFC 6570 URI template, e.g. `repo://{owner}/{repo}/contents{/path*}`.
    pub uri_template: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ResourceTemplate {
    /// Creates a template without a description.
    #[must_use]
    pub fn new(name: impl Into<String>, uri_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri_template: uri_template.into(),
            description: None,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Prompt shipped with a toolset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Prompt name.
    pub name: String,
    /// Prompt description.
    pub description: String,
}

impl PromptDefinition {
    /// Creates a prompt definition.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A named unit holding disjoint read and write operation collections.
///
/// Toolsets are built by their collaborators and handed to a
/// [`ToolsetGroup`](crate::ToolsetGroup), after which only the enabled flag
/// changes.
#[derive(Clone, Debug)]
pub struct Toolset {
    id: ToolsetId,
    description: String,
    read_operations: Vec<Arc<Operation>>,
    write_operations: Vec<Arc<Operation>>,
    resource_templates: Vec<ResourceTemplate>,
    prompts: Vec<PromptDefinition>,
    enabled: bool,
    always_enabled: bool,
}

impl Toolset {
    /// Creates an empty, disabled toolset.
    #[must_use]
    pub fn new(id: ToolsetId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            read_operations: Vec::new(),
            write_operations: Vec::new(),
            resource_templates: Vec::new(),
            prompts: Vec::new(),
            enabled: false,
            always_enabled: false,
        }
    }

    /// Adds read operations.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Misclassified`] if any operation is declared as a
    /// write, or [`ToolError::DuplicateOperation`] if a name is already
    /// present in this toolset.
    pub fn with_read_operations<I>(self, operations: I) -> ToolResult<Self>
    where
        I: IntoIterator<Item = Operation>,
    {
        self.with_operations(OperationKind::Read, operations)
    }

    /// Adds write operations.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Misclassified`] if any operation is declared as a
    /// read, or [`ToolError::DuplicateOperation`] if a name is already
    /// present in this toolset.
    pub fn with_write_operations<I>(self, operations: I) -> ToolResult<Self>
    where
        I: IntoIterator<Item = Operation>,
    {
        self.with_operations(OperationKind::Write, operations)
    }

    fn with_operations<I>(mut self, expected: OperationKind, operations: I) -> ToolResult<Self>
    where
        I: IntoIterator<Item = Operation>,
    {
        for operation in operations {
            if operation.kind() != expected {
                return Err(ToolError::Misclassified {
                    name: operation.name().to_owned(),
                    expected,
                    actual: operation.kind(),
                });
            }
            if self.operation(operation.name()).is_some() {
                return Err(ToolError::DuplicateOperation {
                    name: operation.name().to_owned(),
                });
            }
            let target = match expected {
                OperationKind::Read => &mut self.read_operations,
                OperationKind::Write => &mut self.write_operations,
            };
            target.push(Arc::new(operation));
        }
        Ok(self)
    }

    /// Adds resource templates.
    #[must_use]
    pub fn with_resource_templates<I>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = ResourceTemplate>,
    {
        self.resource_templates.extend(templates);
        self
    }

    /// Adds prompts.
    #[must_use]
    pub fn with_prompts<I>(mut self, prompts: I) -> Self
    where
        I: IntoIterator<Item = PromptDefinition>,
    {
        self.prompts.extend(prompts);
        self
    }

    /// Sets the initial enabled state.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled || self.always_enabled;
        self
    }

    /// Marks the toolset as enabled for its whole lifetime.
    #[must_use]
    pub fn always_enabled(mut self) -> Self {
        self.always_enabled = true;
        self.enabled = true;
        self
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> &ToolsetId {
        &self.id
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the read operations in registration order.
    #[must_use]
    pub fn read_operations(&self) -> &[Arc<Operation>] {
        &self.read_operations
    }

    /// Returns the write operations in registration order.
    #[must_use]
    pub fn write_operations(&self) -> &[Arc<Operation>] {
        &self.write_operations
    }

    /// Returns the resource templates.
    #[must_use]
    pub fn resource_templates(&self) -> &[ResourceTemplate] {
        &self.resource_templates
    }

    /// Returns the prompts.
    #[must_use]
    pub fn prompts(&self) -> &[PromptDefinition] {
        &self.prompts
    }

    /// Returns `true` if the toolset is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` if the toolset can never be disabled.
    #[must_use]
    pub fn is_always_enabled(&self) -> bool {
        self.always_enabled
    }

    /// Operations visible under the given read-only setting, regardless of
    /// the enabled flag. Reads come first.
    pub fn available_operations(&self, read_only: bool) -> impl Iterator<Item = &Arc<Operation>> {
        let writes: &[Arc<Operation>] = if read_only {
            &[]
        } else {
            &self.write_operations
        };
        self.read_operations.iter().chain(writes)
    }

    /// Every operation name, reads and writes.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.read_operations
            .iter()
            .chain(&self.write_operations)
            .map(|op| op.name())
    }

    /// Looks up an operation by name in either collection.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&Arc<Operation>> {
        self.read_operations
            .iter()
            .chain(&self.write_operations)
            .find(|op| op.name() == name)
    }

    /// Enabling would expose nothing: only write operations exist and the
    /// caller is read-only.
    #[must_use]
    pub fn is_write_only_under(&self, read_only: bool) -> bool {
        read_only && self.read_operations.is_empty() && !self.write_operations.is_empty()
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) -> ToolResult<bool> {
        if !enabled && self.always_enabled {
            return Err(ToolError::AlwaysEnabled {
                id: self.id.to_string(),
            });
        }
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        Ok(changed)
    }
}
