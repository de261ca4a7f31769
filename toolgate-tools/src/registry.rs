//! Registry of toolsets shared between startup wiring, dispatch, and the
//! runtime enablement operations.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ToolError, ToolResult};
use crate::operation::{Operation, OperationDescriptor};
use crate::toolset::{PromptDefinition, ResourceTemplate, Toolset};

/// Options for [`ToolsetGroup::enable_toolsets`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EnableOptions {
    /// Fail on the first unknown identifier instead of skipping it.
    pub error_on_unknown: bool,
}

/// Listing entry for a registered toolset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsetSummary {
    /// Toolset identifier.
    pub id: String,
    /// Toolset description.
    pub description: String,
    /// Current enabled flag.
    pub enabled: bool,
    /// Whether enabling would expose at least one operation.
    pub can_enable: bool,
}

/// Point-in-time copy of a toolset's state and members.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolsetSnapshot {
    /// Toolset identifier.
    pub id: String,
    /// Toolset description.
    pub description: String,
    /// Enabled flag at the time of the snapshot.
    pub enabled: bool,
    /// Read operations.
    pub read_operations: Vec<OperationDescriptor>,
    /// Write operations.
    pub write_operations: Vec<OperationDescriptor>,
}

/// Outcome of [`ToolsetGroup::activate`].
#[derive(Clone, Debug, PartialEq)]
pub struct Activation {
    /// `false` when the toolset was already enabled.
    pub changed: bool,
    /// Operations that became visible; empty when nothing changed.
    pub operations: Vec<OperationDescriptor>,
}

#[derive(Default)]
struct GroupInner {
    toolsets: Vec<Toolset>,
    by_id: HashMap<String, usize>,
    by_operation: HashMap<String, usize>,
}

impl GroupInner {
    fn toolset(&self, id: &str) -> ToolResult<&Toolset> {
        self.by_id
            .get(id)
            .map(|&index| &self.toolsets[index])
            .ok_or_else(|| ToolError::ToolsetNotFound { id: id.to_owned() })
    }

    fn toolset_mut(&mut self, id: &str) -> ToolResult<&mut Toolset> {
        let index = *self
            .by_id
            .get(id)
            .ok_or_else(|| ToolError::ToolsetNotFound { id: id.to_owned() })?;
        Ok(&mut self.toolsets[index])
    }
}

/// Ordered collection of toolsets keyed by identifier, with a global
/// read-only mode.
///
/// Enabled flags live behind a read/write lock; operations are immutable
/// `Arc`s, so dispatch copies the handle out and runs it after the lock is
/// released. Read-only filtering happens at query time and never removes
/// stored write operations.
pub struct ToolsetGroup {
    read_only: bool,
    inner: RwLock<GroupInner>,
}

impl fmt::Debug for ToolsetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.read();
        let ids: Vec<_> = inner.toolsets.iter().map(|ts| ts.id().as_str()).collect();
        f.debug_struct("ToolsetGroup")
            .field("read_only", &self.read_only)
            .field("toolsets", &ids)
            .finish()
    }
}

impl ToolsetGroup {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(read_only: bool) -> Self {
        Self {
            read_only,
            inner: RwLock::new(GroupInner::default()),
        }
    }

    /// Returns `true` when write operations are hidden everywhere.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn read(&self) -> RwLockReadGuard<'_, GroupInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GroupInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a toolset.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::DuplicateToolset`] if the identifier is taken, or
    /// [`ToolError::DuplicateOperation`] if one of its operation names is
    /// already owned by another toolset.
    pub fn add_toolset(&self, toolset: Toolset) -> ToolResult<()> {
        let mut inner = self.write();
        let id = toolset.id().to_string();
        if inner.by_id.contains_key(&id) {
            return Err(ToolError::DuplicateToolset { id });
        }
        if let Some(name) = toolset
            .operation_names()
            .find(|name| inner.by_operation.contains_key(*name))
        {
            return Err(ToolError::DuplicateOperation {
                name: name.to_owned(),
            });
        }

        let index = inner.toolsets.len();
        for name in toolset.operation_names() {
            inner.by_operation.insert(name.to_owned(), index);
        }
        debug!(
            toolset = %id,
            reads = toolset.read_operations().len(),
            writes = toolset.write_operations().len(),
            enabled = toolset.is_enabled(),
            "toolset registered"
        );
        inner.by_id.insert(id, index);
        inner.toolsets.push(toolset);
        Ok(())
    }

    /// Returns a snapshot of the toolset, unfiltered. Never panics on a
    /// missing identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ToolsetSnapshot> {
        let inner = self.read();
        inner
            .toolset(id)
            .ok()
            .map(|toolset| snapshot(toolset, false))
    }

    /// Returns a snapshot with write operations hidden when the registry is
    /// read-only.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::ToolsetNotFound`] for an unknown identifier.
    pub fn describe(&self, id: &str) -> ToolResult<ToolsetSnapshot> {
        let inner = self.read();
        inner
            .toolset(id)
            .map(|toolset| snapshot(toolset, self.read_only))
    }

    /// Returns `true` if the toolset exists and is enabled.
    #[must_use]
    pub fn is_enabled(&self, id: &str) -> bool {
        self.read()
            .toolset(id)
            .is_ok_and(Toolset::is_enabled)
    }

    /// Sets a toolset's enabled flag, returning whether it changed.
    ///
    /// Idempotent: repeating the current state is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::ToolsetNotFound`] for an unknown identifier and
    /// [`ToolError::AlwaysEnabled`] when disabling a pinned toolset. The
    /// registry never creates toolsets implicitly.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> ToolResult<bool> {
        let changed = self.write().toolset_mut(id)?.set_enabled(enabled)?;
        if changed {
            info!(toolset = id, enabled, "toolset state changed");
        }
        Ok(changed)
    }

    /// Enables a toolset on behalf of a client, returning the operations it
    /// made visible.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::ToolsetNotFound`] for an unknown identifier and
    /// [`ToolError::ReadOnly`] when the toolset has only write operations and
    /// the registry is read-only.
    pub fn activate(&self, id: &str) -> ToolResult<Activation> {
        let mut inner = self.write();
        let toolset = inner.toolset_mut(id)?;
        if toolset.is_write_only_under(self.read_only) {
            return Err(ToolError::ReadOnly {
                toolset: id.to_owned(),
            });
        }
        let changed = toolset.set_enabled(true)?;
        let operations = if changed {
            toolset
                .available_operations(self.read_only)
                .map(|op| op.descriptor(id))
                .collect()
        } else {
            Vec::new()
        };
        drop(inner);

        if changed {
            info!(
                toolset = id,
                operations = operations.len(),
                "toolset enabled at runtime"
            );
        }
        Ok(Activation {
            changed,
            operations,
        })
    }

    /// Enables each listed toolset.
    ///
    /// Unknown identifiers are logged and skipped unless
    /// [`EnableOptions::error_on_unknown`] is set.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::ToolsetNotFound`] for the first unknown identifier
    /// when `error_on_unknown` is set.
    pub fn enable_toolsets<S>(&self, ids: &[S], options: EnableOptions) -> ToolResult<()>
    where
        S: AsRef<str>,
    {
        for id in ids {
            match self.set_enabled(id.as_ref(), true) {
                Ok(_) => {}
                Err(err @ ToolError::ToolsetNotFound { .. }) => {
                    if options.error_on_unknown {
                        return Err(err);
                    }
                    warn!(toolset = id.as_ref(), "skipping unknown toolset");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Operations of every enabled toolset. Write operations are included
    /// only if neither the registry nor `read_only_override` is read-only.
    #[must_use]
    pub fn list_enabled_operations(&self, read_only_override: bool) -> Vec<OperationDescriptor> {
        let read_only = self.read_only || read_only_override;
        let inner = self.read();
        inner
            .toolsets
            .iter()
            .filter(|toolset| toolset.is_enabled())
            .flat_map(|toolset| {
                let id = toolset.id().as_str();
                toolset
                    .available_operations(read_only)
                    .map(move |op| op.descriptor(id))
            })
            .collect()
    }

    /// Listing of every toolset in insertion order.
    #[must_use]
    pub fn list_toolsets(&self) -> Vec<ToolsetSummary> {
        self.read()
            .toolsets
            .iter()
            .map(|toolset| ToolsetSummary {
                id: toolset.id().to_string(),
                description: toolset.description().to_owned(),
                enabled: toolset.is_enabled(),
                can_enable: !toolset.is_write_only_under(self.read_only),
            })
            .collect()
    }

    /// Identifiers of every toolset in insertion order.
    #[must_use]
    pub fn toolset_ids(&self) -> Vec<String> {
        self.read()
            .toolsets
            .iter()
            .map(|toolset| toolset.id().to_string())
            .collect()
    }

    /// Identifiers of enabled toolsets in insertion order.
    #[must_use]
    pub fn enabled_ids(&self) -> Vec<String> {
        self.read()
            .toolsets
            .iter()
            .filter(|toolset| toolset.is_enabled())
            .map(|toolset| toolset.id().to_string())
            .collect()
    }

    /// Finds a visible operation by name regardless of its toolset's state.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::OperationNotFound`] if no toolset owns the name
    /// or the operation is a write hidden by read-only mode.
    pub fn find_operation(&self, name: &str) -> ToolResult<OperationDescriptor> {
        let inner = self.read();
        let (toolset, operation) = locate(&inner, name, self.read_only)?;
        Ok(operation.descriptor(toolset.id().as_str()))
    }

    /// Resolves an operation for dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::OperationNotFound`] for unknown or hidden
    /// operations and [`ToolError::ToolsetNotEnabled`] when the owning
    /// toolset is disabled.
    pub fn resolve_for_dispatch(&self, name: &str) -> ToolResult<Arc<Operation>> {
        let inner = self.read();
        let (toolset, operation) = locate(&inner, name, self.read_only)?;
        if !toolset.is_enabled() {
            return Err(ToolError::ToolsetNotEnabled {
                toolset: toolset.id().to_string(),
                operation: name.to_owned(),
            });
        }
        Ok(Arc::clone(operation))
    }

    /// Resource templates of enabled toolsets.
    #[must_use]
    pub fn enabled_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.read()
            .toolsets
            .iter()
            .filter(|toolset| toolset.is_enabled())
            .flat_map(|toolset| toolset.resource_templates().iter().cloned())
            .collect()
    }

    /// Prompts of enabled toolsets.
    #[must_use]
    pub fn enabled_prompts(&self) -> Vec<PromptDefinition> {
        self.read()
            .toolsets
            .iter()
            .filter(|toolset| toolset.is_enabled())
            .flat_map(|toolset| toolset.prompts().iter().cloned())
            .collect()
    }

    /// Number of registered toolsets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().toolsets.len()
    }

    /// Returns `true` when no toolsets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().toolsets.is_empty()
    }
}

fn locate<'a>(
    inner: &'a GroupInner,
    name: &str,
    read_only: bool,
) -> ToolResult<(&'a Toolset, &'a Arc<Operation>)> {
    let not_found = || ToolError::OperationNotFound {
        name: name.to_owned(),
    };
    let index = *inner.by_operation.get(name).ok_or_else(not_found)?;
    let toolset = &inner.toolsets[index];
    let operation = toolset
        .available_operations(read_only)
        .find(|op| op.name() == name)
        .ok_or_else(not_found)?;
    Ok((toolset, operation))
}

fn snapshot(toolset: &Toolset, read_only: bool) -> ToolsetSnapshot {
    let id = toolset.id().as_str();
    let describe = |ops: &[Arc<Operation>]| ops.iter().map(|op| op.descriptor(id)).collect();
    ToolsetSnapshot {
        id: id.to_owned(),
        description: toolset.description().to_owned(),
        enabled: toolset.is_enabled(),
        read_operations: describe(toolset.read_operations()),
        write_operations: if read_only {
            Vec::new()
        } else {
            describe(toolset.write_operations())
        },
    }
}
