pub mod operations;
pub mod schemas;
pub mod types;

pub use operations::*;
pub use schemas::*;
pub use types::*;

use serde::{Deserialize, Serialize};

/// Root of the code model: the in-memory object graph describing an API
/// surface. Constructed once per generation run from the parsed wire
/// document, mutated in place by the transformation pipeline, and consumed
/// read-only by emission afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeModel {
    pub info: Info,

    pub schemas: Schemas,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operation_groups: Vec<OperationGroup>,

    /// Multi-client mode: each client owns its own operation groups. Both
    /// this and `operation_groups` are processed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clients: Vec<Client>,
}

impl CodeModel {
    /// Follow an operation handle. Returns `None` if the handle does not
    /// address an operation in this model.
    pub fn operation(&self, r: OperationRef) -> Option<&Operation> {
        let groups = match r.client {
            Some(c) => &self.clients.get(c)?.operation_groups,
            None => &self.operation_groups,
        };
        groups.get(r.group)?.operations.get(r.operation)
    }

    pub fn operation_mut(&mut self, r: OperationRef) -> Option<&mut Operation> {
        let groups = match r.client {
            Some(c) => &mut self.clients.get_mut(c)?.operation_groups,
            None => &mut self.operation_groups,
        };
        groups.get_mut(r.group)?.operations.get_mut(r.operation)
    }

    /// Find an operation group by its resolved (post-rename) name among the
    /// groups owned directly by the model.
    pub fn find_group(&self, name: &str) -> Option<&OperationGroup> {
        self.operation_groups
            .iter()
            .find(|g| g.language.resolved_name() == name)
    }
}
