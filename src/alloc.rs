use serde::{Deserialize, Serialize};

/// A placement of one task group instance onto a specific worker node.
///
/// Allocations are minted and tracked by the scheduling subsystem; this
/// crate only reads them to find the node serving an allocation's files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Opaque allocation identifier.
    pub id: String,
    /// Identifier of the node the allocation is scheduled on.
    pub node_id: String,
}

impl Allocation {
    pub fn new(id: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_id: node_id.into(),
        }
    }
}
