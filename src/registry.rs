use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;

/// Lookup service that knows which HTTP address each worker node advertises.
///
/// The registry itself is owned by the cluster-state subsystem; this trait
/// is the seam the filesystem client resolves node addresses through.
#[async_trait]
pub trait NodeRegistry: Send + Sync {
    /// Return the advertised HTTP address (`host:port`) of a node, or
    /// `None` if the node has not advertised one.
    async fn node_http_addr(&self, node_id: &str) -> Result<Option<String>>;
}

/// In-memory registry backed by a map.
///
/// Used by tests and by embedders that already track node state themselves.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    addrs: RwLock<HashMap<String, String>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the HTTP address a node advertises.
    pub async fn advertise(&self, node_id: impl Into<String>, addr: impl Into<String>) {
        self.addrs.write().await.insert(node_id.into(), addr.into());
    }

    /// Remove a node's advertised address.
    pub async fn withdraw(&self, node_id: &str) {
        self.addrs.write().await.remove(node_id);
    }
}

#[async_trait]
impl NodeRegistry for StaticRegistry {
    async fn node_http_addr(&self, node_id: &str) -> Result<Option<String>> {
        Ok(self.addrs.read().await.get(node_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_registry_lookup() {
        let registry = StaticRegistry::new();
        assert_eq!(registry.node_http_addr("n1").await.unwrap(), None);

        registry.advertise("n1", "10.0.0.5:4646").await;
        assert_eq!(
            registry.node_http_addr("n1").await.unwrap(),
            Some("10.0.0.5:4646".to_string())
        );
    }

    #[tokio::test]
    async fn static_registry_withdraw() {
        let registry = StaticRegistry::new();
        registry.advertise("n1", "10.0.0.5:4646").await;
        registry.withdraw("n1").await;
        assert_eq!(registry.node_http_addr("n1").await.unwrap(), None);
    }
}
