//! Driving port for the service-status probe.

use async_trait::async_trait;

/// Reports whether the backing store is reachable right now.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageStatus: Send + Sync {
    /// `true` when the store answered a liveness probe.
    async fn ping(&self) -> bool;
}

/// Status probe for deployments running on the in-memory store, which is
/// always reachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConnected;

#[async_trait]
impl StorageStatus for AlwaysConnected {
    async fn ping(&self) -> bool {
        true
    }
}
