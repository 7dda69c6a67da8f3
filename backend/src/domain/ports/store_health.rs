//! Port for checking that the backing store answers.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failure reported by a store health probe.
    pub enum StoreHealthError {
        /// The store could not be reached or did not answer.
        Unreachable { message: String } => "store unreachable: {message}",
    }
}

/// Round-trips a trivial request to the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Succeeds when the store answered.
    async fn ping(&self) -> Result<(), StoreHealthError>;
}
