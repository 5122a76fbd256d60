//! MessagingClient trait definition.
//!
//! This is the narrow surface through which chatharvest consumes the
//! external messaging client: start it, observe its lifecycle events, look
//! up a chat, fetch recent messages, stop it. Everything behind this trait
//! (browser automation, the messaging protocol itself) is out of scope.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition). The concrete
//! implementation lives in chatharvest-infra (`BridgeClient`).

use chatharvest_types::error::ClientError;
use chatharvest_types::message::{ChatInfo, RawMessage};
use chatharvest_types::session::ClientEvent;
use tokio::sync::broadcast;

/// Port for the external messaging client.
///
/// `events()` may be called before `start()`; subscribers receive every
/// event emitted after their subscription.
pub trait MessagingClient: Send + Sync {
    /// Open the client session. Lifecycle progress is reported through
    /// the event stream, not the return value.
    fn start(&self) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Subscribe to lifecycle events.
    fn events(&self) -> broadcast::Receiver<ClientEvent>;

    /// Resolve chat metadata for a group identifier.
    ///
    /// Fails with [`ClientError::ChatNotFound`] when the identifier does
    /// not resolve.
    fn chat_info(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<ChatInfo, ClientError>> + Send;

    /// Fetch up to `limit` most recent messages for a chat, in the order
    /// the external client reports them.
    fn fetch_recent(
        &self,
        chat_id: &str,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<RawMessage>, ClientError>> + Send;

    /// Tear down the client session.
    fn stop(&self) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;
}
