//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ConnectionId, UserId};

/// Session Repository trait
///
/// Connection registry: one entry per joined, live connection, mapping the
/// connection identifier to the user identifier announced on `join`.
/// Owned by the server instance; nothing here is process-global.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Register (or re-register) a connection. Returns the previous user id
    /// when the connection had already joined.
    async fn add(&self, connection_id: ConnectionId, user_id: UserId) -> Option<UserId>;

    /// Remove a connection. Returns the user id it was joined as.
    async fn remove(&self, connection_id: &ConnectionId) -> Option<UserId>;

    /// User id a connection joined as
    async fn get(&self, connection_id: &ConnectionId) -> Option<UserId>;

    /// Number of joined connections
    async fn count(&self) -> usize;
}
