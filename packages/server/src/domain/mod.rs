//! Domain layer: value objects, entities and the ports implemented by the
//! infrastructure layer.

pub mod backend;
pub mod error;
pub mod fallback;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use backend::{Backend, BackendKind, BackendOperation, BackendPayload, BackendReply};
pub use error::{BackendError, MessagePushError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::SessionRepository;
pub use value_object::{ConnectionId, MessageContent, UserId};

#[cfg(test)]
pub use backend::MockBackend;
