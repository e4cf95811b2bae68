//! UseCase 層
//!
//! HTTP / WebSocket のハンドラから呼ばれるアプリケーションロジック。
//! バックエンド呼び出しの失敗はここでフォールバックに置き換えられ、
//! ハンドラにエラーとして伝播しません。

pub mod analyze_conversation;
pub mod check_health;
pub mod clear_conversation;
pub mod connect_session;
pub mod disconnect_session;
pub mod get_help;
pub mod join_session;
pub mod list_tools;
pub mod relay_message;
pub mod send_reply;

pub use analyze_conversation::{AnalyzeConversationUseCase, AnalyzeOutcome};
pub use check_health::{CheckHealthUseCase, HealthReport};
pub use clear_conversation::{ClearConversationUseCase, ClearOutcome};
pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use get_help::{GetHelpUseCase, HelpOutcome};
pub use join_session::JoinSessionUseCase;
pub use list_tools::{ListToolsUseCase, ToolsOutcome};
pub use relay_message::{RelayMessageUseCase, RelayOutcome};
pub use send_reply::SendReplyUseCase;
