//! Server state.

use std::sync::Arc;

use hashi_shared::time::{Clock, SystemClock};

use crate::{
    domain::{Backend, MessagePusher, SessionRepository},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
    },
    usecase::{
        AnalyzeConversationUseCase, CheckHealthUseCase, ClearConversationUseCase,
        ConnectSessionUseCase, DisconnectSessionUseCase, GetHelpUseCase, JoinSessionUseCase,
        ListToolsUseCase, RelayMessageUseCase, SendReplyUseCase,
    },
};

/// Shared application state
///
/// One instance per server; several servers in one process do not share
/// sessions.
pub struct AppState {
    /// ConnectSessionUseCase（コネクション接続）
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    /// JoinSessionUseCase（join イベント）
    pub join_session_usecase: Arc<JoinSessionUseCase>,
    /// DisconnectSessionUseCase（コネクション切断）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// SendReplyUseCase（送信元への返信）
    pub send_reply_usecase: Arc<SendReplyUseCase>,
    /// RelayMessageUseCase（チャットの中継）
    pub relay_message_usecase: Arc<RelayMessageUseCase>,
    pub clear_conversation_usecase: Arc<ClearConversationUseCase>,
    pub get_help_usecase: Arc<GetHelpUseCase>,
    pub analyze_conversation_usecase: Arc<AnalyzeConversationUseCase>,
    pub list_tools_usecase: Arc<ListToolsUseCase>,
    pub check_health_usecase: Arc<CheckHealthUseCase>,
    /// Source of reply timestamps
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wire every use case around the given ports
    pub fn new(
        backend: Arc<dyn Backend>,
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            connect_session_usecase: Arc::new(ConnectSessionUseCase::new(message_pusher.clone())),
            join_session_usecase: Arc::new(JoinSessionUseCase::new(repository.clone())),
            disconnect_session_usecase: Arc::new(DisconnectSessionUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            send_reply_usecase: Arc::new(SendReplyUseCase::new(message_pusher)),
            relay_message_usecase: Arc::new(RelayMessageUseCase::new(backend.clone())),
            clear_conversation_usecase: Arc::new(ClearConversationUseCase::new(backend.clone())),
            get_help_usecase: Arc::new(GetHelpUseCase::new(backend.clone())),
            analyze_conversation_usecase: Arc::new(AnalyzeConversationUseCase::new(
                backend.clone(),
            )),
            list_tools_usecase: Arc::new(ListToolsUseCase::new(backend.clone())),
            check_health_usecase: Arc::new(CheckHealthUseCase::new(repository, backend)),
            clock: Arc::new(SystemClock),
        }
    }

    /// State backed by the in-memory session registry and WebSocket pusher
    pub fn with_backend(backend: Arc<dyn Backend>) -> Self {
        Self::new(
            backend,
            Arc::new(InMemorySessionRepository::new()),
            Arc::new(WebSocketMessagePusher::new()),
        )
    }

    /// Replace the clock (tests use a fixed one)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Reply timestamp, taken at the moment of the call
    pub fn timestamp(&self) -> String {
        self.clock.now_iso8601()
    }
}
