//! HTTP API endpoint handlers.
//!
//! Each endpoint validates its input, calls its use case, and turns the
//! outcome into a response. Backend failures arrive here already replaced
//! by fallback content, so they always produce 200.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    domain::{
        UserId,
        fallback::{CHAT_APOLOGY, HEALTH_TEXT},
    },
    infrastructure::dto::http::{
        AnalyzeResponse, BackendHealthDto, ChatRequest, ChatResponse, HealthResponse,
        ReplyResponse, ToolsResponse, UserRequest,
    },
    ui::state::AppState,
    usecase::{AnalyzeOutcome, RelayOutcome, ToolsOutcome},
};

use super::error::ApiError;

/// POST /api/chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    let (content, user_id) = request.into_domain()?;

    let (response, success) = match state
        .relay_message_usecase
        .execute(content, user_id.clone())
        .await
    {
        RelayOutcome::Answered { response, success } => (response, success),
        RelayOutcome::Unavailable(_) => (CHAT_APOLOGY.to_string(), None),
    };

    Ok(Json(ChatResponse {
        response,
        user_id: user_id.into_string(),
        timestamp: state.timestamp(),
        success,
    }))
}

/// POST /api/clear
pub async fn clear(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let Json(request) = payload?;
    let user_id = UserId::try_from(request)?;

    let outcome = state.clear_conversation_usecase.execute(user_id).await;

    // clear always reports success, even when the backend is down
    Ok(Json(ReplyResponse {
        success: true,
        response: outcome.response,
    }))
}

/// GET or POST /api/help
pub async fn help(State(state): State<Arc<AppState>>) -> Json<ReplyResponse> {
    let outcome = state.get_help_usecase.execute().await;
    Json(ReplyResponse {
        success: true,
        response: outcome.response,
    })
}

/// POST /api/analyze
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload?;
    let user_id = UserId::try_from(request)?;

    let response = match state.analyze_conversation_usecase.execute(user_id).await {
        AnalyzeOutcome::Analysis(analysis) => AnalyzeResponse {
            success: true,
            analysis: Some(analysis),
            error: None,
        },
        AnalyzeOutcome::Failed(error) => AnalyzeResponse {
            success: false,
            analysis: None,
            error: Some(error),
        },
    };
    Ok(Json(response))
}

/// GET /api/tools
pub async fn tools(State(state): State<Arc<AppState>>) -> Json<ToolsResponse> {
    let response = match state.list_tools_usecase.execute().await {
        ToolsOutcome::Listed {
            success,
            tools,
            error,
        } => ToolsResponse {
            success,
            tools,
            error,
            fallback: false,
        },
        ToolsOutcome::Fallback { tools } => ToolsResponse {
            success: true,
            tools: Some(tools),
            error: None,
            fallback: true,
        },
    };
    Json(response)
}

/// GET /api/health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let report = state.check_health_usecase.execute().await;

    Json(HealthResponse {
        status: "OK".to_string(),
        message: HEALTH_TEXT.to_string(),
        timestamp: state.timestamp(),
        connected_users: report.connected_users,
        backend: BackendHealthDto {
            kind: report.backend_kind,
            reachable: report.backend.is_ok(),
            error: report.backend.err().map(|e| e.to_string()),
        },
    })
}
