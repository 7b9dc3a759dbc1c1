use axum::{extract::State, Json};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::AppState;
use crate::{
    db::CorpusQuery,
    error::{AppError, AppResult},
    models::{append_turn, ChatRequest, ConversationTurn, EngineResponse, DEFAULT_HISTORY_CAP},
};

/// Longest accepted user message, in characters
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Engine response plus the caller's history with this exchange appended
#[derive(Debug, Serialize)]
pub struct ChatReply {
    #[serde(flatten)]
    pub response: EngineResponse,
    pub history: Vec<ConversationTurn>,
}

/// Handler for the chat endpoint
///
/// A blank message is not an error; the engine answers it with a
/// clarification.
///
/// The engine runs on its own task. If the client goes away the handler
/// future is dropped, the drop guard fires and any in-flight backend call
/// is cancelled.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatReply>> {
    let message = request.message.trim();
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::InvalidInput(format!(
            "message must be at most {} characters",
            MAX_MESSAGE_CHARS
        )));
    }

    let corpus = state.corpus.query(&CorpusQuery::from(&request.options)).await?;

    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let engine = state.engine.clone();
    let user_turn = ConversationTurn::user(message);

    let (request, response) = tokio::spawn(async move {
        let response = engine.chat_with_cancel(&request, &corpus, cancel).await;
        (request, response)
    })
    .await
    .map_err(|e| AppError::Internal(format!("engine task failed: {}", e)))?;
    guard.disarm();

    let history = append_turn(&request.history, user_turn, DEFAULT_HISTORY_CAP);
    let history = append_turn(
        &history,
        ConversationTurn::assistant(response.message()),
        DEFAULT_HISTORY_CAP,
    );

    Ok(Json(ChatReply { response, history }))
}
