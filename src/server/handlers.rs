use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::AppState;
use crate::error::{BotError, Result};
use crate::knowledge::latest_user_text;
use crate::models::Message;
use crate::orchestrator::Orchestrator;

#[derive(Debug, Deserialize, Serialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// The final assistant message, returned as-is.
pub type ChatResponse = Message;

pub async fn index() -> Html<&'static str> {
    Html(include_str!("chat.html"))
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(request) = payload.map_err(|e| BotError::InvalidRequest(e.body_text()))?;
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id, messages = request.messages.len());

    async move {
        let history = Orchestrator::prepare_history(request.messages)?;
        let query = latest_user_text(&history).unwrap_or_default().to_string();
        let context = state.retriever.context_for(&query).await;

        let reply = state.orchestrator.run(history, &context).await?;
        Ok::<_, BotError>(Json(reply))
    }
    .instrument(span)
    .await
}

pub async fn diagnostics(State(state): State<Arc<AppState>>) -> Json<Value> {
    let schedule = match state.schedule.list_slots().await {
        Ok(slots) => json!({
            "ok": true,
            "rows": slots.len(),
            "openSlots": slots.iter().filter(|s| s.is_available()).count(),
        }),
        Err(e) => json!({ "ok": false, "error": e.to_string() }),
    };

    let knowledge = match state.knowledge.list_qa_pairs().await {
        Ok(pairs) => json!({ "ok": true, "pairs": pairs.len() }),
        Err(e) => json!({ "ok": false, "error": e.to_string() }),
    };

    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.orchestrator.model_name(),
        "schedule": schedule,
        "knowledge": knowledge,
    }))
}
