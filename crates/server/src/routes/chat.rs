use axum::{
    extract::{Query, State},
    Json,
};
use shared::{ApiResponse, ChatHistoryQuery, ChatMessage, ChatRole, SendMessageRequest};

use super::{
    extract::{ApiJson, UserContext},
    non_blank, required,
};
use crate::{
    db::{DbError, MessageRow, NewMessage, MESSAGE_HISTORY_LIMIT},
    error::{AppError, ResultExt},
    mapper,
    state::AppState,
};

/// Store the caller's message, generate the assistant reply, store it too
/// and return it.
/// POST /chat/message
pub async fn send_message(
    State(state): State<AppState>,
    ctx: UserContext,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> Result<Json<ApiResponse<ChatMessage>>, AppError> {
    const FAILED: &str = "Failed to send message";

    let text = required(req.message.as_deref(), "message")?;
    let trip_id = non_blank(req.trip_id);

    state.db.ensure_user(&ctx.user_id).await.or_fail(FAILED)?;

    append(
        &state,
        NewMessage {
            user_id: ctx.user_id.clone(),
            trip_id: trip_id.clone(),
            content: text.to_string(),
            role: ChatRole::User.as_str(),
            suggestions: None,
        },
    )
    .await?;

    let reply = state.suggestions.reply(text);
    let row = append(
        &state,
        NewMessage {
            user_id: ctx.user_id,
            trip_id,
            content: reply.text,
            role: ChatRole::Assistant.as_str(),
            suggestions: reply.suggestions.as_deref().map(mapper::serialize_suggestions),
        },
    )
    .await?;

    Ok(Json(ApiResponse::ok(ChatMessage::try_from(row).or_fail(FAILED)?)))
}

/// The latest messages of one conversation, oldest first. Without `tripId`
/// only general (trip-less) chat is returned.
/// GET /chat/history
pub async fn chat_history(
    State(state): State<AppState>,
    ctx: UserContext,
    Query(query): Query<ChatHistoryQuery>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    const FAILED: &str = "Failed to fetch chat history";

    let trip_id = non_blank(query.trip_id);
    let rows = state
        .db
        .list_messages(&ctx.user_id, trip_id.as_deref(), MESSAGE_HISTORY_LIMIT)
        .await
        .or_fail(FAILED)?;
    let messages = rows
        .into_iter()
        .map(ChatMessage::try_from)
        .collect::<Result<Vec<_>, _>>()
        .or_fail(FAILED)?;

    Ok(Json(ApiResponse::ok(messages)))
}

async fn append(state: &AppState, message: NewMessage) -> Result<MessageRow, AppError> {
    match state.db.append_message(&message).await {
        Err(DbError::Constraint(_)) => Err(AppError::not_found("Trip")),
        other => other.or_fail("Failed to send message"),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        db::{DEMO_TRIP_ID, MESSAGE_HISTORY_LIMIT},
        test_support::TestApp,
    };
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_weather_message_gets_weather_reply() {
        let app = TestApp::new().await;
        let (status, body) = app
            .post("/chat/message", json!({"message": "What's the weather like?"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["role"], "assistant");
        assert!(body["data"]["content"]
            .as_str()
            .unwrap()
            .starts_with("The weather looks great"));
        assert!(!body["data"]["suggestions"].as_array().unwrap().is_empty());
        assert!(body["data"].get("tripId").is_none() || body["data"]["tripId"].is_null());
    }

    #[tokio::test]
    async fn test_message_required() {
        let app = TestApp::new().await;
        let (status, body) = app.post("/chat/message", json!({"message": ""})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "message is required");
    }

    #[tokio::test]
    async fn test_history_is_partitioned_by_trip() {
        let app = TestApp::new().await;
        let user = [("user-id", "traveler")];

        app.send("POST", "/chat/message", &user, Some(json!({"message": "help"})))
            .await;
        app.send(
            "POST",
            "/chat/message",
            &user,
            Some(json!({"message": "find food", "tripId": DEMO_TRIP_ID})),
        )
        .await;

        let (status, body) = app.send("GET", "/chat/history", &user, None).await;
        assert_eq!(status, StatusCode::OK);
        let general = body["data"].as_array().unwrap();
        assert_eq!(general.len(), 2);
        assert_eq!(general[0]["role"], "user");
        assert_eq!(general[0]["content"], "help");
        assert_eq!(general[1]["role"], "assistant");
        assert!(general.iter().all(|m| m["tripId"].is_null()));

        let (_, body) = app
            .send("GET", &format!("/chat/history?tripId={DEMO_TRIP_ID}"), &user, None)
            .await;
        let trip = body["data"].as_array().unwrap();
        assert_eq!(trip.len(), 2);
        assert_eq!(trip[0]["content"], "find food");
        assert!(trip.iter().all(|m| m["tripId"] == DEMO_TRIP_ID));

        // Other users see nothing of it
        let (_, body) = app
            .send("GET", "/chat/history", &[("user-id", "someone-else")], None)
            .await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_keeps_latest_fifty_oldest_first() {
        let app = TestApp::new().await;
        let user = [("user-id", "chatty")];

        // 26 turns store 52 messages
        for turn in 0..26 {
            let (status, _) = app
                .send(
                    "POST",
                    "/chat/message",
                    &user,
                    Some(json!({"message": format!("turn {turn}")})),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = app.send("GET", "/chat/history", &user, None).await;
        assert_eq!(status, StatusCode::OK);
        let history = body["data"].as_array().unwrap();
        assert_eq!(history.len(), MESSAGE_HISTORY_LIMIT as usize);

        // The first turn fell off; the rest alternate user/assistant in order
        assert_eq!(history[0]["content"], "turn 1");
        assert_eq!(history[0]["role"], "user");
        assert_eq!(history[1]["role"], "assistant");
        assert_eq!(history[48]["content"], "turn 25");
        assert_eq!(history[49]["role"], "assistant");
        for (index, message) in history.iter().enumerate().step_by(2) {
            assert_eq!(message["content"], format!("turn {}", index / 2 + 1));
        }
    }

    #[tokio::test]
    async fn test_message_for_unknown_trip_is_404() {
        let app = TestApp::new().await;
        let (status, body) = app
            .post("/chat/message", json!({"message": "hi", "tripId": "nope"}))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Trip not found");
    }
}
