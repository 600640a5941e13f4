//! HTTP API tests driven through the router with a scripted agent.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use pdfchat_agent::error::RATE_LIMIT_NOTICE;
use pdfchat_agent::{AgentError, AgentReply, ChatAgent};
use pdfchat_core::node::DocumentNode;
use pdfchat_render::PdfRenderer;
use pdfchat_server::config::ConfigInfo;
use pdfchat_server::state::AppState;

struct ScriptedAgent {
    replies: Mutex<VecDeque<Result<AgentReply, AgentError>>>,
}

impl ScriptedAgent {
    fn new(replies: Vec<Result<AgentReply, AgentError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

impl ChatAgent for ScriptedAgent {
    fn send(&self, _message: &str) -> Result<AgentReply, AgentError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Transport("script exhausted".into())))
    }
}

fn invoice_reply() -> AgentReply {
    AgentReply {
        text: "Here is your invoice.".into(),
        document: Some(DocumentNode::from_json(json!({
            "content": [
                { "text": "Invoice", "style": "header" },
                "Billed to [Client Name] on [Date]",
                "Due [Date]"
            ],
            "styles": { "header": { "fontSize": 18, "bold": true } }
        }))),
    }
}

fn test_config() -> ConfigInfo {
    ConfigInfo {
        endpoint: "http://localhost/agent".into(),
        user_id: "tester".into(),
        agent_id: "agent".into(),
        session_id: "session".into(),
        api_key_hint: None,
    }
}

fn app(replies: Vec<Result<AgentReply, AgentError>>) -> Router {
    let agent = Arc::new(ScriptedAgent::new(replies));
    pdfchat_server::router(AppState::new(agent, PdfRenderer::default(), test_config()))
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = get(app, uri).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn health_check() {
    let app = app(vec![]);
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn transcript_starts_with_welcome() {
    let app = app(vec![]);
    let (status, body) = get_json(&app, "/messages").await;
    assert_eq!(status, StatusCode::OK);
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0]["content"],
        "Welcome! Start typing to create your PDF."
    );
    assert_eq!(messages[0]["kind"], "system");
}

#[tokio::test]
async fn nothing_to_preview_before_first_document() {
    let app = app(vec![]);
    let (status, _) = get(&app, "/preview.pdf").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/document").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chat_edit_loop() {
    let app = app(vec![Ok(invoice_reply())]);

    let (status, body) = post_json(&app, "/chat", json!({ "message": "make an invoice" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["document_updated"], true);
    assert_eq!(body["reply"]["content"], "Here is your invoice.");
    assert_eq!(body["user"]["content"], "make an invoice");
    let first_revision = body["revision"].as_u64().unwrap();

    let (status, doc) = get_json(&app, "/document").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["placeholders"], json!(["[Client Name]", "[Date]"]));
    assert_eq!(doc["edit"]["state"], "idle");

    let (status, pdf) = get(&app, "/preview.pdf").await;
    assert_eq!(status, StatusCode::OK);
    assert!(pdf.starts_with(b"%PDF"));

    let (status, prompt) = post_json(&app, "/edit/begin", json!({ "target": "[Date]" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prompt["target"], "[Date]");
    assert_eq!(prompt["prefill"], "Date");

    let (_, state) = get_json(&app, "/edit").await;
    assert_eq!(state, json!({ "state": "editing", "target": "[Date]" }));

    let (status, outcome) =
        post_json(&app, "/edit/confirm", json!({ "value": "March 3, 2025" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["notice"], "Updated [Date] to [March 3, 2025]");
    assert_eq!(outcome["replaced"], 2);
    assert!(outcome["revision"].as_u64().unwrap() > first_revision);

    let (_, doc) = get_json(&app, "/document").await;
    assert_eq!(
        doc["placeholders"],
        json!(["[Client Name]", "[March 3, 2025]"])
    );
    assert_eq!(doc["edit"]["state"], "idle");

    let (_, messages) = get_json(&app, "/messages").await;
    let last = messages.as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["content"], "Updated [Date] to [March 3, 2025]");
}

#[tokio::test]
async fn begin_edit_from_link() {
    let app = app(vec![Ok(invoice_reply())]);
    post_json(&app, "/chat", json!({ "message": "invoice" })).await;

    let (status, prompt) = post_json(
        &app,
        "/edit/begin",
        json!({ "link": "pdfchat://edit?target=%5BClient%20Name%5D" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prompt["target"], "[Client Name]");
    assert_eq!(prompt["prefill"], "Client Name");
}

#[tokio::test]
async fn cancel_leaves_document_untouched() {
    let app = app(vec![Ok(invoice_reply())]);
    post_json(&app, "/chat", json!({ "message": "invoice" })).await;
    let (_, before) = get_json(&app, "/document").await;

    post_json(&app, "/edit/begin", json!({ "target": "[Date]" })).await;
    let (status, state) = post_json(&app, "/edit/cancel", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state, json!({ "state": "idle" }));

    let (_, outcome) = post_json(&app, "/edit/confirm", json!({ "value": "later" })).await;
    assert_eq!(outcome["notice"], Value::Null);
    assert_eq!(outcome["replaced"], 0);

    let (_, after) = get_json(&app, "/document").await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn begin_edit_without_document_is_not_found() {
    let app = app(vec![]);
    let (status, body) = post_json(&app, "/edit/begin", json!({ "target": "[Date]" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn begin_edit_requires_target_or_link() {
    let app = app(vec![Ok(invoice_reply())]);
    post_json(&app, "/chat", json!({ "message": "invoice" })).await;
    let (status, _) = post_json(&app, "/edit/begin", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let app = app(vec![Ok(invoice_reply())]);
    let (status, body) = post_json(&app, "/chat", json!({ "message": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, messages) = get_json(&app, "/messages").await;
    assert_eq!(messages.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn rate_limit_becomes_chat_notice() {
    let app = app(vec![Err(AgentError::RateLimited { status: 429 })]);
    let (status, body) = post_json(&app, "/chat", json!({ "message": "invoice" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["document_updated"], false);
    assert_eq!(body["reply"]["content"], RATE_LIMIT_NOTICE);

    let (status, _) = get(&app, "/document").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reply_without_document_keeps_previous() {
    let app = app(vec![
        Ok(invoice_reply()),
        Ok(AgentReply {
            text: "What should the due date be?".into(),
            document: None,
        }),
    ]);
    post_json(&app, "/chat", json!({ "message": "invoice" })).await;
    let (_, before) = get_json(&app, "/document").await;

    let (_, body) = post_json(&app, "/chat", json!({ "message": "hmm" })).await;
    assert_eq!(body["document_updated"], false);

    let (_, after) = get_json(&app, "/document").await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn config_is_redacted() {
    let app = app(vec![]);
    let (status, body) = get_json(&app, "/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "tester");
    assert_eq!(body["api_key_hint"], Value::Null);
    assert!(body.get("api_key").is_none());
}
