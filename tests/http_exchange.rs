//! HTTP exchange — drives `HttpChatClient` and the turn controller against an
//! in-process axum endpoint.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chatcart::config::ClientConfig;
use chatcart::net::{ChatRequest, ChatTransport, ExchangeError, FailureKind, HttpChatClient};
use chatcart::opener::SystemOpener;
use chatcart::render::{Role, Transcript};
use chatcart::{TurnController, TurnOutcome};
use serde_json::{Value, json};

type RequestLog = Arc<Mutex<Vec<Value>>>;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn echo_chat(State(log): State<RequestLog>, Json(body): Json<Value>) -> Json<Value> {
    log.lock().unwrap().push(body.clone());
    let message = body["message"].as_str().unwrap_or_default().to_owned();
    Json(json!({
        "session_id": "s1",
        "reply": format!("Has dit: <b>{message}</b>"),
        "choices": ["Sí", "No"]
    }))
}

async fn echo_endpoint() -> (String, RequestLog) {
    let log = RequestLog::default();
    let app = Router::new().route("/chat", post(echo_chat)).with_state(log.clone());
    (serve(app).await, log)
}

fn config(base_url: &str) -> ClientConfig {
    ClientConfig { base_url: base_url.to_owned(), ..ClientConfig::default() }
}

fn controller(base_url: &str) -> TurnController<HttpChatClient, Transcript, SystemOpener> {
    let config = config(base_url);
    let client = HttpChatClient::new(&config).unwrap();
    let opener = SystemOpener::new(config.base().unwrap()).with_launch(false);
    TurnController::new(client, Transcript::new(), opener)
}

// =============================================================================
// HttpChatClient
// =============================================================================

#[tokio::test]
async fn exchange_posts_json_and_parses_reply() {
    let (base_url, log) = echo_endpoint().await;
    let client = HttpChatClient::new(&config(&base_url)).unwrap();

    let reply = client.exchange(&ChatRequest::new("hola", None)).await.unwrap();

    assert_eq!(log.lock().unwrap().as_slice(), &[json!({ "message": "hola", "session_id": null })]);
    assert_eq!(reply.session_id.as_deref(), Some("s1"));
    assert_eq!(reply.reply_text(), Some("Has dit: <b>hola</b>"));
    assert_eq!(reply.choices().len(), 2);
}

#[tokio::test]
async fn server_error_status_is_reported() {
    let app = Router::new().route("/chat", post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }));
    let base_url = serve(app).await;
    let client = HttpChatClient::new(&config(&base_url)).unwrap();

    let err = client.exchange(&ChatRequest::new("hola", None)).await.unwrap_err();

    assert!(matches!(err, ExchangeError::Status { status: 500, ref body } if body == "boom"));
    assert_eq!(err.kind(), FailureKind::Transport);
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let app = Router::new().route("/chat", post(|| async { "<html>not json</html>" }));
    let base_url = serve(app).await;
    let client = HttpChatClient::new(&config(&base_url)).unwrap();

    let err = client.exchange(&ChatRequest::new("hola", None)).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Malformed);
}

#[tokio::test]
async fn refused_connection_is_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = HttpChatClient::new(&config(&format!("http://{addr}"))).unwrap();

    let err = client.exchange(&ChatRequest::new("hola", None)).await.unwrap_err();

    assert!(matches!(err, ExchangeError::Transport(_)));
}

// =============================================================================
// Controller over HTTP
// =============================================================================

#[tokio::test]
async fn conversation_keeps_session_across_turns() {
    let (base_url, log) = echo_endpoint().await;
    let controller = controller(&base_url);

    assert_eq!(controller.submit_turn("Vull eliminar una colònia de formigues.").await, TurnOutcome::Replied);
    assert_eq!(controller.select_choice("Sí").await, TurnOutcome::Replied);

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests[0], json!({ "message": "Vull eliminar una colònia de formigues.", "session_id": null }));
    assert_eq!(requests[1], json!({ "message": "Sí", "session_id": "s1" }));

    let surface = controller.surface();
    let roles: Vec<Role> = surface.entries().iter().map(|e| e.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Bot, Role::User, Role::Bot]);
    assert_eq!(surface.last().unwrap().content.plain_text(), "Has dit: Sí");
    assert_eq!(surface.active_choices().unwrap().len(), 2);
    assert!(surface.input().enabled);
}

#[tokio::test]
async fn endpoint_down_leaves_ui_usable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let controller = controller(&format!("http://{addr}"));

    let outcome = controller.submit_turn("hola").await;

    assert_eq!(outcome, TurnOutcome::Failed(FailureKind::Transport));
    assert!(!controller.is_locked());
    assert_eq!(controller.session_id(), None);
    let surface = controller.surface();
    assert_eq!(surface.entries().len(), 2);
    assert_eq!(surface.last().unwrap().role, Role::Bot);
    assert!(surface.input().enabled);
    assert!(!surface.is_typing());
}

#[tokio::test]
async fn relative_checkout_link_does_not_fail_turn() {
    let app = Router::new().route(
        "/chat",
        post(|| async {
            Json(json!({
                "session_id": "s9",
                "reply": "Mode demo: pagament simulat.",
                "checkout_url": "/static/mock-payment.html?sid=s9",
                "done": false
            }))
        }),
    );
    let base_url = serve(app).await;
    let controller = controller(&base_url);

    assert_eq!(controller.submit_turn("Pagar ara").await, TurnOutcome::Replied);
    assert_eq!(controller.session_id().as_deref(), Some("s9"));
}
