//! HTTP adapter tests against a scripted local server: status mapping,
//! bearer auth, payload shapes.

use mogiri::shared::config::RegistryConfig;
use mogiri::{EventId, HttpTicketRegistry, RedeemOutcome, RedemptionToken, ScanError, TicketRegistry};
use serde_json::{json, Value};
use std::io::Read;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration as StdDuration;
use tiny_http::{Header, Response, Server};

#[derive(Debug)]
struct MockHttpResponse {
    status: u16,
    body: Option<Value>,
}

impl MockHttpResponse {
    fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }
}

#[derive(Debug, Clone)]
struct CapturedRequest {
    method: String,
    path: String,
    authorization: Option<String>,
    body: String,
}

fn spawn_json_sequence_server(
    responses: Vec<MockHttpResponse>,
) -> (String, Receiver<CapturedRequest>, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").expect("mock server");
    let base_url = format!("http://{}", server.server_addr());
    let (tx, rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        for response_spec in responses {
            let mut request = match server.recv_timeout(StdDuration::from_secs(8)) {
                Ok(Some(request)) => request,
                Ok(None) => break,
                Err(_) => break,
            };

            let authorization = request
                .headers()
                .iter()
                .find(|header| header.field.equiv("Authorization"))
                .map(|header| header.value.as_str().to_string());
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let captured = CapturedRequest {
                method: request.method().as_str().to_string(),
                path: request.url().to_string(),
                authorization,
                body,
            };
            let _ = tx.send(captured);

            let mut response = match response_spec.body {
                Some(body) => {
                    let mut response = Response::from_string(body.to_string());
                    response.add_header(
                        Header::from_bytes("Content-Type", "application/json")
                            .expect("content-type header"),
                    );
                    response
                }
                None => Response::from_string(String::new()),
            };
            response = response.with_status_code(response_spec.status);
            let _ = request.respond(response);
        }
    });

    (base_url, rx, handle)
}

fn join_with_timeout(handle: thread::JoinHandle<()>, timeout: StdDuration) {
    let start = std::time::Instant::now();
    while !handle.is_finished() {
        assert!(
            start.elapsed() < timeout,
            "mock server join timed out after {:?}",
            timeout
        );
        thread::sleep(StdDuration::from_millis(10));
    }
    handle.join().expect("mock server thread panicked");
}

fn registry_for(base_url: &str, auth_token: Option<&str>) -> HttpTicketRegistry {
    let config = RegistryConfig {
        base_url: base_url.to_string(),
        auth_token: auth_token.map(|token| token.to_string()),
        request_timeout: 5,
    };
    HttpTicketRegistry::new(&config).expect("registry adapter")
}

fn token(value: &str) -> RedemptionToken {
    RedemptionToken::new(value.to_string()).unwrap()
}

#[tokio::test]
async fn fetch_event_tickets_parses_list_and_sends_auth() {
    let (base_url, rx, handle) = spawn_json_sequence_server(vec![MockHttpResponse::json(
        200,
        json!([
            {
                "id": 1,
                "buyer_name": "Ada Lovelace",
                "buyer_phone": "555-0100",
                "qr_token": "tok-1",
                "is_used": 0,
                "ticket_type_name": "VIP"
            },
            {
                "id": 2,
                "buyer_name": null,
                "qr_token": "tok-2",
                "is_used": true
            }
        ]),
    )]);
    let registry = registry_for(&base_url, Some("organizer-secret"));

    let event = EventId::new("42".to_string()).unwrap();
    let tickets = registry.fetch_event_tickets(&event).await.unwrap();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].redemption_token.as_str(), "tok-1");
    assert_eq!(tickets[0].summary.holder_name.as_deref(), Some("Ada Lovelace"));
    assert!(!tickets[0].redeemed);
    assert!(tickets[1].redeemed);

    let captured = rx.recv().unwrap();
    assert_eq!(captured.method, "GET");
    assert_eq!(captured.path, "/api/tickets/event/42");
    assert_eq!(
        captured.authorization.as_deref(),
        Some("Bearer organizer-secret")
    );

    join_with_timeout(handle, StdDuration::from_secs(5));
}

#[tokio::test]
async fn fetch_event_tickets_maps_server_error() {
    let (base_url, _rx, handle) = spawn_json_sequence_server(vec![MockHttpResponse::json(
        500,
        json!({"message": "database unavailable"}),
    )]);
    let registry = registry_for(&base_url, None);

    let event = EventId::new("42".to_string()).unwrap();
    let err = registry.fetch_event_tickets(&event).await.unwrap_err();
    assert!(matches!(err, ScanError::Remote(_)));

    join_with_timeout(handle, StdDuration::from_secs(5));
}

#[tokio::test]
async fn redeem_posts_token_and_parses_acceptance() {
    let (base_url, rx, handle) = spawn_json_sequence_server(vec![MockHttpResponse::json(
        200,
        json!({
            "message": "Ticket valid",
            "ticket": {
                "id": 7,
                "buyer_name": "Grace Hopper",
                "qr_token": "tok-7",
                "is_used": 1,
                "ticket_type_name": "Standard"
            }
        }),
    )]);
    let registry = registry_for(&base_url, Some("organizer-secret"));

    let outcome = registry.redeem(&token("tok-7")).await.unwrap();
    match outcome {
        RedeemOutcome::Accepted(summary) => {
            assert_eq!(summary.holder_name.as_deref(), Some("Grace Hopper"));
            assert_eq!(summary.ticket_type.as_deref(), Some("Standard"));
        }
        other => panic!("expected Accepted, got {other:?}"),
    }

    let captured = rx.recv().unwrap();
    assert_eq!(captured.method, "POST");
    assert_eq!(captured.path, "/api/scan");
    let body: Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(body["qr_token"], "tok-7");

    join_with_timeout(handle, StdDuration::from_secs(5));
}

#[tokio::test]
async fn redeem_conflict_maps_to_already_used_with_timestamp() {
    let (base_url, _rx, handle) = spawn_json_sequence_server(vec![MockHttpResponse::json(
        400,
        json!({
            "message": "Ticket already used",
            "used_at": "2026-08-28T10:30:00Z"
        }),
    )]);
    let registry = registry_for(&base_url, None);

    let outcome = registry.redeem(&token("tok-used")).await.unwrap();
    match outcome {
        RedeemOutcome::AlreadyUsed { used_at } => {
            assert!(used_at.is_some());
        }
        other => panic!("expected AlreadyUsed, got {other:?}"),
    }

    join_with_timeout(handle, StdDuration::from_secs(5));
}

#[tokio::test]
async fn redeem_conflict_tolerates_sparse_body() {
    let (base_url, _rx, handle) =
        spawn_json_sequence_server(vec![MockHttpResponse::json(400, json!({}))]);
    let registry = registry_for(&base_url, None);

    let outcome = registry.redeem(&token("tok-used")).await.unwrap();
    assert_eq!(outcome, RedeemOutcome::AlreadyUsed { used_at: None });

    join_with_timeout(handle, StdDuration::from_secs(5));
}

#[tokio::test]
async fn redeem_unknown_token_maps_to_not_found() {
    let (base_url, _rx, handle) = spawn_json_sequence_server(vec![MockHttpResponse::json(
        404,
        json!({"message": "Ticket not found"}),
    )]);
    let registry = registry_for(&base_url, None);

    let outcome = registry.redeem(&token("tok-missing")).await.unwrap();
    assert_eq!(outcome, RedeemOutcome::NotFound);

    join_with_timeout(handle, StdDuration::from_secs(5));
}

#[tokio::test]
async fn redeem_server_error_is_a_remote_error() {
    let (base_url, _rx, handle) = spawn_json_sequence_server(vec![MockHttpResponse::json(
        503,
        json!({"message": "maintenance"}),
    )]);
    let registry = registry_for(&base_url, None);

    let err = registry.redeem(&token("tok-1")).await.unwrap_err();
    assert!(matches!(err, ScanError::Remote(_)));

    join_with_timeout(handle, StdDuration::from_secs(5));
}

#[tokio::test]
async fn unreachable_registry_is_a_remote_error() {
    // Port 9 (discard) refuses connections on loopback.
    let registry = registry_for("http://127.0.0.1:9", None);

    let event = EventId::new("42".to_string()).unwrap();
    let err = registry.fetch_event_tickets(&event).await.unwrap_err();
    assert!(matches!(err, ScanError::Remote(_)));

    let err = registry.redeem(&token("tok-1")).await.unwrap_err();
    assert!(matches!(err, ScanError::Remote(_)));
}

#[tokio::test]
async fn no_auth_header_without_token() {
    let (base_url, rx, handle) =
        spawn_json_sequence_server(vec![MockHttpResponse::json(200, json!([]))]);
    let registry = registry_for(&base_url, None);

    let event = EventId::new("7".to_string()).unwrap();
    let tickets = registry.fetch_event_tickets(&event).await.unwrap();
    assert!(tickets.is_empty());

    let captured = rx.recv().unwrap();
    assert!(captured.authorization.is_none());

    join_with_timeout(handle, StdDuration::from_secs(5));
}
