//! REST client against a local HTTP responder.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mercury_presence::{
    ConnectionState, LanyardRestClient, PresenceApi, PresenceError, PresenceStatus, PresenceSync,
    SyncConfig,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// ---------------------------------------------------------------------------
// Local responder
// ---------------------------------------------------------------------------

/// Serves `status` + `body` to every request and records the request heads.
async fn serve(status: &'static str, body: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let seen = Arc::clone(&seen);
            tokio::spawn(async move {
                let head = read_head(&mut stream).await;
                seen.lock().unwrap().push(head);
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    (format!("http://{addr}"), requests)
}

async fn read_head(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn client(base: &str, timeout: Duration) -> LanyardRestClient {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    LanyardRestClient::with_client(base, timeout, http)
}

const DND_BODY: &str = r#"{"success":true,"data":{"discord_user":{"id":"123","username":"delta"},"discord_status":"dnd","activities":[],"listening_to_spotify":false,"spotify":null,"kv":{}}}"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetches_user_from_v1_endpoint() {
    let (base, requests) = serve("200 OK", DND_BODY).await;
    let data = client(&base, Duration::from_secs(2))
        .fetch_user("123")
        .await
        .unwrap();

    assert_eq!(data.discord_status, PresenceStatus::DoNotDisturb);
    assert!(data.activities.is_empty());

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET /v1/users/123 HTTP/1.1"), "{}", requests[0]);
    assert!(requests[0].to_ascii_lowercase().contains("accept: application/json"));
}

#[tokio::test]
async fn http_statuses_map_to_errors() {
    let cases = [
        ("404 Not Found", PresenceError::NotRegistered),
        ("429 Too Many Requests", PresenceError::RateLimited),
        ("503 Service Unavailable", PresenceError::ProviderUnavailable(503)),
        ("401 Unauthorized", PresenceError::UnexpectedStatus(401)),
    ];

    for (status, expected) in cases {
        let (base, _) = serve(status, "{}").await;
        let err = client(&base, Duration::from_secs(2))
            .fetch_user("123")
            .await
            .unwrap_err();
        assert_eq!(err, expected, "{status}");
    }
}

#[tokio::test]
async fn unsuccessful_envelope_is_malformed() {
    let (base, _) = serve(
        "200 OK",
        r#"{"success":false,"error":{"message":"User is not being monitored by Lanyard","code":"user_not_monitored"}}"#,
    )
    .await;
    let err = client(&base, Duration::from_secs(2))
        .fetch_user("123")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        PresenceError::MalformedResponse("User is not being monitored by Lanyard".into())
    );
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let err = client(&format!("http://{addr}"), Duration::from_millis(200))
        .fetch_user("123")
        .await
        .unwrap_err();
    assert_eq!(err, PresenceError::Timeout(200));
}

#[tokio::test]
async fn refused_connection_is_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"), Duration::from_secs(2))
        .fetch_user("123")
        .await
        .unwrap_err();
    assert!(matches!(err, PresenceError::NetworkFailure(_)), "{err:?}");
}

#[tokio::test]
async fn sync_over_http_falls_back_on_404() {
    let (base, _) = serve("404 Not Found", r#"{"success":false}"#).await;
    let config = SyncConfig {
        api_base: base.clone(),
        poll_interval: None,
        ..Default::default()
    };
    let api = Arc::new(client(&base, config.request_timeout));
    let sync = PresenceSync::with_api("404case", config, api).unwrap();

    let state = sync.start().await;
    assert!(state.is_fallback());
    assert_eq!(state.snapshot.as_ref().unwrap().status, PresenceStatus::Online);
    let error = state.error.unwrap();
    assert!(error.contains("not found") && error.contains("join"), "{error}");
    assert_eq!(state.connection, ConnectionState::Disconnected);

    sync.stop().await;
}

#[tokio::test]
async fn sync_over_http_applies_real_snapshot() {
    let (base, _) = serve("200 OK", DND_BODY).await;
    let config = SyncConfig {
        api_base: base.clone(),
        poll_interval: None,
        ..Default::default()
    };
    let api = Arc::new(client(&base, config.request_timeout));
    let sync = PresenceSync::with_api("123", config, api).unwrap();

    let state = sync.start().await;
    let snapshot = state.snapshot.unwrap();
    assert_eq!(snapshot.status, PresenceStatus::DoNotDisturb);
    assert!(snapshot.activities.is_empty());
    assert!(snapshot.music.is_none());
    assert!(state.error.is_none());
    assert_eq!(state.connection, ConnectionState::Connected);

    sync.stop().await;
}
