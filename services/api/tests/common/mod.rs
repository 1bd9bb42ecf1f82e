//! Shared harness: the real router on a loopback port, one server per test.

#![allow(dead_code)]

use api_lib::{
    config::{Config, Latency},
    web::{build_router, state::AppState},
};
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{client::IntoClientRequest, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    pub base: String,
    pub client: Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn login(&self) -> String {
        let res = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": "demo@example.com", "password": "demo" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    /// Opens `/ws` with the bearer token in the upgrade request.
    pub async fn connect_ws(&self, token: &str) -> WsStream {
        let url = self.base.replace("http://", "ws://") + "/ws";
        let mut request = url.into_client_request().unwrap();
        request
            .headers_mut()
            .insert("Authorization", format!("Bearer {}", token).parse().unwrap());
        let (ws, _) = tokio_tungstenite::connect_async(request).await.unwrap();
        ws
    }
}

pub fn test_config(storage: &Path) -> Config {
    let mut config = Config::from_lookup(|_| None).unwrap();
    config.storage_path = storage.join("session.json");
    config.latency = Latency::none();
    config.seed_demo_documents = true;
    config
}

pub async fn spawn_server(storage: &Path) -> TestServer {
    spawn_server_with(test_config(storage)).await
}

pub async fn spawn_server_with(config: Config) -> TestServer {
    let state = Arc::new(AppState::from_config(Arc::new(config)));
    let app = build_router(state).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base: format!("http://{}", addr),
        client: Client::new(),
    }
}

/// The next JSON text frame, or `None` once the server closes the socket.
pub async fn next_json(ws: &mut WsStream) -> Option<Value> {
    let read = async {
        loop {
            match ws.next().await? {
                Ok(Message::Text(text)) => return Some(serde_json::from_str(&text).unwrap()),
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => continue,
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), read)
        .await
        .expect("no websocket frame within 5s")
}

/// Skips `state_changed` frames until one satisfies `accept`.
pub async fn next_state_where(ws: &mut WsStream, accept: impl Fn(&Value) -> bool) -> Value {
    loop {
        let frame = next_json(ws).await.expect("socket closed while waiting for state");
        if frame["type"] == "state_changed" && accept(&frame) {
            return frame;
        }
    }
}
