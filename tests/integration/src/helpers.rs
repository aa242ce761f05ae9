//! Test helpers for integration tests
//!
//! Spawns an in-process gateway on an ephemeral port and offers HTTP and
//! WebSocket clients against it.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use stream_common::AppConfig;
use stream_core::UserId;
use stream_gateway::{create_app, create_gateway_state, serve};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{protocol::frame::coding::CloseCode as WsCloseCode, Message},
    MaybeTlsStream, WebSocketStream,
};

/// Header carrying the caller's account id
pub const USER_ID_HEADER: &str = "x-user-id";

/// How long a test waits for one gateway frame
const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config(&[])?).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_gateway_state(config)?;
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn gateway_url(&self) -> String {
        format!("ws://{}/gateway", self.addr)
    }

    /// GET without caller identity
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// GET as `caller`
    pub async fn get_as(&self, path: &str, caller: UserId) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .get(&url)
            .header(USER_ID_HEADER, caller.to_string())
            .send()
            .await?)
    }

    /// POST a JSON body as `caller`
    pub async fn post_as<T: Serialize>(&self, path: &str, caller: UserId, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header(USER_ID_HEADER, caller.to_string())
            .json(body)
            .send()
            .await?)
    }

    /// Open a gateway connection and consume its Hello frame
    pub async fn connect_gateway(&self) -> Result<GatewayClient> {
        let (socket, _) = connect_async(self.gateway_url()).await?;
        let mut client = GatewayClient { socket };

        let hello = client.next_json().await?;
        anyhow::ensure!(hello["op"] == 10, "expected Hello, got {hello}");

        Ok(client)
    }
}

/// What the gateway sent next
#[derive(Debug)]
pub enum GatewayFrame {
    Json(Value),
    Closed(Option<u16>),
}

/// WebSocket client speaking the gateway protocol
pub struct GatewayClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl GatewayClient {
    pub async fn send_json(&mut self, value: Value) -> Result<()> {
        self.socket.send(Message::Text(value.to_string())).await?;
        Ok(())
    }

    /// Send op 2 (Listen)
    pub async fn listen(&mut self, user_id: UserId, session_id: &str) -> Result<()> {
        self.send_json(serde_json::json!({
            "op": 2,
            "d": { "user_id": user_id.to_string(), "session_id": session_id }
        }))
        .await
    }

    /// Next text frame or close frame, skipping ping/pong
    pub async fn next_frame(&mut self) -> Result<GatewayFrame> {
        loop {
            let msg = tokio::time::timeout(FRAME_TIMEOUT, self.socket.next())
                .await
                .map_err(|_| anyhow::anyhow!("timed out waiting for a gateway frame"))?;

            match msg {
                Some(Ok(Message::Text(text))) => return Ok(GatewayFrame::Json(serde_json::from_str(&text)?)),
                Some(Ok(Message::Close(frame))) => {
                    return Ok(GatewayFrame::Closed(frame.map(|f| u16::from(f.code))));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(GatewayFrame::Closed(None)),
            }
        }
    }

    /// Next text frame as JSON; a close is an error
    pub async fn next_json(&mut self) -> Result<Value> {
        match self.next_frame().await? {
            GatewayFrame::Json(value) => Ok(value),
            GatewayFrame::Closed(code) => anyhow::bail!("connection closed with {code:?}"),
        }
    }

    /// Next dispatch event as `(event name, payload)`
    pub async fn next_dispatch(&mut self) -> Result<(String, Value)> {
        loop {
            let value = self.next_json().await?;
            if value["op"] == 0 {
                let event = value["t"].as_str().unwrap_or_default().to_string();
                return Ok((event, value["d"].clone()));
            }
        }
    }

    /// Wait for the server to close the connection and return the close code
    pub async fn expect_close(&mut self) -> Result<Option<u16>> {
        loop {
            if let GatewayFrame::Closed(code) = self.next_frame().await? {
                return Ok(code);
            }
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.socket
            .close(Some(tokio_tungstenite::tungstenite::protocol::CloseFrame {
                code: WsCloseCode::Normal,
                reason: "done".into(),
            }))
            .await?;
        Ok(())
    }
}

/// Test configuration on an ephemeral port, with extra variables applied
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: Vec<(String, String)> = vec![("GATEWAY_PORT".to_string(), "0".to_string())];
    vars.extend(overrides.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));

    AppConfig::from_lookup(|key| {
        vars.iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its `error.code`
pub async fn assert_error_code(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: Value = assert_json(response, expected_status).await?;
    Ok(body["error"]["code"].as_str().unwrap_or_default().to_string())
}
