//! Device client for the Get/Set/Subscribe exchanges.
//!
//! Executors depend only on the narrow [`Gnmi`] trait, so tests drive them
//! with a scripted client. [`DeviceClient`] is the shipped implementation:
//! a WebSocket channel carrying one JSON-encoded protocol message per text
//! frame.

use std::path::PathBuf;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use gnmi_proto::{
    GetRequest, GetResponse, SetRequest, SetResponse, SubscribeRequest, SubscribeResponse,
    from_json, to_json,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{Connector, MaybeTlsStream, WebSocketStream, connect_async_tls_with_config};
use tracing::{debug, trace};

use crate::error::CliError;

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout for the one-shot exchanges.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection-relevant flag state, passed by reference into dialing.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Device address, with or without a `ws://`/`wss://` scheme.
    pub addr: String,
    /// Username to authenticate with.
    pub username: Option<String>,
    /// Password to authenticate with.
    pub password: Option<String>,
    /// Enable TLS.
    pub tls: bool,
    /// Server CA certificate file.
    pub cafile: Option<PathBuf>,
    /// Client TLS certificate file.
    pub certfile: Option<PathBuf>,
    /// Client TLS private key file.
    pub keyfile: Option<PathBuf>,
}

impl Config {
    /// The WebSocket URL to dial.
    ///
    /// A bare `host:port` address gets its scheme from the `tls` flag; an
    /// explicit `ws://`/`wss://` scheme is used as-is.
    pub fn endpoint(&self) -> Result<String, CliError> {
        if self.addr.starts_with("ws://") || self.addr.starts_with("wss://") {
            return Ok(self.addr.clone());
        }
        if self.addr.contains("://") {
            return Err(CliError::Config(format!(
                "invalid address scheme in {:?}, expected ws:// or wss://",
                self.addr
            )));
        }
        let scheme = if self.tls { "wss" } else { "ws" };
        Ok(format!("{scheme}://{}", self.addr))
    }

    /// Build the TLS connector implied by the flags, if any.
    fn tls_connector(&self) -> Result<Option<Connector>, CliError> {
        if !self.tls {
            return Ok(None);
        }
        let mut builder = native_tls::TlsConnector::builder();
        if let Some(cafile) = &self.cafile {
            let pem = std::fs::read(cafile)?;
            let cert = native_tls::Certificate::from_pem(&pem)
                .map_err(|e| CliError::Config(format!("bad CA certificate: {e}")))?;
            builder.add_root_certificate(cert);
        }
        if let (Some(certfile), Some(keyfile)) = (&self.certfile, &self.keyfile) {
            let cert = std::fs::read(certfile)?;
            let key = std::fs::read(keyfile)?;
            let identity = native_tls::Identity::from_pkcs8(&cert, &key)
                .map_err(|e| CliError::Config(format!("bad client certificate: {e}")))?;
            builder.identity(identity);
        }
        let connector = builder
            .build()
            .map_err(|e| CliError::Config(format!("TLS setup failed: {e}")))?;
        Ok(Some(Connector::NativeTls(connector)))
    }
}

/// The three RPC patterns the executors consume.
#[allow(async_fn_in_trait)]
pub trait Gnmi {
    /// The streaming session type returned by [`Gnmi::subscribe`].
    type Session: SubscribeSession;

    /// One-shot read.
    async fn get(&mut self, request: GetRequest) -> Result<GetResponse, CliError>;

    /// One-shot mutation exchange.
    async fn set(&mut self, request: SetRequest) -> Result<SetResponse, CliError>;

    /// Open a streaming subscription. Consumes the client: a subscription
    /// owns the channel until it is closed.
    async fn subscribe(self, request: SubscribeRequest) -> Result<Self::Session, CliError>;
}

/// A long-lived subscription channel.
#[allow(async_fn_in_trait)]
pub trait SubscribeSession {
    /// Receive the next streamed response. `Ok(None)` is clean
    /// end-of-stream; blocks until the device sends something.
    async fn recv(&mut self) -> Result<Option<SubscribeResponse>, CliError>;

    /// Close the channel.
    async fn close(self) -> Result<(), CliError>;
}

type WsChannel = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket device client.
pub struct DeviceClient {
    ws: WsChannel,
    request_timeout: Duration,
}

impl std::fmt::Debug for DeviceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceClient")
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl DeviceClient {
    /// Dial the device described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid, TLS material cannot be
    /// loaded, or the connection fails or times out.
    pub async fn dial(config: &Config) -> Result<Self, CliError> {
        let url = config.endpoint()?;
        debug!(url = %url, "dialing device");

        let mut request = url
            .into_client_request()
            .map_err(|e| CliError::Config(format!("invalid device address: {e}")))?;
        if let Some(username) = &config.username {
            request.headers_mut().insert(
                "x-gnmi-username",
                HeaderValue::from_str(username)
                    .map_err(|e| CliError::Config(format!("invalid username: {e}")))?,
            );
        }
        if let Some(password) = &config.password {
            request.headers_mut().insert(
                "x-gnmi-password",
                HeaderValue::from_str(password)
                    .map_err(|e| CliError::Config(format!("invalid password: {e}")))?,
            );
        }

        let connector = config.tls_connector()?;
        let (ws, _response) = timeout(
            DEFAULT_CONNECT_TIMEOUT,
            connect_async_tls_with_config(request, None, false, connector),
        )
        .await
        .map_err(|_| CliError::Timeout("connection timed out".into()))?
        .map_err(|e| CliError::Connection(e.to_string()))?;

        debug!("device connected");
        Ok(Self {
            ws,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Set the request timeout for one-shot exchanges.
    pub fn set_request_timeout(&mut self, timeout: Duration) {
        self.request_timeout = timeout;
    }

    /// Send one request frame and await one response frame.
    async fn exchange<Req, Resp>(&mut self, what: &'static str, request: &Req) -> Result<Resp, CliError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let json = to_json(request).map_err(|e| CliError::Protocol(e.to_string()))?;
        trace!(what, "sending request");
        self.ws
            .send(Message::Text(json))
            .await
            .map_err(|e| CliError::Connection(e.to_string()))?;

        loop {
            let frame = timeout(self.request_timeout, self.ws.next())
                .await
                .map_err(|_| CliError::Timeout(format!("{what} request timed out")))?
                .ok_or_else(|| CliError::Connection("connection closed".into()))?
                .map_err(|e| CliError::Connection(e.to_string()))?;

            match frame {
                Message::Text(text) => {
                    trace!(what, "received response");
                    return from_json(&text).map_err(|e| CliError::Protocol(e.to_string()));
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
                Message::Binary(_) => {
                    return Err(CliError::Protocol("unexpected binary frame".into()));
                }
                Message::Close(_) => {
                    return Err(CliError::Connection("connection closed by device".into()));
                }
            }
        }
    }
}

impl Gnmi for DeviceClient {
    type Session = DeviceSubscription;

    async fn get(&mut self, request: GetRequest) -> Result<GetResponse, CliError> {
        self.exchange("get", &request).await
    }

    async fn set(&mut self, request: SetRequest) -> Result<SetResponse, CliError> {
        self.exchange("set", &request).await
    }

    async fn subscribe(mut self, request: SubscribeRequest) -> Result<DeviceSubscription, CliError> {
        let json = to_json(&request).map_err(|e| CliError::Protocol(e.to_string()))?;
        trace!("sending subscribe request");
        self.ws
            .send(Message::Text(json))
            .await
            .map_err(|e| CliError::Connection(e.to_string()))?;
        Ok(DeviceSubscription { ws: self.ws })
    }
}

/// An open subscription over the device channel.
pub struct DeviceSubscription {
    ws: WsChannel,
}

impl SubscribeSession for DeviceSubscription {
    async fn recv(&mut self) -> Result<Option<SubscribeResponse>, CliError> {
        loop {
            let Some(frame) = self.ws.next().await else {
                return Ok(None);
            };
            match frame.map_err(|e| CliError::Connection(e.to_string()))? {
                Message::Text(text) => {
                    return from_json(&text)
                        .map(Some)
                        .map_err(|e| CliError::Protocol(e.to_string()));
                }
                Message::Close(_) => return Ok(None),
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
                Message::Binary(_) => {
                    return Err(CliError::Protocol("unexpected binary frame".into()));
                }
            }
        }
    }

    async fn close(mut self) -> Result<(), CliError> {
        match self.ws.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(CliError::Connection(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_bare_address_gets_scheme_from_tls_flag() {
        let mut config = Config {
            addr: "device:9339".into(),
            ..Config::default()
        };
        assert_eq!(config.endpoint().unwrap(), "ws://device:9339");
        config.tls = true;
        assert_eq!(config.endpoint().unwrap(), "wss://device:9339");
    }

    #[test]
    fn endpoint_explicit_scheme_is_kept() {
        let config = Config {
            addr: "wss://device:9339".into(),
            ..Config::default()
        };
        assert_eq!(config.endpoint().unwrap(), "wss://device:9339");
    }

    #[test]
    fn endpoint_rejects_foreign_schemes() {
        let config = Config {
            addr: "http://device:9339".into(),
            ..Config::default()
        };
        assert!(matches!(config.endpoint(), Err(CliError::Config(_))));
    }

    #[tokio::test]
    async fn dial_rejects_invalid_address() {
        let config = Config {
            addr: "https://device".into(),
            ..Config::default()
        };
        let result = DeviceClient::dial(&config).await;
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[tokio::test]
    async fn dial_fails_without_listener() {
        let config = Config {
            addr: "127.0.0.1:1".into(),
            ..Config::default()
        };
        let result = DeviceClient::dial(&config).await;
        assert!(result.is_err());
    }
}
