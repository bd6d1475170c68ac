//! Admin bridge: management actions over websocket
//!
//! - Accept admin connections on the bind address
//! - Each text frame is one JSON `ManagerRequest`, answered with one `ManagerResponse`
//! - Lifecycle operations block on channel locks and file IO, so they run on
//!   the blocking pool rather than the connection task

use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, Duration};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use super::actions::handle_request;
use super::protocol::{BridgeEvent, ManagerRequest, ManagerResponse};
use crate::channel::ChannelRegistry;
use crate::monitor::MonitorManager;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

type BridgeResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub struct AdminBridgeServer {
    bind_addr: String,
    manager: Arc<MonitorManager>,
    registry: Arc<dyn ChannelRegistry>,
}

impl AdminBridgeServer {
    pub fn new(
        bind_addr: impl Into<String>,
        manager: Arc<MonitorManager>,
        registry: Arc<dyn ChannelRegistry>,
    ) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            manager,
            registry,
        }
    }

    pub async fn run(&self) -> BridgeResult<()> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        info!("Admin bridge listening on {}", self.bind_addr);
        self.serve(listener).await
    }

    /// Accept loop on an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> BridgeResult<()> {
        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    info!("New admin connection from {}", addr);
                    let manager = Arc::clone(&self.manager);
                    let registry = Arc::clone(&self.registry);
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_client(stream, manager, registry).await {
                            error!("Admin client error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    // Persistent failures (fd exhaustion) would otherwise spin
                    error!("Connection error: {}, retrying in {:?}", e, ACCEPT_BACKOFF);
                    sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }

    async fn handle_client(
        stream: TcpStream,
        manager: Arc<MonitorManager>,
        registry: Arc<dyn ChannelRegistry>,
    ) -> BridgeResult<()> {
        let ws = accept_async(stream).await?;
        let (mut write, mut read) = ws.split();

        let session_id = uuid::Uuid::new_v4().to_string();
        let welcome = BridgeEvent::Connected {
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            session_id: session_id.clone(),
        };
        write
            .send(Message::Text(serde_json::to_string(&welcome)?.into()))
            .await?;
        debug!("Admin session {} started", session_id);

        while let Some(msg) = read.next().await {
            match msg? {
                Message::Text(text) => {
                    let reply = match serde_json::from_str::<ManagerRequest>(text.as_str()) {
                        Ok(request) => {
                            let manager = Arc::clone(&manager);
                            let registry = Arc::clone(&registry);
                            tokio::task::spawn_blocking(move || {
                                handle_request(&manager, registry.as_ref(), request)
                            })
                            .await
                            .unwrap_or_else(|e| {
                                error!("Action handler failed: {}", e);
                                ManagerResponse::error("Internal error")
                            })
                        }
                        Err(e) => {
                            warn!("Invalid action in session {}: {}", session_id, e);
                            ManagerResponse::error(format!("Invalid action: {}", e))
                        }
                    };
                    write
                        .send(Message::Text(serde_json::to_string(&reply)?.into()))
                        .await?;
                }
                Message::Close(_) => {
                    info!("Admin session {} closed", session_id);
                    break;
                }
                _ => {}
            }
        }
        Ok(())
    }
}
