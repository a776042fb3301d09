//! TCP transport implementation.
//!
//! Line-delimited JSON-RPC over raw TCP sockets. Every accepted connection
//! runs its own rmcp session inside a `tcp_session` span, and all sessions
//! share the one diary client held by [`McpServer`].

use rmcp::ServiceExt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::{TcpListener, TcpStream};
use tracing::{Instrument, info, info_span, warn};

use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::McpServer;

/// Pause after a failed accept before trying again.
const ACCEPT_BACKOFF_MS: u64 = 100;

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> TransportResult<TcpListener> {
        let addr = self.address();
        TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))
    }

    /// Run the TCP transport until the process exits.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let listener = self.bind().await?;
        info!(
            "Ready - {} listening on {} (JSON-RPC over TCP)",
            server.name(),
            self.address()
        );
        Self::serve(listener, server).await;
        Ok(())
    }

    /// Accept connections from `listener` forever.
    pub async fn serve(listener: TcpListener, server: McpServer) {
        let sessions = Arc::new(AtomicUsize::new(0));

        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    tokio::time::sleep(tokio::time::Duration::from_millis(ACCEPT_BACKOFF_MS))
                        .await;
                    continue;
                }
            };

            if let Err(e) = stream.set_nodelay(true) {
                warn!("Failed to set TCP_NODELAY for {}: {}", peer, e);
            }

            let span = info_span!("tcp_session", %peer, server = %server.name());
            let server = server.clone();
            let sessions = sessions.clone();
            tokio::spawn(
                async move {
                    let active = sessions.fetch_add(1, Ordering::SeqCst) + 1;
                    info!("Session opened ({} active)", active);
                    Self::handle_session(server, stream, peer).await;
                    let active = sessions.fetch_sub(1, Ordering::SeqCst) - 1;
                    info!("Session closed ({} active)", active);
                }
                .instrument(span),
            );
        }
    }

    async fn handle_session(server: McpServer, stream: TcpStream, peer: SocketAddr) {
        let service = match server.serve(stream).await {
            Ok(service) => service,
            Err(e) => {
                warn!("Failed to initialize session for {}: {}", peer, e);
                return;
            }
        };

        if let Err(e) = service.waiting().await {
            warn!("Session with {} ended with error: {}", peer, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::domains::diary::testing::StubSource;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    fn transport(port: u16) -> TcpTransport {
        TcpTransport::new(TcpConfig {
            host: "127.0.0.1".to_string(),
            port,
        })
    }

    #[test]
    fn test_address() {
        assert_eq!(transport(3001).address(), "127.0.0.1:3001");
    }

    #[tokio::test]
    async fn test_bind_conflict_is_bind_error() {
        let taken = transport(0).bind().await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let err = transport(port).bind().await.err().unwrap();
        match err {
            TransportError::BindError { address, .. } => {
                assert_eq!(address, format!("127.0.0.1:{}", port))
            }
            other => panic!("expected bind error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_session_answers_initialize() {
        let listener = transport(0).bind().await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = McpServer::new(Config::default(), StubSource::new().into_client());
        let accept = tokio::spawn(TcpTransport::serve(listener, server));

        let stream = TcpStream::connect(addr).await.unwrap();
        let (read, mut write) = stream.into_split();
        let initialize = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "tcp-test", "version": "0.0.0"}
            }
        });
        write
            .write_all(format!("{}\n", initialize).as_bytes())
            .await
            .unwrap();

        let mut lines = BufReader::new(read).lines();
        let line = tokio::time::timeout(Duration::from_secs(5), lines.next_line())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let response: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["serverInfo"]["name"], "myfitnesspal");
        assert!(response["result"]["capabilities"]["tools"].is_object());

        accept.abort();
    }
}
