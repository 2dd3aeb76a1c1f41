//! Server Implementation
//!
//! HTTP 服务器启动和管理

use tokio::net::TcpListener;

use crate::core::{Config, Result, ServerError, ServerState};
use crate::routes::build_app;

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn new(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> Result<()> {
        let state = self.state.clone();

        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;

        tracing::info!("🦀 Crab Shop Server listening on http://{}", addr);
        tracing::info!("  Environment  : {}", self.config.environment);
        tracing::info!("  Data dir     : {}", self.config.data_dir);
        tracing::info!("  Realtime     : ws://{}/ws", addr);

        let app = build_app().with_state(state.clone());

        let bus = state.message_bus.clone();
        let shutdown = async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            // 通知 WebSocket 会话退出，否则长连接会阻塞优雅关闭
            bus.shutdown();
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}
