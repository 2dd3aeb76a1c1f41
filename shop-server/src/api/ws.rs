//! 实时通道 WebSocket 端点
//!
//! GET /ws
//!
//! 协议 (JSON 文本帧 `{"event": ..., "data": ...}`):
//! - Server → Client: `updateProducts` (全量商品列表)
//! - Client → Server: `createProduct` / `deleteProduct`
//!
//! 连接建立后立即推送一次当前目录。入站消息处理失败只记录日志，
//! 不断开连接，也不通知客户端。

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use shared::message::{ClientEvent, ServerEvent};
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::core::ServerState;

/// GET /ws
pub async fn handle_ws(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_session(socket, state))
}

async fn ws_session(socket: WebSocket, state: ServerState) {
    let (mut sink, mut stream) = socket.split();
    let bus = state.message_bus.clone();

    // 先订阅再读取快照，避免两者之间的广播丢失
    let mut rx = bus.subscribe();
    let client_id = bus.register_client();
    tracing::info!(client_id = %client_id, clients = bus.client_count(), "WS client connected");

    let initial = ServerEvent::UpdateProducts(state.products.find_all().await);
    if send_event(&mut sink, &initial).await.is_err() {
        bus.unregister_client(&client_id);
        return;
    }

    let shutdown = bus.shutdown_token().clone();
    let mut ping_interval =
        tokio::time::interval(Duration::from_secs(state.config.ws_ping_interval_secs));
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }

            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        if send_event(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(client_id = %client_id, lagged = n, "WS subscriber lagged, resending full snapshot");
                        // 重新订阅，从当前位置开始接收
                        rx = bus.subscribe();
                        let snapshot = ServerEvent::UpdateProducts(state.products.find_all().await);
                        if send_event(&mut sink, &snapshot).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_message(&state, &client_id, &text).await;
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(client_id = %client_id, error = %e, "WS receive error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    bus.unregister_client(&client_id);
    tracing::info!(client_id = %client_id, clients = bus.client_count(), "WS client disconnected");
}

/// 处理一条入站消息
///
/// 成功的修改由 CatalogService 广播给所有连接 (包括发送者)。
async fn handle_client_message(state: &ServerState, client_id: &str, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(client_id = %client_id, error = %e, "Ignoring malformed WS message");
            return;
        }
    };

    let name = event.name();
    match event {
        ClientEvent::CreateProduct(payload) => match state.catalog.create_product(payload).await {
            Ok(product) => {
                tracing::info!(client_id = %client_id, id = product.id, "Product created via WS");
            }
            Err(e) => {
                tracing::warn!(client_id = %client_id, event = name, error = %e, "WS message failed");
            }
        },
        ClientEvent::DeleteProduct(id) => match state.catalog.delete_product(id).await {
            Ok(true) => {
                tracing::info!(client_id = %client_id, id, "Product deleted via WS");
            }
            Ok(false) => {
                tracing::warn!(client_id = %client_id, event = name, id, "Product not found");
            }
            Err(e) => {
                tracing::warn!(client_id = %client_id, event = name, error = %e, "WS message failed");
            }
        },
    }
}

async fn send_event<S>(sink: &mut S, event: &ServerEvent) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(event).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
