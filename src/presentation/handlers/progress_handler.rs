// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Extension,
    },
    response::IntoResponse,
};
use tracing::{debug, warn};

use crate::infrastructure::broadcast::broadcast_hub::BroadcastHub;

/// 进度事件WebSocket端点
///
/// 每个连接注册为一个订阅者，所有事件以JSON文本帧转发。
/// 客户端断开后取消订阅
pub async fn progress_ws(
    ws: WebSocketUpgrade,
    Extension(hub): Extension<BroadcastHub>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| forward_events(socket, hub))
}

async fn forward_events(mut socket: WebSocket, hub: BroadcastHub) {
    let (id, mut events) = hub.subscribe();
    debug!(subscriber = %id, "WebSocket client connected");

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Failed to serialize progress event: {}", e);
                        continue;
                    }
                };
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    hub.unsubscribe(id);
    debug!(subscriber = %id, "WebSocket client disconnected");
}
