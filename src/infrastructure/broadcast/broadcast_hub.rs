// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::progress_event::ProgressEvent;
use crate::domain::services::progress_broadcaster::ProgressBroadcaster;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;
use uuid::Uuid;

/// 进度事件订阅中心
///
/// 每个订阅者持有一个有界队列。发布永不阻塞：
/// 队列已满时该订阅者丢弃此事件，接收端已关闭时移除订阅者
#[derive(Clone)]
pub struct BroadcastHub {
    subscribers: Arc<DashMap<Uuid, mpsc::Sender<ProgressEvent>>>,
    buffer: usize,
}

impl BroadcastHub {
    /// 创建订阅中心
    ///
    /// # 参数
    ///
    /// * `buffer` - 每个订阅者的队列容量
    pub fn new(buffer: usize) -> Self {
        Self {
            subscribers: Arc::new(DashMap::new()),
            buffer: buffer.max(1),
        }
    }

    /// 注册新的订阅者，返回订阅ID和事件接收端
    pub fn subscribe(&self) -> (Uuid, mpsc::Receiver<ProgressEvent>) {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = Uuid::new_v4();
        self.subscribers.insert(id, tx);
        debug!(subscriber = %id, "Progress subscriber registered");
        (id, rx)
    }

    pub fn unsubscribe(&self, id: Uuid) {
        if self.subscribers.remove(&id).is_some() {
            debug!(subscriber = %id, "Progress subscriber removed");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(256)
    }
}

impl ProgressBroadcaster for BroadcastHub {
    fn publish(&self, event: ProgressEvent) {
        let mut closed = Vec::new();

        for subscriber in self.subscribers.iter() {
            match subscriber.value().try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    debug!(subscriber = %subscriber.key(), kind = event.kind(), "Subscriber buffer full, dropping event");
                }
                Err(TrySendError::Closed(_)) => closed.push(*subscriber.key()),
            }
        }

        // 迭代器释放分片锁之后才能删除
        for id in closed {
            self.unsubscribe(id);
        }
    }
}
