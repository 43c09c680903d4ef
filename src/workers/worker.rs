// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::WorkerError;
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 后台工作器
///
/// `run` 在关闭信号到来前不返回；`spawn` 把工作器放到独立任务中，
/// 异常退出时记录错误日志
#[async_trait]
pub trait Worker: Send + Sync {
    async fn run(&self) -> Result<(), WorkerError>;

    fn name(&self) -> &str;

    fn spawn(self) -> JoinHandle<()>
    where
        Self: Sized + 'static,
    {
        tokio::spawn(async move {
            match self.run().await {
                Ok(()) => info!(worker = self.name(), "Worker stopped"),
                Err(e) => error!(worker = self.name(), "Worker exited with error: {}", e),
            }
        })
    }
}
