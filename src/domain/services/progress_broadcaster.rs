// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::progress_event::ProgressEvent;

/// 进度事件发布接口
///
/// 实现必须是非阻塞的：慢订阅者不能拖住任务执行
pub trait ProgressBroadcaster: Send + Sync {
    fn publish(&self, event: ProgressEvent);
}
