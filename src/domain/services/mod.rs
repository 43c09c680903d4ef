// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 提取服务（extraction）：从页面内容中提取联系信息
/// - 进度广播（progress_broadcaster）：任务事件的发布接口
/// - 限流服务（rate_limiting_service）：按域名的滑动窗口限流
pub mod extraction;
pub mod progress_broadcaster;
pub mod rate_limiting_service;
