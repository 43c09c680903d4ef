// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用层
///
/// 请求DTO与任务提交用例
pub mod dto;
pub mod usecases;
