// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 请求DTO和任务提交用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、服务和仓库接口
pub mod domain;

/// 引擎模块
///
/// 静态HTTP获取与无头浏览器渲染
pub mod engines;

/// 基础设施模块
///
/// 提供数据库、缓存、事件广播和指标等外部集成
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP与WebSocket请求，包括路由、处理器和错误响应
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 任务编排与后台清理
pub mod workers;
