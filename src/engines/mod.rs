// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 页面获取模块
///
/// 提供静态HTTP获取、无头浏览器渲染以及带限流的回退路由
pub mod playwright_engine;
pub mod reqwest_engine;
pub mod router;
pub mod traits;
pub mod user_agents;
