// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP 与 WebSocket 处理器
pub mod progress_handler;
pub mod scrape_handler;
