//! 停车预订客户端库
//! 提供预订校验与计价、带令牌刷新的 API 网关以及各业务接口封装

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod validation;
