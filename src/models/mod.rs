//! 数据模型模块
//! 与后端 REST 接口交换的请求/响应结构

pub mod auth;
pub mod booking;
pub mod contact;
pub mod payment;
pub mod premise;
pub mod review;
