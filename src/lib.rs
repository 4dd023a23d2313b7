// FaceUp 演员市场后端库
//
// 演员目录的搜索、过滤、排序与对比，以及订单、消息和用户资料接口。

pub mod api;
pub mod config;
pub mod database;
pub mod models;
pub mod services;
