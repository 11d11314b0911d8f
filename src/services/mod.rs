//! 业务逻辑服务模块
//!
//! 封装数据获取和处理逻辑

pub mod stock;          // 行情查询、清洗与聚合
pub mod stock_service;  // 对外服务入口

pub use stock_service::StockService;
