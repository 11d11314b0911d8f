//! 股票行情服务模块
//!
//! 网关（MongoDB 查询）→ 清洗 → 窗口截取 / 聚合

pub mod aggregator;
pub mod gateway;
pub mod normalizer;
pub mod pipeline;
pub mod store;

// 重新导出常用类型，保持对外接口一致
pub use gateway::StockGateway;
pub use pipeline::process;
pub use store::{MongoStore, StockStore};
