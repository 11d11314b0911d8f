//! 业务错误定义
//!
//! “无数据”不是错误，以空列表表示

use thiserror::Error;

/// 股票行情服务错误
#[derive(Debug, Error)]
pub enum StockError {
    /// 股票代码为空
    #[error("股票代码不能为空")]
    InvalidEmiten,

    /// 数据库未配置、不可达或重连失败
    #[error("数据库不可用: {0}")]
    StoreUnavailable(String),

    /// 连接正常但查询/读取游标失败
    #[error("查询 {emiten} 数据失败 (period: {period}): {message}")]
    Query {
        emiten: String,
        period: String,
        message: String,
    },

    /// 清洗或聚合阶段的异常
    #[error("处理 {emiten} 数据失败 (period: {period}): {message}")]
    Processing {
        emiten: String,
        period: String,
        message: String,
    },
}

impl StockError {
    pub fn processing(emiten: &str, period: &str, message: impl Into<String>) -> Self {
        Self::Processing {
            emiten: emiten.to_string(),
            period: period.to_string(),
            message: message.into(),
        }
    }

    pub fn query(emiten: &str, period: &str, message: impl Into<String>) -> Self {
        Self::Query {
            emiten: emiten.to_string(),
            period: period.to_string(),
            message: message.into(),
        }
    }
}
