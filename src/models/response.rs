//! 错误响应信封
//!
//! 行情接口成功时直接返回 K 线数组，只有健康检查和失败时才包一层信封

use chrono::Utc;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::StockError;

/// 信封时间戳使用的市场时区（IDX 交易所）
pub const ENVELOPE_TZ: Tz = chrono_tz::Asia::Jakarta;

/// 统一信封：{success, data, message, timestamp}
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    /// RFC 3339，带 +07:00 偏移
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::build(true, Some(data), "Success")
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::build(false, None, message)
    }

    fn build(success: bool, data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            success,
            data,
            message: message.into(),
            timestamp: Utc::now().with_timezone(&ENVELOPE_TZ).to_rfc3339(),
        }
    }
}

impl From<&StockError> for ApiResponse<()> {
    /// 失败时从不携带部分数据
    fn from(err: &StockError) -> Self {
        ApiResponse::error(err.to_string())
    }
}
