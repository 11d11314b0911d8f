//! 查询网关
//!
//! 只按股票代码做等值查询，时间窗口在内存中处理

use std::sync::Arc;

use crate::error::StockError;
use crate::models::StockRecord;

use super::store::StockStore;

/// 行情查询网关
#[derive(Clone)]
pub struct StockGateway {
    store: Arc<dyn StockStore>,
}

impl StockGateway {
    pub fn new(store: Arc<dyn StockStore>) -> Self {
        Self { store }
    }

    /// 查询某只股票的全部原始记录
    ///
    /// # 参数
    /// - emiten: 股票代码（如 BBCA.JK）
    /// - period: 周期，仅用于错误上下文
    ///
    /// 没有匹配记录时返回空列表。代码按原样查询，不做 trim
    pub async fn fetch(&self, emiten: &str, period: &str) -> Result<Vec<StockRecord>, StockError> {
        if emiten.trim().is_empty() {
            return Err(StockError::InvalidEmiten);
        }

        if let Err(e) = self.store.ensure_connected().await {
            log::warn!("查询 {} (period: {}) 时数据库不可用: {}", emiten, period, e);
            return Err(e);
        }

        match self.store.find_by_emiten(emiten).await {
            Ok(records) => {
                log::debug!("{} 查询到 {} 条记录", emiten, records.len());
                Ok(records)
            }
            Err(e) => {
                log::error!("查询 {} (period: {}) 失败: {}", emiten, period, e);
                Err(StockError::query(emiten, period, e.to_string()))
            }
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.store.is_connected().await
    }

    /// 启动时尝试连接，失败只记录日志，后续请求会再次尝试
    pub async fn warm_up(&self) {
        if let Err(e) = self.store.ensure_connected().await {
            log::warn!("启动时连接数据库失败，将在请求时重试: {}", e);
        }
    }
}
