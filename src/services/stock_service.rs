use chrono_tz::Tz;
use std::sync::Arc;

use crate::error::StockError;
use crate::models::Candle;
use crate::services::stock::{process, StockGateway, StockStore};

/// 股票行情服务
///
/// 组合查询网关与清洗聚合流水线，作为 actix 共享状态注入各 handler
#[derive(Clone)]
pub struct StockService {
    gateway: StockGateway,
    timezone: Tz,
}

impl StockService {
    pub fn new(store: Arc<dyn StockStore>, timezone: Tz) -> Self {
        Self {
            gateway: StockGateway::new(store),
            timezone,
        }
    }

    /// 获取股票行情（可按月/按年聚合，可截取最近 1/3/5 年）
    ///
    /// 无数据时返回空列表
    pub async fn get_stock_data(&self, emiten: &str, period: &str) -> Result<Vec<Candle>, StockError> {
        let records = self.gateway.fetch(emiten, period).await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let candles = process(emiten, &records, period, self.timezone)?;
        log::info!(
            "{} (period: {}) 原始 {} 条，输出 {} 条",
            emiten,
            period,
            records.len(),
            candles.len()
        );
        Ok(candles)
    }

    pub async fn is_store_connected(&self) -> bool {
        self.gateway.is_connected().await
    }

    /// 启动时预连接数据库
    pub async fn warm_up(&self) {
        self.gateway.warm_up().await;
    }
}
