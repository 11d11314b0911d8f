//! 清洗与聚合流水线
//!
//! 任何处理阶段的异常都在这里转换为 `StockError::Processing`，与“无数据”的空列表区分开

use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::error::StockError;
use crate::models::{Candle, Period, StockRecord};

use super::aggregator::Aggregator;
use super::normalizer::{check_columns, normalize};

/// 处理原始记录，“当前时间”取市场时区的本地时间
pub fn process(
    emiten: &str,
    records: &[StockRecord],
    period: &str,
    tz: Tz,
) -> Result<Vec<Candle>, StockError> {
    let now = Utc::now().with_timezone(&tz).naive_local();
    process_at(emiten, records, period, now)
}

/// 以指定的当前时间处理原始记录
pub fn process_at(
    emiten: &str,
    records: &[StockRecord],
    period: &str,
    now: NaiveDateTime,
) -> Result<Vec<Candle>, StockError> {
    run(records, Period::parse(period), now).map_err(|e| {
        log::error!("处理 {} 数据失败 (period: {}): {:#}", emiten, period, e);
        StockError::processing(emiten, period, format!("{:#}", e))
    })
}

fn run(records: &[StockRecord], period: Period, now: NaiveDateTime) -> Result<Vec<Candle>> {
    log::debug!("按周期 {} 处理 {} 条记录", period, records.len());
    check_columns(records)?;

    let mut points = normalize(records);
    if points.is_empty() {
        return Ok(Vec::new());
    }

    if let Some(days) = period.window_days() {
        points = Aggregator::apply_window(points, days, now)?;
        if points.is_empty() {
            return Ok(Vec::new());
        }
    }

    match period.bucket() {
        Some(bucket) => Aggregator::resample(&points, bucket),
        None => Ok(Aggregator::to_candles(&points)),
    }
}
