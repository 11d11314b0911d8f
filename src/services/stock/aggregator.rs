//! 时间窗口截取与 K 线聚合

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use crate::models::{Bucket, Candle, NormalizedPoint};

use super::normalizer::{format_date, DATE_FORMAT};

/// 行情聚合器
pub struct Aggregator;

impl Aggregator {
    /// 截取最近 `days` 天的数据
    ///
    /// `now` 与数据点同为无时区的本地时间
    pub fn apply_window(
        points: Vec<NormalizedPoint>,
        days: i64,
        now: NaiveDateTime,
    ) -> Result<Vec<NormalizedPoint>> {
        let start = Duration::try_days(days)
            .and_then(|d| now.checked_sub_signed(d))
            .ok_or_else(|| anyhow!("无法计算 {} 天时间窗口的起点", days))?;

        log::debug!("时间窗口起点: {}", start);
        Ok(points.into_iter().filter(|p| p.datetime >= start).collect())
    }

    /// 按月或按年聚合
    ///
    /// 输入须已按时间升序排列；只输出有数据的区间，日期为区间最后一天
    pub fn resample(points: &[NormalizedPoint], bucket: Bucket) -> Result<Vec<Candle>> {
        let mut buckets: BTreeMap<NaiveDate, Vec<&NormalizedPoint>> = BTreeMap::new();

        for point in points {
            let end = Self::bucket_end(point.datetime.date(), bucket)
                .ok_or_else(|| anyhow!("无法计算 {} 所在区间", point.datetime))?;
            buckets.entry(end).or_default().push(point);
        }

        log::debug!(
            "聚合 {} 条记录为 {} 个{}区间",
            points.len(),
            buckets.len(),
            match bucket {
                Bucket::Month => "月",
                Bucket::Year => "年",
            }
        );

        Ok(buckets
            .into_iter()
            .filter_map(|(end, records)| Self::aggregate_ohlcv(&records, end))
            .collect())
    }

    /// 不聚合，每条数据点对应一根 K 线
    pub fn to_candles(points: &[NormalizedPoint]) -> Vec<Candle> {
        points
            .iter()
            .map(|p| Candle {
                date: format_date(&p.datetime),
                open: p.open,
                high: p.high,
                low: p.low,
                close: p.close,
                volume: p.volume,
                emiten: p.emiten.clone(),
            })
            .collect()
    }

    /// 计算区间最后一天
    fn bucket_end(date: NaiveDate, bucket: Bucket) -> Option<NaiveDate> {
        match bucket {
            Bucket::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?
                .checked_add_months(Months::new(1))?
                .pred_opt(),
            Bucket::Year => NaiveDate::from_ymd_opt(date.year(), 12, 31),
        }
    }

    /// OHLCV 归并：首个开盘、最高、最低、最后收盘、成交量求和
    fn aggregate_ohlcv(records: &[&NormalizedPoint], end: NaiveDate) -> Option<Candle> {
        let first = records.first()?;
        let last = records.last()?;

        Some(Candle {
            date: end.format(DATE_FORMAT).to_string(),
            open: first.open,
            high: records.iter().map(|r| r.high).fold(f64::MIN, f64::max),
            low: records.iter().map(|r| r.low).fold(f64::MAX, f64::min),
            close: last.close,
            volume: records.iter().map(|r| r.volume).sum(),
            emiten: first.emiten.clone(),
        })
    }
}
