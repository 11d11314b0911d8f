//! 行情清洗
//!
//! 把入库的原始文档整理成按时间升序的数据点：
//! 解析日期 → 丢弃无效日期 → 解析数值 → 丢弃无效数值 → 稳定排序

use anyhow::{bail, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{NormalizedPoint, RawField, StockRecord, DATE_FIELD, NUMERIC_FIELDS};

/// 带时间的日期格式，如 "02/01/2024 - 09:00"
pub const DATETIME_FORMAT: &str = "%d/%m/%Y - %H:%M";
/// 纯日期格式，如 "02/01/2024"
pub const DATE_FORMAT: &str = "%d/%m/%Y";
/// 日期与时间之间的分隔符
const DATE_TIME_SEPARATOR: &str = " - ";

/// 解析日期字符串
///
/// 先按 DD/MM/YYYY - HH:MM 解析，失败后取分隔符前的部分按 DD/MM/YYYY 解析（零点）
pub fn parse_date_str(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT) {
        return Some(dt);
    }

    let date_part = value
        .split_once(DATE_TIME_SEPARATOR)
        .map_or(value, |(date, _)| date);
    NaiveDate::parse_from_str(date_part.trim(), DATE_FORMAT)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// 解析日期字段
pub fn parse_date(field: &RawField) -> Option<NaiveDateTime> {
    match field {
        RawField::Text(s) => parse_date_str(s),
        RawField::DateTime(dt) => Some(*dt),
        _ => None,
    }
}

/// 解析数值字符串，去掉千分位逗号
pub fn parse_number_str(value: &str) -> Option<f64> {
    let cleaned = value.replace(',', "");
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// 解析数值字段，无效时返回 None（整行会被丢弃，不会补 0）
pub fn parse_number(field: &RawField) -> Option<f64> {
    match field {
        RawField::Text(s) => parse_number_str(s),
        RawField::Number(v) if v.is_finite() => Some(*v),
        RawField::Other(kind) => {
            log::trace!("无法使用的字段类型: {}", kind);
            None
        }
        _ => None,
    }
}

/// 格式化为 DD/MM/YYYY（丢弃时间）
pub fn format_date(dt: &NaiveDateTime) -> String {
    dt.format(DATE_FORMAT).to_string()
}

/// 检查整批数据的字段结构
///
/// 某个字段在所有文档中都不存在，说明集合结构不对，属于处理错误而不是“无数据”
pub fn check_columns(records: &[StockRecord]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    if records.iter().all(|r| r.date.is_missing()) {
        bail!("所有文档都缺少字段 {}", DATE_FIELD);
    }

    for (idx, name) in NUMERIC_FIELDS.iter().enumerate() {
        if records.iter().all(|r| r.numeric_fields()[idx].is_missing()) {
            bail!("所有文档都缺少字段 {}", name);
        }
    }

    Ok(())
}

/// 清洗原始记录，返回按时间升序排列的数据点
///
/// 同一时间的多条记录保持到达顺序，不去重
pub fn normalize(records: &[StockRecord]) -> Vec<NormalizedPoint> {
    let dated: Vec<(&StockRecord, NaiveDateTime)> = records
        .iter()
        .filter_map(|r| parse_date(&r.date).map(|dt| (r, dt)))
        .collect();

    if dated.len() < records.len() {
        log::debug!("丢弃 {} 条日期无效的记录", records.len() - dated.len());
    }
    if dated.is_empty() {
        return Vec::new();
    }

    let total = dated.len();
    let mut points: Vec<NormalizedPoint> = dated
        .into_iter()
        .filter_map(|(record, datetime)| {
            let [open, high, low, close, volume] = record.numeric_fields().map(parse_number);
            Some(NormalizedPoint {
                emiten: record.emiten.clone(),
                datetime,
                open: open?,
                high: high?,
                low: low?,
                close: close?,
                volume: volume?,
            })
        })
        .collect();

    if points.len() < total {
        log::debug!("丢弃 {} 条数值无效的记录", total - points.len());
    }

    // sort_by_key 是稳定排序
    points.sort_by_key(|p| p.datetime);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn record(date: &str, values: [&str; 5]) -> StockRecord {
        StockRecord {
            emiten: "BBCA.JK".to_string(),
            date: RawField::from(date),
            open: RawField::from(values[0]),
            high: RawField::from(values[1]),
            low: RawField::from(values[2]),
            close: RawField::from(values[3]),
            volume: RawField::from(values[4]),
        }
    }

    #[test]
    fn test_parse_date_with_time() {
        let dt = parse_date_str("15/03/2024 - 14:30").unwrap();
        assert_eq!((dt.day(), dt.month(), dt.year()), (15, 3, 2024));
        assert_eq!((dt.hour(), dt.minute()), (14, 30));
    }

    #[test]
    fn test_parse_date_without_time_is_midnight() {
        let dt = parse_date_str("29/02/2024").unwrap();
        assert_eq!((dt.day(), dt.month(), dt.year()), (29, 2, 2024));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 0, 0));
    }

    #[test]
    fn test_parse_date_falls_back_to_date_part() {
        // 时间部分无法解析时只取日期
        let dt = parse_date_str("01/07/2023 - 25:99").unwrap();
        assert_eq!((dt.day(), dt.month(), dt.year()), (1, 7, 2023));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_date_invalid() {
        for input in ["", "2024-03-15", "31/02/2024", "not a date", "15/13/2024 - 10:00"] {
            assert!(parse_date_str(input).is_none(), "应当无法解析: {:?}", input);
        }
        assert!(parse_date(&RawField::Missing).is_none());
        assert!(parse_date(&RawField::Number(20240315.0)).is_none());
    }

    #[test]
    fn test_format_date_round_trip() {
        for input in ["05/03/2024 - 09:15", "05/03/2024", "31/12/1999 - 23:59"] {
            let dt = parse_date_str(input).unwrap();
            let date_part = input.split(" - ").next().unwrap();
            assert_eq!(format_date(&dt), date_part);
        }
    }

    #[test]
    fn test_parse_number_thousands_separator() {
        assert_eq!(parse_number_str("1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_number_str("9,875.50"), Some(9875.5));
        assert_eq!(parse_number_str(" 42 "), Some(42.0));
        assert_eq!(parse_number(&RawField::Number(7.25)), Some(7.25));
    }

    #[test]
    fn test_parse_number_junk_is_invalid() {
        for input in ["", "-", "abc", "1.2.3", "NaN", "inf"] {
            assert!(parse_number_str(input).is_none(), "应当无效: {:?}", input);
        }
        assert!(parse_number(&RawField::Missing).is_none());
        assert!(parse_number(&RawField::Other("bool")).is_none());
        assert!(parse_number(&RawField::Number(f64::NAN)).is_none());
    }

    #[test]
    fn test_normalize_drops_invalid_rows_and_sorts() {
        let records = vec![
            record("03/01/2024", ["3", "3", "3", "3", "300"]),
            record("bad date", ["9", "9", "9", "9", "900"]),
            record("01/01/2024 - 09:00", ["1", "1", "1", "1", "1,000"]),
            record("02/01/2024", ["2", "x", "2", "2", "200"]),
        ];

        let points = normalize(&records);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].open, 1.0);
        assert_eq!(points[0].volume, 1000.0);
        assert_eq!(points[1].open, 3.0);
        // 没有任何一行被补 0
        assert!(points.iter().all(|p| p.high != 0.0));
    }

    #[test]
    fn test_normalize_keeps_duplicates_in_arrival_order() {
        let records = vec![
            record("02/01/2024", ["20", "20", "20", "20", "1"]),
            record("01/01/2024", ["10", "10", "10", "10", "1"]),
            record("02/01/2024", ["21", "21", "21", "21", "1"]),
        ];

        let points = normalize(&records);
        let opens: Vec<f64> = points.iter().map(|p| p.open).collect();
        assert_eq!(opens, vec![10.0, 20.0, 21.0]);
    }

    #[test]
    fn test_normalize_all_invalid_dates() {
        let records = vec![
            record("??", ["1", "1", "1", "1", "1"]),
            record("2024/01/01", ["1", "1", "1", "1", "1"]),
        ];
        assert!(normalize(&records).is_empty());
    }

    #[test]
    fn test_check_columns() {
        assert!(check_columns(&[]).is_ok());

        let mut records = vec![record("01/01/2024", ["1", "1", "1", "1", "1"])];
        assert!(check_columns(&records).is_ok());

        // 个别文档缺字段只会丢行，全部缺失才算结构错误
        let mut partial = record("02/01/2024", ["1", "1", "1", "1", "1"]);
        partial.volume = RawField::Missing;
        records.push(partial);
        assert!(check_columns(&records).is_ok());

        for r in records.iter_mut() {
            r.volume = RawField::Missing;
        }
        let err = check_columns(&records).unwrap_err();
        assert!(err.to_string().contains("Volume"));
    }
}
