//! 股票数据模型
//!
//! 定义行情文档的原始形态、清洗后的数据点以及对外输出的 K 线

use chrono::NaiveDateTime;
use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

/// 日期字段名
pub const DATE_FIELD: &str = "Date";

/// 五个数值字段名（按输出顺序）
pub const NUMERIC_FIELDS: [&str; 5] = ["Open", "High", "Low", "Close", "Volume"];

/// 原始字段值
///
/// 入库数据来自爬虫，同一字段可能是带千分位的字符串，也可能已经是数字
#[derive(Debug, Clone, PartialEq)]
pub enum RawField {
    /// 文档中没有该字段
    Missing,
    /// 字符串
    Text(String),
    /// 数值（Int32/Int64/Double 统一为 f64）
    Number(f64),
    /// 日期时间（BSON datetime，按 UTC 去掉时区）
    DateTime(NaiveDateTime),
    /// 其他无法使用的类型，保存类型名便于排查
    Other(&'static str),
}

impl RawField {
    pub fn is_missing(&self) -> bool {
        matches!(self, RawField::Missing)
    }

    fn from_bson(value: Option<&Bson>) -> Self {
        match value {
            None => RawField::Missing,
            Some(Bson::String(s)) => RawField::Text(s.clone()),
            Some(Bson::Double(v)) => RawField::Number(*v),
            Some(Bson::Int32(v)) => RawField::Number(f64::from(*v)),
            Some(Bson::Int64(v)) => RawField::Number(*v as f64),
            Some(Bson::DateTime(dt)) => {
                match chrono::DateTime::from_timestamp_millis(dt.timestamp_millis()) {
                    Some(utc) => RawField::DateTime(utc.naive_utc()),
                    None => RawField::Other("datetime"),
                }
            }
            Some(Bson::Null) => RawField::Other("null"),
            Some(Bson::Boolean(_)) => RawField::Other("bool"),
            Some(Bson::Document(_)) => RawField::Other("document"),
            Some(Bson::Array(_)) => RawField::Other("array"),
            Some(_) => RawField::Other("unsupported"),
        }
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        RawField::Text(value.to_string())
    }
}

/// 原始行情记录（入库形态）
#[derive(Debug, Clone, PartialEq)]
pub struct StockRecord {
    /// 股票代码
    pub emiten: String,
    /// 日期，格式 DD/MM/YYYY - HH:MM 或 DD/MM/YYYY
    pub date: RawField,
    pub open: RawField,
    pub high: RawField,
    pub low: RawField,
    pub close: RawField,
    pub volume: RawField,
}

impl StockRecord {
    /// 从 MongoDB 文档构造
    ///
    /// # 参数
    /// - doc: 原始文档
    /// - emiten_field: 股票代码字段名
    /// - emiten: 查询时使用的股票代码，文档中缺失时使用
    pub fn from_document(doc: &Document, emiten_field: &str, emiten: &str) -> Self {
        let emiten = doc
            .get_str(emiten_field)
            .map(str::to_string)
            .unwrap_or_else(|_| emiten.to_string());

        Self {
            emiten,
            date: RawField::from_bson(doc.get(DATE_FIELD)),
            open: RawField::from_bson(doc.get("Open")),
            high: RawField::from_bson(doc.get("High")),
            low: RawField::from_bson(doc.get("Low")),
            close: RawField::from_bson(doc.get("Close")),
            volume: RawField::from_bson(doc.get("Volume")),
        }
    }

    /// 按 NUMERIC_FIELDS 顺序返回数值字段
    pub fn numeric_fields(&self) -> [&RawField; 5] {
        [&self.open, &self.high, &self.low, &self.close, &self.volume]
    }
}

/// 清洗后的数据点
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPoint {
    pub emiten: String,
    pub datetime: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// K 线（OHLCV）
///
/// 字段名与原接口保持一致（首字母大写）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 日期（DD/MM/YYYY）
    #[serde(rename = "Date")]
    pub date: String,
    /// 开盘价
    #[serde(rename = "Open")]
    pub open: f64,
    /// 最高价
    #[serde(rename = "High")]
    pub high: f64,
    /// 最低价
    #[serde(rename = "Low")]
    pub low: f64,
    /// 收盘价
    #[serde(rename = "Close")]
    pub close: f64,
    /// 成交量
    #[serde(rename = "Volume")]
    pub volume: f64,
    /// 股票代码
    pub emiten: String,
}

/// 行情查询参数
#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    /// 周期：daily, monthly, yearly, 1y, 3y, 5y, all
    pub period: Option<String>,
}
