//! 查询周期
//!
//! 一个参数同时决定两件事：是否截取最近 N 年（时间窗口），以及是否按月/年聚合。
//! monthly/yearly 只聚合、不截取，覆盖全部历史。

use std::fmt;

/// 聚合粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Month,
    Year,
}

/// 查询周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    Monthly,
    Yearly,
    OneYear,
    ThreeYears,
    FiveYears,
    All,
}

impl Period {
    /// 解析周期参数，无法识别的值按 all 处理
    ///
    /// 区分大小写且不去空白，"MONTHLY" 和 " 1y " 都按 all 处理
    pub fn parse(value: &str) -> Self {
        match value {
            "daily" => Period::Daily,
            "monthly" => Period::Monthly,
            "yearly" => Period::Yearly,
            "1y" => Period::OneYear,
            "3y" => Period::ThreeYears,
            "5y" => Period::FiveYears,
            "all" => Period::All,
            other => {
                log::debug!("未知周期 {:?}，按 all 处理", other);
                Period::All
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
            Period::OneYear => "1y",
            Period::ThreeYears => "3y",
            Period::FiveYears => "5y",
            Period::All => "all",
        }
    }

    /// 时间窗口天数（一年固定按 365 天计）
    pub fn window_days(&self) -> Option<i64> {
        match self {
            Period::OneYear => Some(365),
            Period::ThreeYears => Some(3 * 365),
            Period::FiveYears => Some(5 * 365),
            _ => None,
        }
    }

    pub fn bucket(&self) -> Option<Bucket> {
        match self {
            Period::Monthly => Some(Bucket::Month),
            Period::Yearly => Some(Bucket::Year),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
