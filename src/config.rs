//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，并允许环境变量（含 .env）覆盖数据库等敏感项

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use chrono_tz::Tz;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// API 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API Key（为空则不启用认证）
    #[serde(default)]
    pub api_key: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// MongoDB 连接串
    #[serde(default)]
    pub connection_string: String,
    /// 数据库名
    #[serde(default)]
    pub database_name: String,
    /// 行情集合名
    #[serde(default)]
    pub collection: String,
    /// 连接/选服超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// 文档中股票代码字段名
    #[serde(default = "default_emiten_field")]
    pub emiten_field: String,
}

/// 市场配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// 交易所所在时区（IANA 名称），用于计算时间窗口的“当前时间”
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// API 配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 市场配置
    #[serde(default)]
    pub market: MarketConfig,
    /// 配置来源说明（日志系统初始化后再输出）
    #[serde(skip)]
    pub source: String,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }
fn default_connect_timeout() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }
fn default_emiten_field() -> String { "emiten".to_string() }
fn default_timezone() -> String { "Asia/Jakarta".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            database_name: String::new(),
            collection: String::new(),
            connect_timeout_secs: default_connect_timeout(),
            emiten_field: default_emiten_field(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl DatabaseConfig {
    /// 连接串、库名、集合名是否都已配置
    pub fn is_configured(&self) -> bool {
        !self.connection_string.is_empty()
            && !self.database_name.is_empty()
            && !self.collection.is_empty()
    }
}

impl MarketConfig {
    /// 解析时区，无法识别时回退到 Asia/Jakarta
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            log::warn!("无法识别的时区 {}，使用 Asia/Jakarta", self.timezone);
            chrono_tz::Asia::Jakarta
        })
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值，最后应用环境变量覆盖
    ///
    /// 调用前应先加载 .env（见 main）
    pub fn load() -> Self {
        let config_paths = ["config.json", "config/config.json"];
        let mut notes = Vec::new();
        let mut loaded = None;

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        notes.push(format!("从 {} 加载配置成功", path));
                        loaded = Some(config);
                        break;
                    }
                    Err(e) => notes.push(format!("加载配置文件 {} 失败: {}", path, e)),
                }
            }
        }

        let mut config = loaded.unwrap_or_else(|| {
            notes.push("使用默认配置".to_string());
            Self::default()
        });
        config.apply_env(|key| env::var(key).ok());
        config.source = notes.join("; ");
        config
    }

    /// 应用环境变量覆盖
    ///
    /// 变量名沿用原部署的 .env 约定
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("MONGODB_CONNECTION_STRING") {
            self.database.connection_string = v;
        }
        if let Some(v) = non_empty("MONGODB_DATABASE_NAME") {
            self.database.database_name = v;
        }
        if let Some(v) = non_empty("COLLECTION_YFINANCE_DATA") {
            self.database.collection = v;
        }
        if let Some(v) = non_empty("API_KEY") {
            self.api.api_key = v;
        }
        if let Some(v) = non_empty("MARKET_TIMEZONE") {
            self.market.timezone = v;
        }
        if let Some(port) = non_empty("PORT").and_then(|v| v.trim().parse().ok()) {
            self.server.port = port;
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
