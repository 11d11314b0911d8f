//! 行情存储
//!
//! `StockStore` 是网关依赖的存储抽象，生产环境使用 MongoDB。
//! 连接在启动时尝试一次，失败后在请求到来时懒重连。

use anyhow::{bail, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

use crate::config::DatabaseConfig;
use crate::error::StockError;
use crate::models::StockRecord;

/// 行情存储抽象
#[async_trait]
pub trait StockStore: Send + Sync {
    /// 确保连接可用，已连接时直接返回
    ///
    /// 并发调用可能重复建立连接，只保留第一个成功的连接
    async fn ensure_connected(&self) -> Result<(), StockError>;

    /// 当前是否持有连接
    async fn is_connected(&self) -> bool;

    /// 按股票代码查询全部原始记录（不做日期过滤，不分页）
    async fn find_by_emiten(&self, emiten: &str) -> Result<Vec<StockRecord>>;
}

/// MongoDB 行情存储
pub struct MongoStore {
    config: DatabaseConfig,
    collection: RwLock<Option<Collection<Document>>>,
}

impl MongoStore {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            collection: RwLock::new(None),
        }
    }

    /// 建立连接并用 ping 验证
    async fn connect(&self) -> Result<Collection<Document>> {
        if !self.config.is_configured() {
            bail!("MongoDB 连接信息未配置（MONGODB_CONNECTION_STRING / MONGODB_DATABASE_NAME / COLLECTION_YFINANCE_DATA）");
        }

        log::info!("连接 MongoDB: {}", redact_uri(&self.config.connection_string));

        let timeout = Duration::from_secs(self.config.connect_timeout_secs);
        let mut options = ClientOptions::parse(&self.config.connection_string).await?;
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)?;
        client.database("admin").run_command(doc! { "ping": 1 }).await?;

        Ok(client
            .database(&self.config.database_name)
            .collection::<Document>(&self.config.collection))
    }
}

#[async_trait]
impl StockStore for MongoStore {
    async fn ensure_connected(&self) -> Result<(), StockError> {
        if self.collection.read().await.is_some() {
            return Ok(());
        }

        // 连接过程中不持有锁
        match self.connect().await {
            Ok(collection) => {
                let mut guard = self.collection.write().await;
                if guard.is_none() {
                    *guard = Some(collection);
                    log::info!("MongoDB 连接成功");
                }
                Ok(())
            }
            Err(e) => {
                log::error!("MongoDB 连接失败: {}", e);
                Err(StockError::StoreUnavailable(e.to_string()))
            }
        }
    }

    async fn is_connected(&self) -> bool {
        self.collection.read().await.is_some()
    }

    async fn find_by_emiten(&self, emiten: &str) -> Result<Vec<StockRecord>> {
        let collection = match self.collection.read().await.as_ref() {
            Some(c) => c.clone(),
            None => bail!("MongoDB 未连接"),
        };

        let field = self.config.emiten_field.as_str();
        let mut filter = Document::new();
        filter.insert(field, emiten);

        let cursor = collection.find(filter).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;

        Ok(docs
            .iter()
            .map(|d| StockRecord::from_document(d, field, emiten))
            .collect())
    }
}

/// 隐藏连接串中的密码，用于日志输出
pub fn redact_uri(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.to_string()
        }
        Err(_) => "<无法解析的连接串>".to_string(),
    }
}

#[cfg(test)]
pub mod testing {
    //! 测试用内存存储

    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    pub struct MemoryStore {
        docs: Vec<Document>,
        reachable: bool,
        connected: AtomicBool,
        pub connect_attempts: AtomicUsize,
        pub queries: AtomicUsize,
    }

    impl MemoryStore {
        pub fn new(docs: Vec<Document>) -> Self {
            Self {
                docs,
                reachable: true,
                connected: AtomicBool::new(false),
                connect_attempts: AtomicUsize::new(0),
                queries: AtomicUsize::new(0),
            }
        }

        /// 永远连不上的存储
        pub fn unreachable() -> Self {
            Self {
                reachable: false,
                ..Self::new(Vec::new())
            }
        }
    }

    #[async_trait]
    impl StockStore for MemoryStore {
        async fn ensure_connected(&self) -> Result<(), StockError> {
            if self.connected.load(Ordering::SeqCst) {
                return Ok(());
            }
            self.connect_attempts.fetch_add(1, Ordering::SeqCst);
            if !self.reachable {
                return Err(StockError::StoreUnavailable("connection refused".to_string()));
            }
            self.connected.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn is_connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }

        async fn find_by_emiten(&self, emiten: &str) -> Result<Vec<StockRecord>> {
            if !self.connected.load(Ordering::SeqCst) {
                bail!("未连接");
            }
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .docs
                .iter()
                .filter(|d| d.get_str("emiten").map_or(false, |e| e == emiten))
                .map(|d| StockRecord::from_document(d, "emiten", emiten))
                .collect())
        }
    }
}
