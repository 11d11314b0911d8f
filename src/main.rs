//! Emiten 行情后端服务
//!
//! 从 MongoDB 读取股票历史行情，提供按月/按年聚合与最近 1/3/5 年截取的 RESTful API

mod config;     // 配置加载
mod error;      // 业务错误
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{web, App, HttpServer, middleware::Logger};
use env_logger::Env;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::middleware::ApiKeyMiddleware;
use crate::services::stock::MongoStore;
use crate::services::StockService;

/// 应用程序入口
///
/// 启动时尝试连接数据库，失败不影响启动，请求到来时会重连
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));
    log::info!("{}", config.source);

    if !config.database.is_configured() {
        log::warn!("MongoDB 环境变量未完整配置，行情接口将返回数据库不可用");
    }
    if config.api.api_key.is_empty() {
        log::warn!("未设置 API_KEY，接口不启用认证");
    }

    let store = Arc::new(MongoStore::new(config.database.clone()));
    let service = StockService::new(store, config.market.tz());
    service.warm_up().await;

    let bind_addr = config.bind_addr();
    log::info!("启动行情服务，监听 {}", bind_addr);

    let api_key = config.api.api_key.clone();
    let data = web::Data::new(service);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(ApiKeyMiddleware::new(api_key.clone()))  // API Key 认证
            .wrap(Logger::default())  // 添加请求日志中间件
            .configure(handlers::config)  // 配置路由
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_addr)?.run().await?;
    Ok(())
}
