use actix_web::{web, HttpResponse, Result};
use serde::Serialize;
use crate::models::ApiResponse;
use crate::services::StockService;

/// 健康检查结果
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// 服务状态
    pub status: &'static str,
    /// 是否已连接数据库
    pub database_connected: bool,
}

pub async fn health_check(service: web::Data<StockService>) -> Result<HttpResponse> {
    let response = ApiResponse::success(HealthStatus {
        status: "Service is healthy",
        database_connected: service.is_store_connected().await,
    });
    Ok(HttpResponse::Ok().json(response))
}

/// 首页说明
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Stock Data API is running!, how to use: append /api/stock/<emiten>?period=<period> to the URL")
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stock::store::testing::MemoryStore;
    use actix_web::{test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_health_reports_connection() {
        let service = StockService::new(Arc::new(MemoryStore::unreachable()), chrono_tz::Asia::Jakarta);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["database_connected"], false);
    }

    #[actix_web::test]
    async fn test_index_banner() {
        let app = test::init_service(App::new().route("/", web::get().to(index))).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert!(std::str::from_utf8(&body).unwrap().contains("/api/stock/<emiten>"));
    }
}
