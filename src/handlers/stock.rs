use actix_web::{web, HttpResponse, Result};
use crate::error::StockError;
use crate::models::{ApiResponse, StockQuery};
use crate::services::StockService;

/// 获取股票行情
///
/// GET /api/stock/{emiten}?period=<period>
///
/// # 参数
/// - emiten: 股票代码（如 AALI.JK）
/// - period: daily, monthly, yearly, 1y, 3y, 5y, all（默认 all）
///
/// 成功时直接返回 K 线数组，无数据时返回空数组
pub async fn get_stock_data(
    service: web::Data<StockService>,
    path: web::Path<String>,
    query: web::Query<StockQuery>,
) -> Result<HttpResponse> {
    let emiten = path.into_inner();
    let period = query.period.as_deref().unwrap_or("all");

    match service.get_stock_data(&emiten, period).await {
        Ok(candles) => Ok(HttpResponse::Ok().json(candles)),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 业务错误 → HTTP 状态码 + 错误信封
fn error_response(err: &StockError) -> HttpResponse {
    let mut builder = match err {
        StockError::InvalidEmiten => HttpResponse::BadRequest(),
        StockError::StoreUnavailable(_) => HttpResponse::ServiceUnavailable(),
        StockError::Query { .. } | StockError::Processing { .. } => {
            HttpResponse::InternalServerError()
        }
    };
    builder.json(ApiResponse::<()>::from(err))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/stock/{emiten}", web::get().to(get_stock_data));
}
