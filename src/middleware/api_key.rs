//! API Key 认证中间件
//!
//! 通过 Header 中的 Authorization: Bearer <token> 进行认证，未配置 Key 时不做校验

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpResponse,
    body::EitherBody,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::models::ApiResponse;

/// 不需要认证的路径
const PUBLIC_PATHS: [&str; 2] = ["/", "/api/health"];

/// API Key 中间件
pub struct ApiKeyMiddleware {
    api_key: Rc<String>,
}

impl ApiKeyMiddleware {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key: Rc::new(api_key),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ApiKeyMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ApiKeyMiddlewareService {
            service: Rc::new(service),
            api_key: self.api_key.clone(),
        })
    }
}

pub struct ApiKeyMiddlewareService<S> {
    service: Rc<S>,
    api_key: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let api_key = self.api_key.clone();

        Box::pin(async move {
            if api_key.is_empty() || PUBLIC_PATHS.contains(&req.path()) {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            // 验证 Bearer Token
            let provided_key = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "));

            match provided_key {
                Some(key) if key == api_key.as_str() => {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                _ => {
                    log::warn!("拒绝未认证请求: {}", req.path());
                    let response = HttpResponse::Unauthorized()
                        .json(ApiResponse::<()>::error("无效的 Bearer Token".to_string()));
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App};

    async fn ok_handler() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_rejects_missing_token() {
        let app = test::init_service(
            App::new()
                .wrap(ApiKeyMiddleware::new("rahasia".to_string()))
                .route("/api/stock/{emiten}", web::get().to(ok_handler))
                .route("/api/health", web::get().to(ok_handler)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/stock/BBCA.JK").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/stock/BBCA.JK")
            .insert_header(("Authorization", "Bearer rahasia"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/health").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_empty_key_disables_auth() {
        let app = test::init_service(
            App::new()
                .wrap(ApiKeyMiddleware::new(String::new()))
                .route("/api/stock/{emiten}", web::get().to(ok_handler)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/stock/BBCA.JK").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}
