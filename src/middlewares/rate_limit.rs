/*!
 * 速率限制中间件
 *
 * 固定窗口计数：每个限制键在 `window_secs` 内最多放行 `max_requests` 次，
 * 超出返回 429 并带上 `Retry-After`。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 *
 * 已认证请求按用户 ID 计数，否则按客户端 IP 计数。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 键: 前缀:标识，值: (窗口起点秒, 窗口内计数)
static RATE_LIMIT_CACHE: Lazy<Cache<String, (u64, u32)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.max(1),
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 作业提交上传：10次/分钟/用户
    pub fn submission_upload() -> Self {
        Self::new(10, 60).with_prefix("submission_upload")
    }

    /// 根据上一次的窗口状态计算本次请求后的状态
    ///
    /// 放行时返回新的 (窗口起点, 计数)，拒绝时返回需要等待的秒数。
    fn advance(&self, previous: Option<(u64, u32)>, now: u64) -> Result<(u64, u32), u64> {
        match previous {
            Some((start, count)) if now < start.saturating_add(self.window_secs) => {
                if count >= self.max_requests {
                    Err(start + self.window_secs - now)
                } else {
                    Ok((start, count + 1))
                }
            }
            _ => Ok((now, 1)),
        }
    }
}

/// 提取客户端 IP，优先使用连接信息，其次是反向代理头
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ip) = connection_ip.as_deref().filter(|ip| is_valid_ip(ip)) {
        return ip.to_string();
    }

    for header in ["X-Forwarded-For", "X-Real-IP"] {
        if let Some(value) = req.headers().get(header)
            && let Ok(value) = value.to_str()
            && let Some(ip) = value.split(',').next().map(str::trim)
            && is_valid_ip(ip)
        {
            return ip.to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let user_id = req.extensions().get::<User>().map(|user| user.id);
            let identifier = match user_id {
                Some(id) => format!("user:{id}"),
                None => format!("ip:{}", extract_client_ip(&req)),
            };
            let cache_key = if limit.key_prefix.is_empty() {
                identifier
            } else {
                format!("{}:{}", limit.key_prefix, identifier)
            };

            let now = chrono::Utc::now().timestamp().max(0) as u64;
            let previous = RATE_LIMIT_CACHE.get(&cache_key).await;

            match limit.advance(previous, now) {
                Ok(state) => {
                    RATE_LIMIT_CACHE.insert(cache_key, state).await;
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(retry_after) => {
                    warn!(
                        "Rate limit exceeded for key: {} (limit {}/{}s)",
                        cache_key, limit.max_requests, limit.window_secs
                    );
                    Ok(req.into_response(
                        create_rate_limit_response(retry_after).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        let upload = RateLimit::submission_upload();
        assert_eq!(upload.max_requests, 10);
        assert_eq!(upload.key_prefix, "submission_upload");
    }

    #[test]
    fn test_window_counts_and_rejects() {
        let limit = RateLimit::new(2, 60);
        let first = limit.advance(None, 1000).unwrap();
        assert_eq!(first, (1000, 1));
        let second = limit.advance(Some(first), 1010).unwrap();
        assert_eq!(second, (1000, 2));
        assert_eq!(limit.advance(Some(second), 1020), Err(40));
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let limit = RateLimit::new(1, 60);
        assert_eq!(limit.advance(Some((1000, 1)), 1060), Ok((1060, 1)));
    }

    #[test]
    fn test_ip_validation() {
        assert!(is_valid_ip("127.0.0.1"));
        assert!(is_valid_ip("::1"));
        assert!(!is_valid_ip("not-an-ip"));
    }
}
