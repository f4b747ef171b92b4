//! Security Middleware Module
//!
//! Axum middleware for the per-route gate chain: authentication, rate
//! limiting and security headers. Gates are fail-fast; the first failing
//! gate produces the classified response and later gates never run.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::api::app_state::AppState;
use crate::error::{AppError, Result};
use crate::security::rate_limit::{RateLimitClient, RateLimitResult};
use crate::security::token::Claims;

/// Extension trait for adding claims to request extensions
pub trait RequestClaimsExt {
    fn claims(&self) -> Option<&Claims>;
    fn set_claims(&mut self, claims: Claims);
}

impl RequestClaimsExt for Request<Body> {
    fn claims(&self) -> Option<&Claims> {
        self.extensions().get::<Claims>()
    }

    fn set_claims(&mut self, claims: Claims) {
        self.extensions_mut().insert(claims);
    }
}

/// Authentication gate.
///
/// Verifies the bearer token and stores the decoded claims in the request
/// extensions for downstream gates and handlers. Any failure is the opaque
/// 401 from [`AppError::AuthRejected`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let token = extract_bearer(&req).ok_or(AppError::AuthRejected)?;
    let claims = state.verifier.verify(&token)?;

    req.set_claims(claims);
    Ok(next.run(req).await)
}

/// Extract the bearer token from the Authorization header.
///
/// Accepts both `Bearer <token>` and a bare token value.
fn extract_bearer(req: &Request<Body>) -> Option<String> {
    let auth = req.headers().get(header::AUTHORIZATION)?;
    let auth = auth.to_str().ok()?;

    let token = auth.strip_prefix("Bearer ").unwrap_or(auth).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Login rate limiting gate.
///
/// Limited clients get the distinct 429 response with `Retry-After`;
/// allowed requests pass through with `X-RateLimit-Remaining` attached.
pub async fn login_rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response> {
    let client = extract_client_id(&req);

    match state.login_limiter.check(&client).await {
        RateLimitResult::Limited { retry_after } => {
            tracing::warn!(client = %client.as_str(), "login rate limit exceeded");
            Err(AppError::RateLimited { retry_after })
        }
        RateLimitResult::Allowed { remaining } => {
            let mut response = next.run(req).await;
            if let Ok(value) = remaining.to_string().parse() {
                response.headers_mut().insert("X-RateLimit-Remaining", value);
            }
            Ok(response)
        }
    }
}

/// Extract a client identifier for rate limiting.
///
/// Preference order: token subject, forwarded IP headers, peer address.
pub fn extract_client_id(req: &Request<Body>) -> RateLimitClient {
    if let Some(claims) = req.claims() {
        return RateLimitClient::from_subject(&claims.sub);
    }

    if let Some(ip) = req.headers().get("X-Forwarded-For") {
        if let Ok(ip_str) = ip.to_str() {
            return RateLimitClient::from_ip(ip_str.split(',').next().unwrap_or(ip_str).trim());
        }
    }

    if let Some(ip) = req.headers().get("X-Real-IP") {
        if let Ok(ip_str) = ip.to_str() {
            return RateLimitClient::from_ip(ip_str);
        }
    }

    if let Some(peer) = req.extensions().get::<std::net::SocketAddr>() {
        return RateLimitClient::from_ip(&peer.ip().to_string());
    }

    RateLimitClient::Custom(format!("unknown-{}", uuid::Uuid::new_v4()))
}

/// Security headers middleware
pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    response
        .headers_mut()
        .insert("X-Content-Type-Options", "nosniff".parse().unwrap());

    response
        .headers_mut()
        .insert("X-Frame-Options", "DENY".parse().unwrap());

    response.headers_mut().insert(
        "Strict-Transport-Security",
        "max-age=31536000; includeSubDomains".parse().unwrap(),
    );

    response.headers_mut().insert(
        "Content-Security-Policy",
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'"
            .parse()
            .unwrap(),
    );

    response.headers_mut().insert(
        "Referrer-Policy",
        "strict-origin-when-cross-origin".parse().unwrap(),
    );

    response
}
