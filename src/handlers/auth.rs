//! Authentication HTTP Handlers
//!
//! 회원가입, 로그인/로그아웃, 비밀번호 재설정/변경 엔드포인트를 처리합니다.
//! 성공적으로 인증된 모든 경로는 동일한 방식으로 JWT를 발급합니다:
//! 응답 본문의 `token` 필드와 `jwt` HttpOnly 쿠키.
//!
//! # Endpoints
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `POST` | `/signup` | 회원가입 + 토큰 발급 |
//! | `POST` | `/login` | 로그인 + 토큰 발급 |
//! | `GET` | `/logout` | 쿠키 무효화 |
//! | `POST` | `/forgot-password` | 재설정 메일 발송 |
//! | `PATCH` | `/reset-password/{token}` | 토큰으로 비밀번호 교체 |
//! | `PATCH` | `/update-my-password` | 로그인 상태 비밀번호 변경 (protect) |

use actix_web::cookie::{time::Duration as CookieDuration, Cookie};
use actix_web::http::StatusCode;
use actix_web::{get, patch, post, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::config::CookieConfig;
use crate::core::errors::AppError;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::dto::auth::request::{
    ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest,
    UpdatePasswordRequest,
};
use crate::domain::dto::users::response::UserResponse;
use crate::domain::entities::users::user::User;
use crate::services::auth::{AuthService, TokenService};

/// JWT를 생성해서 쿠키와 응답 본문으로 함께 내보냅니다.
///
/// 로그인/회원가입/비밀번호 변경 경로가 모두 이 함수를 사용합니다.
fn send_token_response(user: User, status: StatusCode) -> Result<HttpResponse, AppError> {
    let token_service = TokenService::instance();
    let token = token_service.generate_token(&user)?;

    let cookie = Cookie::build(CookieConfig::NAME, token.clone())
        .path("/")
        .http_only(true)
        .secure(CookieConfig::secure())
        .max_age(CookieDuration::days(CookieConfig::expires_days()))
        .finish();

    let body = json!({
        "status": "success",
        "token": token,
        "data": { "user": UserResponse::from(user) }
    });

    Ok(HttpResponse::build(status).cookie(cookie).json(body))
}

/// 회원가입 핸들러
///
/// # Endpoint
/// `POST /api/v1/users/signup`
#[post("/signup")]
pub async fn signup(payload: web::Json<SignupRequest>) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let auth_service = AuthService::instance();
    let user = auth_service.signup(payload.into_inner()).await?;

    send_token_response(user, StatusCode::CREATED)
}

/// 로그인 핸들러
///
/// # Endpoint
/// `POST /api/v1/users/login`
#[post("/login")]
pub async fn login(payload: web::Json<LoginRequest>) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let auth_service = AuthService::instance();
    let user = auth_service.login(payload.into_inner()).await?;

    log::info!("로그인 성공: {}", user.email);

    send_token_response(user, StatusCode::OK)
}

/// 로그아웃 핸들러
///
/// 짧은 수명의 더미 값으로 `jwt` 쿠키를 덮어씁니다.
///
/// # Endpoint
/// `GET /api/v1/users/logout`
#[get("/logout")]
pub async fn logout() -> HttpResponse {
    let cookie = Cookie::build(CookieConfig::NAME, CookieConfig::LOGGED_OUT_VALUE)
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::seconds(10))
        .finish();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "status": "success" }))
}

/// 비밀번호 재설정 메일 요청 핸들러
///
/// # Endpoint
/// `POST /api/v1/users/forgot-password`
#[post("/forgot-password")]
pub async fn forgot_password(
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let auth_service = AuthService::instance();
    auth_service.forgot_password(&payload.email).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Token sent to email!"
    })))
}

/// 재설정 토큰으로 비밀번호 교체 핸들러
///
/// # Endpoint
/// `PATCH /api/v1/users/reset-password/{token}`
#[patch("/reset-password/{token}")]
pub async fn reset_password(
    token: web::Path<String>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let auth_service = AuthService::instance();
    let user = auth_service
        .reset_password(&token, payload.into_inner())
        .await?;

    send_token_response(user, StatusCode::OK)
}

/// 로그인 상태 비밀번호 변경 핸들러
///
/// 현재 비밀번호 재확인 후 교체하며, 새 토큰을 발급합니다.
///
/// # Endpoint
/// `PATCH /api/v1/users/update-my-password` (protect)
#[patch("/update-my-password")]
pub async fn update_my_password(
    current_user: AuthenticatedUser,
    payload: web::Json<UpdatePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let auth_service = AuthService::instance();
    let user = auth_service
        .update_password(&current_user.user_id, payload.into_inner())
        .await?;

    send_token_response(user, StatusCode::OK)
}
