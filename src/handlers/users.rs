//! # User Management HTTP Handlers
//!
//! 사용자 프로필(me) 엔드포인트와 관리자용 사용자 CRUD를 처리합니다.
//!
//! ## Endpoints
//!
//! ### 본인 (protect)
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `GET` | `/me` | 내 프로필 조회 |
//! | `PATCH` | `/update-me` | 이름/이메일/사진 수정 |
//! | `DELETE` | `/delete-me` | 소프트 삭제 (204) |
//!
//! ### 관리자 (restrict_to admin)
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `GET` | `` | 사용자 목록 (쿼리 기능 지원) |
//! | `POST` | `` | 미지원. `/signup` 안내 |
//! | `GET` | `/{id}` | 사용자 조회 |
//! | `PATCH` | `/{id}` | 사용자 수정 (비밀번호 제외) |
//! | `DELETE` | `/{id}` | 물리 삭제 (204) |

use std::collections::HashMap;

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::dto::users::request::{UpdateMeRequest, UpdateUserRequest};
use crate::services::users::user_service::UserService;
use crate::utils::api_features::ApiFeatures;

/// 내 프로필 조회 핸들러
#[get("/me")]
pub async fn get_me(current_user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    let user = service.get_by_id(&current_user.user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "user": user }
    })))
}

/// 내 프로필 수정 핸들러
///
/// 비밀번호 필드가 포함되면 400과 함께 전용 경로를 안내합니다.
#[patch("/update-me")]
pub async fn update_me(
    current_user: AuthenticatedUser,
    payload: web::Json<UpdateMeRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = UserService::instance();
    let user = service
        .update_me(&current_user.user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "user": user }
    })))
}

/// 본인 계정 소프트 삭제 핸들러
#[delete("/delete-me")]
pub async fn delete_me(current_user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    service.delete_me(&current_user.user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// 사용자 목록 조회 핸들러 (관리자)
#[get("")]
pub async fn get_all_users(
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let features = ApiFeatures::from_query(&query)?;

    let service = UserService::instance();
    let users = service.get_all(&features).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "results": users.len(),
        "data": { "users": users }
    })))
}

/// 사용자 생성은 이 경로로 지원하지 않습니다.
#[post("")]
pub async fn create_user() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({
        "status": "error",
        "message": "This route is not defined! Please use /signup instead."
    }))
}

/// 사용자 조회 핸들러 (관리자)
#[get("/{user_id}")]
pub async fn get_user(user_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    let user = service.get_by_id(&user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "user": user }
    })))
}

/// 사용자 수정 핸들러 (관리자)
///
/// 비밀번호는 이 경로로 수정할 수 없습니다.
#[patch("/{user_id}")]
pub async fn update_user(
    user_id: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = UserService::instance();
    let user = service.update_user(&user_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "user": user }
    })))
}

/// 사용자 물리 삭제 핸들러 (관리자)
#[delete("/{user_id}")]
pub async fn delete_user(user_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    service.delete_user(&user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
