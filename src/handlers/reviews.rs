//! # Review HTTP Handlers
//!
//! 리뷰 CRUD 엔드포인트를 처리합니다. `/api/v1/reviews`와
//! `/api/v1/tours/{tour_id}/reviews` 중첩 라우트 양쪽에서 사용됩니다.
//!
//! 작성은 `user` 역할만, 수정/삭제는 작성자 본인 또는 관리자만 가능합니다.

use std::collections::HashMap;

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::dto::reviews::request::{CreateReviewRequest, UpdateReviewRequest};
use crate::services::reviews::review_service::ReviewService;
use crate::utils::api_features::ApiFeatures;

/// 전체 리뷰 목록 조회 핸들러
#[get("")]
pub async fn get_all_reviews(
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let features = ApiFeatures::from_query(&query)?;

    let service = ReviewService::instance();
    let reviews = service.get_all(None, &features).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "results": reviews.len(),
        "data": { "reviews": reviews }
    })))
}

/// 리뷰 단건 조회 핸들러
#[get("/{review_id}")]
pub async fn get_review(review_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let service = ReviewService::instance();
    let review = service.get_by_id(&review_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "review": review }
    })))
}

/// 리뷰 작성 핸들러 (user 역할)
///
/// 본문의 `tour` 필드로 대상 투어를 지정합니다.
#[post("")]
pub async fn create_review(
    current_user: AuthenticatedUser,
    payload: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = ReviewService::instance();
    let review = service
        .create(&current_user, None, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "data": { "review": review }
    })))
}

/// 리뷰 수정 핸들러 (작성자 또는 관리자)
#[patch("/{review_id}")]
pub async fn update_review(
    review_id: web::Path<String>,
    current_user: AuthenticatedUser,
    payload: web::Json<UpdateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = ReviewService::instance();
    let review = service
        .update(&review_id, &current_user, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "review": review }
    })))
}

/// 리뷰 삭제 핸들러 (작성자 또는 관리자)
#[delete("/{review_id}")]
pub async fn delete_review(
    review_id: web::Path<String>,
    current_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = ReviewService::instance();
    service.delete(&review_id, &current_user).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// 특정 투어의 리뷰 목록 조회 핸들러 (중첩 라우트)
///
/// `GET /api/v1/tours/{tour_id}/reviews`
#[get("")]
pub async fn get_tour_reviews(
    tour_id: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let features = ApiFeatures::from_query(&query)?;

    let service = ReviewService::instance();
    let reviews = service.get_all(Some(&tour_id), &features).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "results": reviews.len(),
        "data": { "reviews": reviews }
    })))
}

/// 특정 투어에 리뷰 작성 핸들러 (중첩 라우트, user 역할)
///
/// `POST /api/v1/tours/{tour_id}/reviews`
/// 경로의 투어 ID가 본문의 `tour` 필드보다 우선합니다.
#[post("")]
pub async fn create_tour_review(
    tour_id: web::Path<String>,
    current_user: AuthenticatedUser,
    payload: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = ReviewService::instance();
    let review = service
        .create(&current_user, Some(&tour_id), payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "data": { "review": review }
    })))
}
