//! # Booking HTTP Handlers
//!
//! 결제 세션 발급, 결제 완료 웹훅, 관리자용 예약 CRUD 엔드포인트를
//! 처리합니다.
//!
//! ## Endpoints
//!
//! | 메서드 | 경로 | 접근 | 설명 |
//! |--------|------|------|------|
//! | `GET` | `/checkout-session/{tour_id}` | protect | Checkout Session 발급 |
//! | `POST` | `/webhook-checkout` | 프로바이더 | 결제 완료 콜백 |
//! | `GET`/`POST` | `/api/v1/bookings` | admin, lead-guide | 목록/생성 |
//! | `GET`/`PATCH`/`DELETE` | `/api/v1/bookings/{id}` | admin, lead-guide | 단건 CRUD |

use std::collections::HashMap;

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::dto::bookings::request::{CreateBookingRequest, UpdateBookingRequest};
use crate::domain::payment::stripe_model::StripeWebhookEvent;
use crate::services::bookings::booking_service::BookingService;
use crate::utils::api_features::ApiFeatures;

/// Checkout Session 발급 핸들러 (protect)
///
/// 로그인한 사용자가 지정 투어를 결제할 수 있는 세션을 생성합니다.
#[get("/{tour_id}")]
pub async fn get_checkout_session(
    tour_id: web::Path<String>,
    current_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = BookingService::instance();
    let session = service
        .create_checkout_session(&tour_id, &current_user)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "session": session }
    })))
}

/// 결제 완료 웹훅 핸들러
///
/// 프로바이더가 호출하므로 인증 미들웨어를 거치지 않습니다.
/// 본문은 원시 바이트로 받아 직접 파싱하고, 세션은 프로바이더 API에서
/// 재조회하여 검증합니다. 관심 없는 이벤트 타입도 200으로 응답합니다.
#[post("/webhook-checkout")]
pub async fn webhook_checkout(body: web::Bytes) -> Result<HttpResponse, AppError> {
    let event: StripeWebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::ValidationError(format!("Invalid webhook payload: {}", e)))?;

    let service = BookingService::instance();
    let booking = service.handle_checkout_webhook(event).await?;

    Ok(HttpResponse::Ok().json(json!({
        "received": true,
        "booking_created": booking.is_some()
    })))
}

/// 예약 목록 조회 핸들러 (admin, lead-guide)
#[get("")]
pub async fn get_all_bookings(
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let features = ApiFeatures::from_query(&query)?;

    let service = BookingService::instance();
    let bookings = service.get_all(&features).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "results": bookings.len(),
        "data": { "bookings": bookings }
    })))
}

/// 예약 생성 핸들러 (admin, lead-guide)
#[post("")]
pub async fn create_booking(
    payload: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = BookingService::instance();
    let booking = service.create(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "data": { "booking": booking }
    })))
}

/// 예약 단건 조회 핸들러 (admin, lead-guide)
#[get("/{booking_id}")]
pub async fn get_booking(booking_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let service = BookingService::instance();
    let booking = service.get_by_id(&booking_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "booking": booking }
    })))
}

/// 예약 수정 핸들러 (admin, lead-guide)
#[patch("/{booking_id}")]
pub async fn update_booking(
    booking_id: web::Path<String>,
    payload: web::Json<UpdateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = BookingService::instance();
    let booking = service.update(&booking_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "booking": booking }
    })))
}

/// 예약 삭제 핸들러 (admin, lead-guide)
#[delete("/{booking_id}")]
pub async fn delete_booking(booking_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let service = BookingService::instance();
    service.delete(&booking_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
