//! # 예약 관리 서비스 구현
//!
//! 결제 세션 생성, 결제 완료 웹훅 처리, 관리자용 예약 CRUD의
//! 비즈니스 로직을 담당합니다.
//!
//! ## 웹훅 처리 원칙
//!
//! 웹훅 페이로드를 그대로 신뢰하지 않습니다. 이벤트에 담긴 세션 ID로
//! 결제 프로바이더 API에서 세션을 다시 조회한 뒤, `payment_status`가
//! `paid`인 경우에만 예약을 생성합니다. 같은 세션이 중복 전달되어도
//! 투어/사용자 조합 확인으로 예약이 한 번만 생성됩니다.

use std::sync::Arc;
use mongodb::bson::Document;
use singleton_macro::service;

use crate::{
    domain::{
        dto::bookings::request::{CreateBookingRequest, UpdateBookingRequest},
        dto::bookings::response::BookingResponse,
        entities::bookings::booking::Booking,
        models::auth::authenticated_user::AuthenticatedUser,
        payment::stripe_model::{StripeCheckoutSession, StripeWebhookEvent},
    },
    repositories::{
        bookings::booking_repo::BookingRepository,
        crud,
        tours::tour_repo::TourRepository,
        users::user_repo::UserRepository,
    },
    services::payments::payment_service::PaymentService,
    utils::api_features::ApiFeatures,
};
use crate::core::errors::AppError;

/// 예약 비즈니스 로직 서비스
#[service(name = "booking")]
pub struct BookingService {
    /// 예약 데이터 액세스 리포지토리
    booking_repo: Arc<BookingRepository>,

    /// 투어 데이터 액세스 리포지토리 (세션 생성/검증용)
    tour_repo: Arc<TourRepository>,

    /// 사용자 데이터 액세스 리포지토리 (웹훅의 이메일 역조회용)
    user_repo: Arc<UserRepository>,
}

impl BookingService {
    /// 투어 결제용 Checkout Session 생성
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 투어 또는 사용자 없음
    pub async fn create_checkout_session(
        &self,
        tour_id: &str,
        current_user: &AuthenticatedUser,
    ) -> Result<StripeCheckoutSession, AppError> {
        let tour = self
            .tour_repo
            .find_by_id(tour_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No tour found with that ID".to_string()))?;

        let user = self
            .user_repo
            .find_by_id(&current_user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No user found with that ID".to_string()))?;

        let payment_service = PaymentService::instance();
        let session = payment_service
            .create_checkout_session(&tour, &user.email)
            .await?;

        log::info!(
            "결제 세션 생성: 투어 {} / 사용자 {} / 세션 {}",
            tour.name,
            user.email,
            session.id
        );

        Ok(session)
    }

    /// 결제 완료 웹훅 처리
    ///
    /// `checkout.session.completed` 외의 이벤트는 무시하고 `None`을
    /// 반환합니다. 세션은 프로바이더 API에서 재조회하여 검증합니다.
    pub async fn handle_checkout_webhook(
        &self,
        event: StripeWebhookEvent,
    ) -> Result<Option<Booking>, AppError> {
        if event.event_type != "checkout.session.completed" {
            log::debug!("무시된 웹훅 이벤트: {}", event.event_type);
            return Ok(None);
        }

        // 페이로드의 세션을 그대로 믿지 않고 프로바이더에서 재조회
        let payment_service = PaymentService::instance();
        let session = payment_service
            .retrieve_checkout_session(&event.data.object.id)
            .await?;

        if session.payment_status.as_deref() != Some("paid") {
            log::warn!(
                "미결제 상태의 웹훅 세션 무시: {} ({:?})",
                session.id,
                session.payment_status
            );
            return Ok(None);
        }

        let tour_id_str = session.client_reference_id.as_deref().ok_or_else(|| {
            AppError::ValidationError("Checkout session has no tour reference".to_string())
        })?;
        let tour_id = crud::parse_object_id(tour_id_str)?;

        let customer_email = session.customer_email.as_deref().ok_or_else(|| {
            AppError::ValidationError("Checkout session has no customer email".to_string())
        })?;

        let user = self
            .user_repo
            .find_by_email(customer_email)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("There is no user with that email address".to_string())
            })?;
        let user_id = user.id.ok_or_else(|| {
            AppError::InternalError("User has no ID".to_string())
        })?;

        // 중복 전달된 웹훅에 대한 멱등 처리
        if self.booking_repo.exists_for(&tour_id, &user_id).await? {
            log::info!(
                "이미 예약된 투어에 대한 웹훅 무시: 투어 {} / 사용자 {}",
                tour_id_str,
                customer_email
            );
            return Ok(None);
        }

        let price = session.amount_total.unwrap_or(0) as f64 / 100.0;

        let booking = self
            .booking_repo
            .create(Booking::new(tour_id, user_id, price))
            .await?;

        log::info!(
            "예약 생성: 투어 {} / 사용자 {} / {}",
            tour_id_str,
            customer_email,
            price
        );

        Ok(Some(booking))
    }

    /// 쿼리 기능이 적용된 예약 목록 조회
    pub async fn get_all(&self, features: &ApiFeatures) -> Result<Vec<serde_json::Value>, AppError> {
        let docs = self
            .booking_repo
            .find_all(Document::new(), features)
            .await?;
        Ok(crud::documents_to_json(docs))
    }

    /// ID로 예약 조회
    pub async fn get_by_id(&self, id: &str) -> Result<BookingResponse, AppError> {
        let booking = self
            .booking_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("No booking found with that ID".to_string()))?;

        Ok(BookingResponse::from(booking))
    }

    /// 관리자용 예약 생성
    pub async fn create(&self, request: CreateBookingRequest) -> Result<BookingResponse, AppError> {
        let tour_id = crud::parse_object_id(&request.tour)?;
        let user_id = crud::parse_object_id(&request.user)?;

        let mut booking = Booking::new(tour_id, user_id, request.price);
        booking.paid = request.paid;

        let created = self.booking_repo.create(booking).await?;
        Ok(BookingResponse::from(created))
    }

    /// 관리자용 예약 수정
    pub async fn update(
        &self,
        id: &str,
        request: UpdateBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        let mut set_doc = Document::new();

        if let Some(price) = request.price {
            set_doc.insert("price", price);
        }
        if let Some(paid) = request.paid {
            set_doc.insert("paid", paid);
        }

        if set_doc.is_empty() {
            return self.get_by_id(id).await;
        }

        let updated = self
            .booking_repo
            .update(id, set_doc)
            .await?
            .ok_or_else(|| AppError::NotFound("No booking found with that ID".to_string()))?;

        Ok(BookingResponse::from(updated))
    }

    /// 관리자용 예약 삭제
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let deleted = self.booking_repo.delete(id).await?;

        if !deleted {
            return Err(AppError::NotFound("No booking found with that ID".to_string()));
        }

        Ok(())
    }
}
