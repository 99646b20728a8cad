//! # 결제 서비스 구현
//!
//! Stripe Checkout API와의 연동을 담당합니다. 백엔드가 하는 일은
//! Checkout Session 생성과 세션 재조회 두 가지의 파라미터 마샬링뿐이며,
//! 결제 처리 자체는 전적으로 프로바이더에 위임합니다.

use singleton_macro::service;

use crate::{
    config::{FrontendConfig, StripeConfig},
    domain::entities::tours::tour::Tour,
    domain::payment::stripe_model::{StripeCheckoutSession, StripeErrorResponse},
};
use crate::core::errors::AppError;

/// 결제 프로바이더 연동 서비스
#[service(name = "payment")]
pub struct PaymentService {
    // 외부 의존성 없음 (HTTP 클라이언트는 호출 시점에 생성)
}

impl PaymentService {
    /// 투어 결제용 Checkout Session 생성
    ///
    /// 금액은 최소 화폐 단위(센트)로 변환되며, 투어 ID를
    /// `client_reference_id`로 실어 보내 웹훅에서 예약 생성에 사용합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 투어에 ID가 없음
    /// * `AppError::ExternalServiceError` - 프로바이더 API 오류
    pub async fn create_checkout_session(
        &self,
        tour: &Tour,
        customer_email: &str,
    ) -> Result<StripeCheckoutSession, AppError> {
        let tour_id = tour.id_string().ok_or_else(|| {
            AppError::InternalError("Tour has no ID".to_string())
        })?;

        let frontend = FrontendConfig::base_url();
        let amount_cents = (tour.price * 100.0).round() as i64;

        let params: Vec<(&str, String)> = vec![
            ("mode", "payment".to_string()),
            ("success_url", format!("{}/my-tours?alert=booking", frontend)),
            ("cancel_url", format!("{}/tour/{}", frontend, tour.slug)),
            ("customer_email", customer_email.to_string()),
            ("client_reference_id", tour_id),
            ("line_items[0][quantity]", "1".to_string()),
            (
                "line_items[0][price_data][currency]",
                StripeConfig::currency(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                amount_cents.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                format!("{} Tour", tour.name),
            ),
            (
                "line_items[0][price_data][product_data][description]",
                tour.summary.clone(),
            ),
            (
                "line_items[0][price_data][product_data][images][0]",
                format!("{}/img/tours/{}", frontend, tour.image_cover),
            ),
        ];

        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/checkout/sessions", StripeConfig::api_base()))
            .bearer_auth(StripeConfig::secret_key())
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Payment provider unreachable: {}", e))
            })?;

        Self::parse_session_response(response).await
    }

    /// Checkout Session 재조회
    ///
    /// 웹훅으로 받은 세션을 그대로 신뢰하지 않고, 세션 ID로 프로바이더
    /// API에서 다시 조회하여 결제 상태를 확인합니다.
    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<StripeCheckoutSession, AppError> {
        let client = reqwest::Client::new();
        let response = client
            .get(format!(
                "{}/checkout/sessions/{}",
                StripeConfig::api_base(),
                session_id
            ))
            .bearer_auth(StripeConfig::secret_key())
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Payment provider unreachable: {}", e))
            })?;

        Self::parse_session_response(response).await
    }

    /// 프로바이더 응답 공통 처리
    async fn parse_session_response(
        response: reqwest::Response,
    ) -> Result<StripeCheckoutSession, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<StripeErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_default();
            log::error!("Stripe API 오류 ({}): {}", status, message);
            return Err(AppError::ExternalServiceError(format!(
                "Payment provider returned {}: {}",
                status, message
            )));
        }

        response.json::<StripeCheckoutSession>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Invalid payment provider response: {}", e))
        })
    }
}
