//! 예약 생성/수정 요청 DTO (관리자 CRUD용)
//!
//! 일반 사용자의 예약은 결제 완료 웹훅에서만 생성됩니다.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 예약 생성 요청 DTO
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    /// 투어 ID (hex ObjectId)
    #[validate(length(min = 24, max = 24, message = "Booking must belong to a tour"))]
    pub tour: String,

    /// 사용자 ID (hex ObjectId)
    #[validate(length(min = 24, max = 24, message = "Booking must belong to a user"))]
    pub user: String,

    #[validate(range(min = 0.0, message = "Booking must have a price"))]
    pub price: f64,

    #[serde(default = "default_paid")]
    pub paid: bool,
}

fn default_paid() -> bool {
    true
}

/// 예약 수정 요청 DTO
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateBookingRequest {
    #[validate(range(min = 0.0, message = "Booking must have a price"))]
    pub price: Option<f64>,

    pub paid: Option<bool>,
}
