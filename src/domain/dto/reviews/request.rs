//! 리뷰 생성/수정 요청 DTO

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 리뷰 작성 요청 DTO
///
/// `tour`는 중첩 라우트(`/tours/{tour_id}/reviews`)로 들어온 경우
/// 경로 파라미터가 우선하며, 작성자는 항상 인증 토큰에서 가져옵니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, message = "Review can not be empty"))]
    pub review: String,

    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1.0 and 5.0"))]
    pub rating: f64,

    /// 대상 투어 ID (hex ObjectId, 중첩 라우트에서는 생략)
    pub tour: Option<String>,
}

/// 리뷰 수정 요청 DTO
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(length(min = 1, message = "Review can not be empty"))]
    pub review: Option<String>,

    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1.0 and 5.0"))]
    pub rating: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let mut req = CreateReviewRequest {
            review: "Amazing experience".to_string(),
            rating: 4.5,
            tour: None,
        };
        assert!(req.validate().is_ok());

        req.rating = 5.5;
        assert!(req.validate().is_err());

        req.rating = 0.5;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_review_rejected() {
        let req = CreateReviewRequest {
            review: "".to_string(),
            rating: 4.0,
            tour: None,
        };
        assert!(req.validate().is_err());
    }
}
