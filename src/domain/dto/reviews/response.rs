//! 리뷰 응답 DTO

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::domain::entities::reviews::review::Review;

/// 리뷰 응답 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: String,
    pub review: String,
    pub rating: f64,
    /// 대상 투어 ID (hex)
    pub tour: String,
    /// 작성자 ID (hex)
    pub user: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.map(|id| id.to_hex()).unwrap_or_default(),
            review: review.review,
            rating: review.rating,
            tour: review.tour.to_hex(),
            user: review.user.to_hex(),
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}
