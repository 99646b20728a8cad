//! 투어 응답 DTO

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::domain::entities::tours::tour::{Difficulty, GeoPoint, Tour, TourLocation};

/// 투어 응답 DTO
///
/// ObjectId 참조를 hex 문자열로 변환해서 내보냅니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub duration: u32,
    pub max_group_size: u32,
    pub difficulty: Difficulty,
    pub ratings_average: f64,
    pub ratings_quantity: u32,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_discount: Option<f64>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_cover: String,
    pub images: Vec<String>,
    pub start_dates: Vec<DateTime>,
    pub start_location: GeoPoint,
    pub locations: Vec<TourLocation>,
    /// 가이드 사용자 ID (hex)
    pub guides: Vec<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<Tour> for TourResponse {
    fn from(tour: Tour) -> Self {
        Self {
            id: tour.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: tour.name,
            slug: tour.slug,
            duration: tour.duration,
            max_group_size: tour.max_group_size,
            difficulty: tour.difficulty,
            ratings_average: tour.ratings_average,
            ratings_quantity: tour.ratings_quantity,
            price: tour.price,
            price_discount: tour.price_discount,
            summary: tour.summary,
            description: tour.description,
            image_cover: tour.image_cover,
            images: tour.images,
            start_dates: tour.start_dates,
            start_location: tour.start_location,
            locations: tour.locations,
            guides: tour.guides.into_iter().map(|id| id.to_hex()).collect(),
            created_at: tour.created_at,
            updated_at: tour.updated_at,
        }
    }
}
