//! Tour Entity Implementation
//!
//! 투어 엔티티의 핵심 구현체입니다. 가격/평점/일정 정보와 함께
//! GeoJSON 기반의 출발지/경유지 정보를 포함합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::utils::slug::slugify;

/// 투어 난이도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

/// GeoJSON Point 형태의 위치 정보
///
/// `coordinates`는 GeoJSON 규약대로 `[경도, 위도]` 순서입니다.
/// 2dsphere 인덱스 대상이므로 `type` 필드는 항상 `"Point"`여야 합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub point_type: String,
    pub coordinates: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self {
            point_type: "Point".to_string(),
            coordinates: vec![lng, lat],
            address: None,
            description: None,
        }
    }
}

/// 투어 일정 내 경유지
///
/// GeoPoint에 방문 일차(`day`)가 더해진 형태입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourLocation {
    #[serde(rename = "type")]
    pub point_type: String,
    pub coordinates: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

/// 투어 엔티티
///
/// 평점 필드(`ratings_average`, `ratings_quantity`)는 클라이언트가 직접
/// 수정할 수 없으며 리뷰 집계 과정에서만 갱신됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 투어 이름 (unique)
    pub name: String,
    /// 이름에서 파생된 URL 슬러그
    pub slug: String,
    /// 투어 기간 (일)
    pub duration: u32,
    /// 그룹 최대 인원
    pub max_group_size: u32,
    pub difficulty: Difficulty,
    /// 평균 평점 (1.0 ~ 5.0, 소수점 한 자리 반올림)
    pub ratings_average: f64,
    /// 리뷰 개수
    pub ratings_quantity: u32,
    pub price: f64,
    /// 할인가 (정가보다 작아야 함)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_discount: Option<f64>,
    /// 짧은 소개 문구
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 대표 이미지 파일명
    pub image_cover: String,
    pub images: Vec<String>,
    /// 출발 가능 일자들
    pub start_dates: Vec<DateTime>,
    /// 비공개 투어 여부 (목록/통계에서 제외)
    pub secret_tour: bool,
    pub start_location: GeoPoint,
    pub locations: Vec<TourLocation>,
    /// 가이드 사용자 참조
    pub guides: Vec<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// 리뷰가 하나도 없을 때 사용하는 평점 기본값
pub const DEFAULT_RATINGS_AVERAGE: f64 = 4.5;

impl Tour {
    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 이름에서 슬러그를 다시 파생합니다.
    pub fn derive_slug(name: &str) -> String {
        slugify(name)
    }

    /// 평균 평점을 저장 규칙(소수점 한 자리 반올림, 1.0~5.0 클램프)에
    /// 맞게 정규화합니다.
    pub fn normalize_rating(avg: f64) -> f64 {
        let rounded = (avg * 10.0).round() / 10.0;
        rounded.clamp(1.0, 5.0)
    }
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Difficult => "difficult",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_derivation() {
        assert_eq!(Tour::derive_slug("The Forest Hiker"), "the-forest-hiker");
    }

    #[test]
    fn test_rating_normalization_rounds_to_one_decimal() {
        assert_eq!(Tour::normalize_rating(4.666666), 4.7);
        assert_eq!(Tour::normalize_rating(3.9999), 4.0);
    }

    #[test]
    fn test_rating_normalization_clamps_range() {
        assert_eq!(Tour::normalize_rating(0.2), 1.0);
        assert_eq!(Tour::normalize_rating(5.4), 5.0);
    }

    #[test]
    fn test_difficulty_serialization_is_lowercase() {
        let json = serde_json::to_string(&Difficulty::Difficult).unwrap();
        assert_eq!(json, "\"difficult\"");

        let parsed: Difficulty = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(parsed, Difficulty::Easy);
    }

    #[test]
    fn test_geo_point_coordinates_order() {
        let point = GeoPoint::new(-80.185942, 25.774772);
        assert_eq!(point.point_type, "Point");
        assert_eq!(point.coordinates, vec![-80.185942, 25.774772]);
    }
}
