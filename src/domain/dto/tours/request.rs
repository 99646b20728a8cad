//! 투어 생성/수정 요청 DTO
//!
//! JSON 역직렬화와 입력 검증을 자동으로 수행합니다.
//! 평점 필드는 요청에서 받지 않습니다. 리뷰 집계로만 갱신됩니다.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::tours::tour::Difficulty;

/// 위치 입력 (GeoJSON Point 좌표 + 부가 정보)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocationInput {
    /// [경도, 위도]
    #[validate(length(min = 2, max = 2, message = "coordinates must be [lng, lat]"))]
    pub coordinates: Vec<f64>,
    pub address: Option<String>,
    pub description: Option<String>,
    /// 일정 내 방문 일차 (경유지에만 사용)
    pub day: Option<u32>,
}

/// 새 투어 생성을 위한 요청 DTO
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_discount_below_price"))]
pub struct CreateTourRequest {
    /// 투어 이름 (10-40자)
    #[validate(length(
        min = 10,
        max = 40,
        message = "A tour name must have between 10 and 40 characters"
    ))]
    pub name: String,

    /// 투어 기간 (일)
    #[validate(range(min = 1, message = "A tour must have a duration"))]
    pub duration: u32,

    /// 그룹 최대 인원
    #[validate(range(min = 1, message = "A tour must have a group size"))]
    pub max_group_size: u32,

    pub difficulty: Difficulty,

    #[validate(range(min = 0.0, message = "A tour must have a price"))]
    pub price: f64,

    /// 할인가 (정가보다 작아야 함)
    pub price_discount: Option<f64>,

    #[validate(length(min = 1, message = "A tour must have a summary"))]
    pub summary: String,

    pub description: Option<String>,

    #[validate(length(min = 1, message = "A tour must have a cover image"))]
    pub image_cover: String,

    #[serde(default)]
    pub images: Vec<String>,

    /// 출발 가능 일자 (RFC 3339)
    #[serde(default)]
    pub start_dates: Vec<chrono::DateTime<chrono::Utc>>,

    #[serde(default)]
    pub secret_tour: bool,

    #[validate(nested)]
    pub start_location: LocationInput,

    #[serde(default)]
    #[validate(nested)]
    pub locations: Vec<LocationInput>,

    /// 가이드 사용자 ID 목록 (hex ObjectId)
    #[serde(default)]
    pub guides: Vec<String>,
}

/// 투어 부분 수정을 위한 요청 DTO
///
/// 모든 필드가 선택 사항이며, 전달된 필드만 `$set`으로 반영됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_discount"))]
pub struct UpdateTourRequest {
    #[validate(length(
        min = 10,
        max = 40,
        message = "A tour name must have between 10 and 40 characters"
    ))]
    pub name: Option<String>,

    #[validate(range(min = 1, message = "A tour must have a duration"))]
    pub duration: Option<u32>,

    #[validate(range(min = 1, message = "A tour must have a group size"))]
    pub max_group_size: Option<u32>,

    pub difficulty: Option<Difficulty>,

    #[validate(range(min = 0.0, message = "A tour must have a price"))]
    pub price: Option<f64>,

    pub price_discount: Option<f64>,

    #[validate(length(min = 1, message = "A tour must have a summary"))]
    pub summary: Option<String>,

    pub description: Option<String>,

    #[validate(length(min = 1, message = "A tour must have a cover image"))]
    pub image_cover: Option<String>,

    pub images: Option<Vec<String>>,

    pub start_dates: Option<Vec<chrono::DateTime<chrono::Utc>>>,

    pub secret_tour: Option<bool>,

    #[validate(nested)]
    pub start_location: Option<LocationInput>,

    pub locations: Option<Vec<LocationInput>>,

    pub guides: Option<Vec<String>>,
}

/// 할인가는 정가보다 작아야 합니다.
fn validate_discount_below_price(req: &CreateTourRequest) -> Result<(), ValidationError> {
    if let Some(discount) = req.price_discount {
        if discount >= req.price {
            return Err(ValidationError::new("discount_above_price")
                .with_message("Discount price should be below regular price".into()));
        }
    }
    Ok(())
}

/// 수정 요청에 가격과 할인가가 함께 오면 즉시 비교합니다.
/// 할인가만 오는 경우는 저장된 정가와 서비스 계층에서 비교합니다.
fn validate_update_discount(req: &UpdateTourRequest) -> Result<(), ValidationError> {
    if let (Some(price), Some(discount)) = (req.price, req.price_discount) {
        if discount >= price {
            return Err(ValidationError::new("discount_above_price")
                .with_message("Discount price should be below regular price".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateTourRequest {
        CreateTourRequest {
            name: "The Forest Hiker".to_string(),
            duration: 5,
            max_group_size: 25,
            difficulty: Difficulty::Easy,
            price: 397.0,
            price_discount: None,
            summary: "Breathtaking hike through the Canadian Banff National Park".to_string(),
            description: None,
            image_cover: "tour-1-cover.jpg".to_string(),
            images: vec![],
            start_dates: vec![],
            secret_tour: false,
            start_location: LocationInput {
                coordinates: vec![-115.570154, 51.178456],
                address: None,
                description: None,
                day: None,
            },
            locations: vec![],
            guides: vec![],
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_short_name_rejected() {
        let mut req = valid_request();
        req.name = "Too short".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_discount_must_be_below_price() {
        let mut req = valid_request();
        req.price_discount = Some(500.0);
        assert!(req.validate().is_err());

        req.price_discount = Some(100.0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_coordinates_must_be_a_pair() {
        let mut req = valid_request();
        req.start_location.coordinates = vec![1.0];
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_discount_checked_when_both_present() {
        let update = UpdateTourRequest {
            name: None,
            duration: None,
            max_group_size: None,
            difficulty: None,
            price: Some(300.0),
            price_discount: Some(350.0),
            summary: None,
            description: None,
            image_cover: None,
            images: None,
            start_dates: None,
            secret_tour: None,
            start_location: None,
            locations: None,
            guides: None,
        };
        assert!(update.validate().is_err());
    }
}
