//! # 투어 관리 서비스 구현
//!
//! 투어의 생성/조회/수정/삭제와 통계/지리 질의 비즈니스 로직을 담당합니다.
//!
//! ## 비즈니스 규칙
//!
//! - 슬러그는 항상 이름에서 파생되며 클라이언트가 직접 줄 수 없습니다.
//! - 할인가는 정가보다 작아야 합니다. 할인가만 수정하는 요청은
//!   저장된 정가와 비교합니다.
//! - 평점 필드는 이 서비스에서 수정하지 않습니다. 리뷰 집계가 갱신합니다.

use std::sync::Arc;
use mongodb::bson::{oid::ObjectId, to_bson, DateTime, Document};
use singleton_macro::service;

use crate::{
    domain::{
        dto::tours::request::{CreateTourRequest, LocationInput, UpdateTourRequest},
        dto::tours::response::TourResponse,
        entities::tours::tour::{GeoPoint, Tour, TourLocation, DEFAULT_RATINGS_AVERAGE},
    },
    repositories::{crud, tours::tour_repo::TourRepository},
    utils::api_features::ApiFeatures,
};
use crate::core::errors::AppError;

/// 지구 반지름 (radius 변환용)
const EARTH_RADIUS_MILES: f64 = 3963.2;
const EARTH_RADIUS_KM: f64 = 6378.1;

/// 거리 단위 변환 계수 (미터 기준)
const METERS_TO_MILES: f64 = 0.000621371;
const METERS_TO_KM: f64 = 0.001;

/// 투어 비즈니스 로직 서비스
#[service(name = "tour")]
pub struct TourService {
    /// 투어 데이터 액세스 리포지토리
    tour_repo: Arc<TourRepository>,
}

impl TourService {
    /// 쿼리 기능이 적용된 투어 목록 조회
    pub async fn get_all(&self, features: &ApiFeatures) -> Result<Vec<serde_json::Value>, AppError> {
        let docs = self.tour_repo.find_all(features).await?;
        Ok(crud::documents_to_json(docs))
    }

    /// ID로 투어 조회
    pub async fn get_by_id(&self, id: &str) -> Result<TourResponse, AppError> {
        let tour = self
            .tour_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("No tour found with that ID".to_string()))?;

        Ok(TourResponse::from(tour))
    }

    /// 엔티티 형태의 투어 조회 (결제 세션 생성 등 내부 사용)
    pub async fn find_entity(&self, id: &str) -> Result<Option<Tour>, AppError> {
        self.tour_repo.find_by_id(id).await
    }

    /// 새 투어 생성
    pub async fn create(&self, request: CreateTourRequest) -> Result<TourResponse, AppError> {
        let guides = parse_guide_ids(&request.guides)?;
        let now = DateTime::now();

        let tour = Tour {
            id: None,
            slug: Tour::derive_slug(&request.name),
            name: request.name,
            duration: request.duration,
            max_group_size: request.max_group_size,
            difficulty: request.difficulty,
            ratings_average: DEFAULT_RATINGS_AVERAGE,
            ratings_quantity: 0,
            price: request.price,
            price_discount: request.price_discount,
            summary: request.summary.trim().to_string(),
            description: request.description,
            image_cover: request.image_cover,
            images: request.images,
            start_dates: request
                .start_dates
                .into_iter()
                .map(DateTime::from_chrono)
                .collect(),
            secret_tour: request.secret_tour,
            start_location: to_geo_point(&request.start_location),
            locations: request.locations.iter().map(to_tour_location).collect(),
            guides,
            created_at: now,
            updated_at: now,
        };

        let created = self.tour_repo.create(tour).await?;
        log::info!("투어 생성: {} ({})", created.name, created.slug);

        Ok(TourResponse::from(created))
    }

    /// 투어 부분 수정
    ///
    /// 이름이 바뀌면 슬러그를 다시 파생하고, 할인가는 수정 후의 정가와
    /// 비교해서 검증합니다.
    pub async fn update(&self, id: &str, request: UpdateTourRequest) -> Result<TourResponse, AppError> {
        let existing = self
            .tour_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("No tour found with that ID".to_string()))?;

        // 할인가 검증은 수정 반영 후의 정가 기준
        let effective_price = request.price.unwrap_or(existing.price);
        if let Some(discount) = request.price_discount {
            if discount >= effective_price {
                return Err(AppError::ValidationError(
                    "Discount price should be below regular price".to_string(),
                ));
            }
        }

        let mut set_doc = Document::new();

        if let Some(name) = &request.name {
            set_doc.insert("slug", Tour::derive_slug(name));
            set_doc.insert("name", name.clone());
        }
        if let Some(duration) = request.duration {
            set_doc.insert("duration", duration as i64);
        }
        if let Some(max_group_size) = request.max_group_size {
            set_doc.insert("max_group_size", max_group_size as i64);
        }
        if let Some(difficulty) = request.difficulty {
            set_doc.insert("difficulty", bson_value(&difficulty)?);
        }
        if let Some(price) = request.price {
            set_doc.insert("price", price);
        }
        if let Some(discount) = request.price_discount {
            set_doc.insert("price_discount", discount);
        }
        if let Some(summary) = &request.summary {
            set_doc.insert("summary", summary.trim());
        }
        if let Some(description) = &request.description {
            set_doc.insert("description", description.clone());
        }
        if let Some(image_cover) = &request.image_cover {
            set_doc.insert("image_cover", image_cover.clone());
        }
        if let Some(images) = &request.images {
            set_doc.insert("images", images.clone());
        }
        if let Some(start_dates) = &request.start_dates {
            let dates: Vec<DateTime> = start_dates
                .iter()
                .map(|d| DateTime::from_chrono(*d))
                .collect();
            set_doc.insert("start_dates", bson_value(&dates)?);
        }
        if let Some(secret_tour) = request.secret_tour {
            set_doc.insert("secret_tour", secret_tour);
        }
        if let Some(start_location) = &request.start_location {
            set_doc.insert("start_location", bson_value(&to_geo_point(start_location))?);
        }
        if let Some(locations) = &request.locations {
            let converted: Vec<TourLocation> = locations.iter().map(to_tour_location).collect();
            set_doc.insert("locations", bson_value(&converted)?);
        }
        if let Some(guides) = &request.guides {
            set_doc.insert("guides", parse_guide_ids(guides)?);
        }

        if set_doc.is_empty() {
            return Ok(TourResponse::from(existing));
        }

        let updated = self
            .tour_repo
            .update(id, set_doc)
            .await?
            .ok_or_else(|| AppError::NotFound("No tour found with that ID".to_string()))?;

        Ok(TourResponse::from(updated))
    }

    /// 투어 삭제
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let deleted = self.tour_repo.delete(id).await?;

        if !deleted {
            return Err(AppError::NotFound("No tour found with that ID".to_string()));
        }

        Ok(())
    }

    /// 난이도별 투어 통계
    pub async fn tour_stats(&self) -> Result<Vec<serde_json::Value>, AppError> {
        let docs = self.tour_repo.tour_stats().await?;
        Ok(crud::documents_to_json(docs))
    }

    /// 연도별 월간 출발 일정
    pub async fn monthly_plan(&self, year: i32) -> Result<Vec<serde_json::Value>, AppError> {
        let docs = self.tour_repo.monthly_plan(year).await?;
        Ok(crud::documents_to_json(docs))
    }

    /// 중심 좌표 기준 반경 내 투어 조회
    ///
    /// * `distance` - 반경 (단위는 `unit`을 따름)
    /// * `latlng` - `"위도,경도"` 형식
    /// * `unit` - `mi`면 마일, 그 외에는 킬로미터
    pub async fn tours_within(
        &self,
        distance: f64,
        latlng: &str,
        unit: &str,
    ) -> Result<Vec<TourResponse>, AppError> {
        let (lat, lng) = parse_latlng(latlng)?;

        let earth_radius = if unit == "mi" {
            EARTH_RADIUS_MILES
        } else {
            EARTH_RADIUS_KM
        };
        let radius_radians = distance / earth_radius;

        let tours = self.tour_repo.find_within(lng, lat, radius_radians).await?;

        Ok(tours.into_iter().map(TourResponse::from).collect())
    }

    /// 지정 좌표로부터 각 투어까지의 거리 계산
    pub async fn distances(
        &self,
        latlng: &str,
        unit: &str,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        let (lat, lng) = parse_latlng(latlng)?;

        let multiplier = if unit == "mi" {
            METERS_TO_MILES
        } else {
            METERS_TO_KM
        };

        let docs = self.tour_repo.distances(lng, lat, multiplier).await?;
        Ok(crud::documents_to_json(docs))
    }
}

/// `"위도,경도"` 문자열 파싱
fn parse_latlng(latlng: &str) -> Result<(f64, f64), AppError> {
    let invalid = || {
        AppError::ValidationError(
            "Please provide latitude and longitude in the format lat,lng".to_string(),
        )
    };

    let mut parts = latlng.split(',');
    let lat: f64 = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(invalid)?;
    let lng: f64 = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(invalid)?;

    if parts.next().is_some() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng)
    {
        return Err(invalid());
    }

    Ok((lat, lng))
}

/// 가이드 ID 목록 파싱
fn parse_guide_ids(guides: &[String]) -> Result<Vec<ObjectId>, AppError> {
    guides.iter().map(|id| crud::parse_object_id(id)).collect()
}

fn to_geo_point(input: &LocationInput) -> GeoPoint {
    GeoPoint {
        point_type: "Point".to_string(),
        coordinates: input.coordinates.clone(),
        address: input.address.clone(),
        description: input.description.clone(),
    }
}

fn to_tour_location(input: &LocationInput) -> TourLocation {
    TourLocation {
        point_type: "Point".to_string(),
        coordinates: input.coordinates.clone(),
        address: input.address.clone(),
        description: input.description.clone(),
        day: input.day,
    }
}

/// serde 값을 BSON으로 변환하는 공통 경로
fn bson_value<T: serde::Serialize>(value: &T) -> Result<mongodb::bson::Bson, AppError> {
    to_bson(value).map_err(|e| AppError::InternalError(format!("BSON conversion failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latlng_valid() {
        let (lat, lng) = parse_latlng("34.111745,-118.113491").unwrap();
        assert!((lat - 34.111745).abs() < f64::EPSILON);
        assert!((lng - -118.113491).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_latlng_with_spaces() {
        let (lat, lng) = parse_latlng("34.1, -118.1").unwrap();
        assert!((lat - 34.1).abs() < f64::EPSILON);
        assert!((lng - -118.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_latlng_malformed() {
        assert!(parse_latlng("34.111745").is_err());
        assert!(parse_latlng("abc,def").is_err());
        assert!(parse_latlng("1,2,3").is_err());
        assert!(parse_latlng("").is_err());
    }

    #[test]
    fn test_parse_latlng_out_of_range() {
        assert!(parse_latlng("91.0,0.0").is_err());
        assert!(parse_latlng("0.0,181.0").is_err());
    }

    #[test]
    fn test_parse_guide_ids() {
        let id = ObjectId::new().to_hex();
        let parsed = parse_guide_ids(&[id.clone()]).unwrap();
        assert_eq!(parsed[0].to_hex(), id);

        assert!(parse_guide_ids(&["bogus".to_string()]).is_err());
    }
}
