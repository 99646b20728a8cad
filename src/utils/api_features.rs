//! # API Query Features
//!
//! URL 쿼리 스트링을 MongoDB 쿼리(필터/정렬/프로젝션/페이지네이션)로 변환하는
//! 빌더입니다. 모든 목록 조회 엔드포인트가 이 변환을 공유합니다.
//!
//! ## 지원 문법
//!
//! ```text
//! GET /api/v1/tours?difficulty=easy&price[lt]=1500     → 필터 (비교 연산자)
//! GET /api/v1/tours?sort=price,-ratings_average        → 정렬 (- 접두사는 내림차순)
//! GET /api/v1/tours?fields=name,price,duration         → 필드 제한 (프로젝션)
//! GET /api/v1/tours?page=2&limit=10                    → 페이지네이션
//! ```
//!
//! ## 인젝션 방어
//!
//! 쿼리 키는 그대로 MongoDB 필터 문서의 키가 되므로, `$`나 `.`이 포함된
//! 키/연산자는 전부 거부합니다. 비교 연산자는 화이트리스트(`gte`, `gt`,
//! `lte`, `lt`, `ne`)에 있는 것만 `$` 접두사 연산자로 변환됩니다.

use std::collections::HashMap;

use mongodb::bson::{doc, Bson, Document};
use mongodb::options::FindOptions;

use crate::core::errors::AppError;

/// 페이지네이션 기본값
const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

/// 허용된 비교 연산자 화이트리스트 (쿼리 표기 → MongoDB 연산자)
const OPERATORS: [(&str, &str); 5] = [
    ("gte", "$gte"),
    ("gt", "$gt"),
    ("lte", "$lte"),
    ("lt", "$lt"),
    ("ne", "$ne"),
];

/// 쿼리 스트링에서 파생된 MongoDB 쿼리 구성 요소
///
/// `from_query`로 생성한 뒤 `filter()`와 `find_options()`를
/// `Collection::find`에 넘기면 됩니다.
#[derive(Debug, Clone)]
pub struct ApiFeatures {
    filter: Document,
    sort: Document,
    projection: Option<Document>,
    page: u64,
    limit: i64,
}

impl ApiFeatures {
    /// 쿼리 파라미터 맵에서 ApiFeatures를 구성합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 허용되지 않은 키/연산자, 잘못된
    ///   page/limit 값
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let mut features = Self {
            filter: Document::new(),
            sort: doc! { "created_at": -1 },
            projection: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        };

        for (key, value) in params {
            match key.as_str() {
                "page" => features.page = parse_page(value)?,
                "limit" => features.limit = parse_limit(value)?,
                "sort" => features.sort = parse_sort(value)?,
                "fields" => features.projection = parse_fields(value)?,
                _ => {
                    let (field, bson_value) = parse_filter_pair(key, value)?;
                    merge_filter(&mut features.filter, field, bson_value);
                }
            }
        }

        Ok(features)
    }

    /// 추가 조건과 함께 필터 문서를 반환합니다.
    ///
    /// 리포지토리가 기본 조건(secret_tour 제외, 특정 투어의 리뷰 등)을
    /// 얹을 때 사용합니다.
    pub fn filter_with(&self, base: Document) -> Document {
        let mut merged = self.filter.clone();
        for (k, v) in base {
            merged.insert(k, v);
        }
        merged
    }

    /// 필터 문서를 반환합니다.
    pub fn filter(&self) -> Document {
        self.filter.clone()
    }

    /// 정렬/프로젝션/페이지네이션이 반영된 FindOptions를 반환합니다.
    pub fn find_options(&self) -> FindOptions {
        let skip = (self.page - 1) * self.limit as u64;

        FindOptions::builder()
            .sort(self.sort.clone())
            .projection(self.projection.clone())
            .skip(skip)
            .limit(self.limit)
            .build()
    }

    /// 현재 페이지 번호
    pub fn page(&self) -> u64 {
        self.page
    }

    /// 페이지당 문서 수
    pub fn limit(&self) -> i64 {
        self.limit
    }
}

/// `price[gte]` 형태의 키를 (필드, 연산자) 쌍으로 분해하고 값과 함께
/// BSON 필터 조각으로 변환합니다.
fn parse_filter_pair(key: &str, value: &str) -> Result<(String, Bson), AppError> {
    // "price[gte]" → field = "price", op = "gte"
    if let Some(open) = key.find('[') {
        if !key.ends_with(']') {
            return Err(invalid_param(key));
        }

        let field = &key[..open];
        let op = &key[open + 1..key.len() - 1];
        ensure_safe_key(field)?;

        let mongo_op = OPERATORS
            .iter()
            .find(|(name, _)| *name == op)
            .map(|(_, mongo)| *mongo)
            .ok_or_else(|| {
                AppError::ValidationError(format!("Unsupported filter operator: {}", op))
            })?;

        let inner = doc! { mongo_op: coerce_value(value) };
        return Ok((field.to_string(), Bson::Document(inner)));
    }

    ensure_safe_key(key)?;
    Ok((key.to_string(), coerce_value(value)))
}

/// 동일 필드에 여러 연산자 조건이 오면 하나의 문서로 병합합니다.
/// (`duration[gte]=5&duration[lte]=9` → `{duration: {$gte: 5, $lte: 9}}`)
fn merge_filter(filter: &mut Document, field: String, value: Bson) {
    if let Bson::Document(ref incoming) = value {
        if let Some(Bson::Document(existing)) = filter.get_mut(&field) {
            for (k, v) in incoming {
                existing.insert(k, v.clone());
            }
            return;
        }
    }

    filter.insert(field, value);
}

/// 쿼리 값의 타입 추론 (정수 → 실수 → 불리언 → 문자열 순서)
fn coerce_value(value: &str) -> Bson {
    if let Ok(i) = value.parse::<i64>() {
        return Bson::Int64(i);
    }
    if let Ok(f) = value.parse::<f64>() {
        return Bson::Double(f);
    }
    match value {
        "true" => Bson::Boolean(true),
        "false" => Bson::Boolean(false),
        _ => Bson::String(value.to_string()),
    }
}

/// `sort=price,-ratings_average` → `{price: 1, ratings_average: -1}`
fn parse_sort(value: &str) -> Result<Document, AppError> {
    let mut sort = Document::new();

    for part in value.split(',').filter(|p| !p.is_empty()) {
        let (field, direction) = match part.strip_prefix('-') {
            Some(stripped) => (stripped, -1),
            None => (part, 1),
        };
        ensure_safe_key(field)?;
        sort.insert(field, direction);
    }

    if sort.is_empty() {
        return Ok(doc! { "created_at": -1 });
    }

    Ok(sort)
}

/// `fields=name,price` → 포함 프로젝션, `fields=-description` → 제외 프로젝션
///
/// MongoDB는 포함/제외 혼용을 허용하지 않으므로 혼용 시 400을 반환합니다.
fn parse_fields(value: &str) -> Result<Option<Document>, AppError> {
    let mut projection = Document::new();
    let mut has_include = false;
    let mut has_exclude = false;

    for part in value.split(',').filter(|p| !p.is_empty()) {
        let (field, flag) = match part.strip_prefix('-') {
            Some(stripped) => {
                has_exclude = true;
                (stripped, 0)
            }
            None => {
                has_include = true;
                (part, 1)
            }
        };
        ensure_safe_key(field)?;
        projection.insert(field, flag);
    }

    if has_include && has_exclude {
        return Err(AppError::ValidationError(
            "Cannot mix inclusion and exclusion in fields".to_string(),
        ));
    }

    if projection.is_empty() {
        return Ok(None);
    }

    Ok(Some(projection))
}

fn parse_page(value: &str) -> Result<u64, AppError> {
    let page: u64 = value
        .parse()
        .map_err(|_| AppError::ValidationError("page must be a positive integer".to_string()))?;

    if page == 0 {
        return Err(AppError::ValidationError(
            "page must be a positive integer".to_string(),
        ));
    }

    Ok(page)
}

fn parse_limit(value: &str) -> Result<i64, AppError> {
    let limit: i64 = value
        .parse()
        .map_err(|_| AppError::ValidationError("limit must be a positive integer".to_string()))?;

    if limit <= 0 {
        return Err(AppError::ValidationError(
            "limit must be a positive integer".to_string(),
        ));
    }

    Ok(limit.min(MAX_LIMIT))
}

/// 필터/정렬/프로젝션 키로 쓰일 수 없는 문자를 거부합니다.
fn ensure_safe_key(key: &str) -> Result<(), AppError> {
    if key.is_empty() || key.contains('$') || key.contains('.') {
        return Err(invalid_param(key));
    }
    Ok(())
}

fn invalid_param(key: &str) -> AppError {
    AppError::ValidationError(format!("Invalid query parameter: {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_equality_filter_with_type_coercion() {
        let features =
            ApiFeatures::from_query(&query(&[("difficulty", "easy"), ("duration", "5")])).unwrap();

        let filter = features.filter();
        assert_eq!(filter.get_str("difficulty").unwrap(), "easy");
        assert_eq!(filter.get_i64("duration").unwrap(), 5);
    }

    #[test]
    fn test_comparison_operator_translation() {
        let features = ApiFeatures::from_query(&query(&[("price[lt]", "1500")])).unwrap();

        let filter = features.filter();
        let price = filter.get_document("price").unwrap();
        assert_eq!(price.get_i64("$lt").unwrap(), 1500);
    }

    #[test]
    fn test_multiple_operators_on_same_field_merge() {
        let features =
            ApiFeatures::from_query(&query(&[("duration[gte]", "5"), ("duration[lte]", "9")]))
                .unwrap();

        let duration = features.filter().get_document("duration").unwrap().clone();
        assert_eq!(duration.get_i64("$gte").unwrap(), 5);
        assert_eq!(duration.get_i64("$lte").unwrap(), 9);
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let result = ApiFeatures::from_query(&query(&[("price[where]", "1")]));
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_dollar_and_dot_keys_rejected() {
        assert!(ApiFeatures::from_query(&query(&[("$where", "1")])).is_err());
        assert!(ApiFeatures::from_query(&query(&[("a.b", "1")])).is_err());
        assert!(ApiFeatures::from_query(&query(&[("sort", "$natural")])).is_err());
    }

    #[test]
    fn test_boolean_coercion() {
        let features = ApiFeatures::from_query(&query(&[("paid", "true")])).unwrap();
        assert_eq!(features.filter().get_bool("paid").unwrap(), true);
    }

    #[test]
    fn test_sort_parsing() {
        let features =
            ApiFeatures::from_query(&query(&[("sort", "price,-ratings_average")])).unwrap();

        let options = features.find_options();
        let sort = options.sort.unwrap();
        assert_eq!(sort.get_i32("price").unwrap(), 1);
        assert_eq!(sort.get_i32("ratings_average").unwrap(), -1);
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let features = ApiFeatures::from_query(&query(&[])).unwrap();
        let sort = features.find_options().sort.unwrap();
        assert_eq!(sort.get_i32("created_at").unwrap(), -1);
    }

    #[test]
    fn test_field_limiting_inclusion() {
        let features = ApiFeatures::from_query(&query(&[("fields", "name,price")])).unwrap();
        let projection = features.find_options().projection.unwrap();
        assert_eq!(projection.get_i32("name").unwrap(), 1);
        assert_eq!(projection.get_i32("price").unwrap(), 1);
    }

    #[test]
    fn test_field_limiting_exclusion() {
        let features = ApiFeatures::from_query(&query(&[("fields", "-description")])).unwrap();
        let projection = features.find_options().projection.unwrap();
        assert_eq!(projection.get_i32("description").unwrap(), 0);
    }

    #[test]
    fn test_mixed_projection_rejected() {
        let result = ApiFeatures::from_query(&query(&[("fields", "name,-description")]));
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_pagination_defaults_and_skip() {
        let features = ApiFeatures::from_query(&query(&[])).unwrap();
        let options = features.find_options();
        assert_eq!(options.skip, Some(0));
        assert_eq!(options.limit, Some(DEFAULT_LIMIT));

        let features = ApiFeatures::from_query(&query(&[("page", "3"), ("limit", "10")])).unwrap();
        let options = features.find_options();
        assert_eq!(options.skip, Some(20));
        assert_eq!(options.limit, Some(10));
    }

    #[test]
    fn test_pagination_bounds() {
        assert!(ApiFeatures::from_query(&query(&[("page", "0")])).is_err());
        assert!(ApiFeatures::from_query(&query(&[("page", "abc")])).is_err());
        assert!(ApiFeatures::from_query(&query(&[("limit", "-5")])).is_err());

        let features = ApiFeatures::from_query(&query(&[("limit", "99999")])).unwrap();
        assert_eq!(features.limit(), MAX_LIMIT);
    }

    #[test]
    fn test_reserved_params_do_not_reach_filter() {
        let features = ApiFeatures::from_query(&query(&[
            ("page", "2"),
            ("limit", "10"),
            ("sort", "price"),
            ("fields", "name"),
            ("difficulty", "easy"),
        ]))
        .unwrap();

        let filter = features.filter();
        assert_eq!(filter.len(), 1);
        assert!(filter.contains_key("difficulty"));
    }

    #[test]
    fn test_filter_with_base_conditions() {
        let features = ApiFeatures::from_query(&query(&[("rating[gte]", "4")])).unwrap();
        let merged = features.filter_with(doc! { "secret_tour": { "$ne": true } });

        assert!(merged.contains_key("rating"));
        assert!(merged.contains_key("secret_tour"));
    }
}
