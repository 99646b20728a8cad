//! # Generic CRUD Operations
//!
//! 모든 엔티티 리포지토리가 공유하는 제네릭 CRUD 함수들입니다.
//! 리소스별 리포지토리는 자신의 컬렉션과 기본 필터를 이 함수들에 넘겨서
//! 동일한 조회/생성/수정/삭제 의미론을 얻습니다.
//!
//! ## 공통 규칙
//!
//! - 목록 조회는 [`ApiFeatures`]의 필터/정렬/프로젝션/페이지네이션을
//!   그대로 적용하고, 프로젝션이 자유롭도록 `Document`로 반환합니다.
//! - 잘못된 hex ObjectId는 400 (`ValidationError`)입니다.
//! - 수정은 `$set` 부분 업데이트이며 `updated_at`을 항상 갱신하고
//!   수정 후 문서를 반환합니다.
//! - 존재하지 않는 ID에 대한 수정/삭제는 `None`/`false`를 반환하고,
//!   404 변환은 서비스 계층에서 수행합니다.

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::Collection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::errors::AppError;
use crate::utils::api_features::ApiFeatures;

/// hex 문자열을 ObjectId로 파싱합니다.
///
/// # Errors
///
/// * `AppError::ValidationError` - 24자리 hex 형식이 아닌 경우
pub fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::ValidationError(format!("Invalid ID: {}", id)))
}

/// 쿼리 기능이 적용된 목록 조회
///
/// `base_filter`는 리포지토리가 강제하는 조건(비공개 투어 제외,
/// 비활성 사용자 제외, 중첩 라우트의 투어 조건 등)으로,
/// 클라이언트 필터를 항상 덮어씁니다.
pub async fn find_all(
    collection: &Collection<Document>,
    base_filter: Document,
    features: &ApiFeatures,
) -> Result<Vec<Document>, AppError> {
    let filter = features.filter_with(base_filter);

    let cursor = collection
        .find(filter)
        .with_options(features.find_options())
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    cursor
        .try_collect()
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))
}

/// ID 단건 조회
pub async fn find_by_id<T>(
    collection: &Collection<T>,
    id: &str,
    base_filter: Document,
) -> Result<Option<T>, AppError>
where
    T: DeserializeOwned + Send + Sync,
{
    let object_id = parse_object_id(id)?;

    let mut filter = doc! { "_id": object_id };
    for (k, v) in base_filter {
        filter.insert(k, v);
    }

    collection
        .find_one(filter)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))
}

/// 문서 삽입 후 할당된 ObjectId를 반환합니다.
pub async fn insert_one<T>(collection: &Collection<T>, entity: &T) -> Result<ObjectId, AppError>
where
    T: Serialize + Send + Sync,
{
    let result = collection
        .insert_one(entity)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::DatabaseError("Inserted document has no ObjectId".to_string()))
}

/// `$set` 부분 업데이트 후 수정된 문서를 반환합니다.
///
/// `updated_at`은 항상 현재 시각으로 갱신됩니다.
pub async fn update_by_id<T>(
    collection: &Collection<T>,
    id: &str,
    mut set_doc: Document,
) -> Result<Option<T>, AppError>
where
    T: DeserializeOwned + Serialize + Send + Sync,
{
    let object_id = parse_object_id(id)?;

    set_doc.insert("updated_at", DateTime::now());

    let options = mongodb::options::FindOneAndUpdateOptions::builder()
        .return_document(mongodb::options::ReturnDocument::After)
        .build();

    collection
        .find_one_and_update(doc! { "_id": object_id }, doc! { "$set": set_doc })
        .with_options(options)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))
}

/// ID 단건 삭제. 삭제된 문서가 있으면 true를 반환합니다.
pub async fn delete_by_id<T>(collection: &Collection<T>, id: &str) -> Result<bool, AppError>
where
    T: Send + Sync,
{
    let object_id = parse_object_id(id)?;

    let result = collection
        .delete_one(doc! { "_id": object_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    Ok(result.deleted_count > 0)
}

/// 조회된 문서를 응답용 JSON 값으로 변환합니다.
///
/// `_id`를 hex 문자열의 `id` 필드로 바꿔서 응답 DTO와 같은 모양을 만듭니다.
pub fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.get_object_id("_id").ok().map(|oid| oid.to_hex()) {
        doc.remove("_id");
        doc.insert("id", id);
    }

    serde_json::to_value(&doc).unwrap_or(serde_json::Value::Null)
}

/// 문서 목록을 응답용 JSON 배열로 변환합니다.
pub fn documents_to_json(docs: Vec<Document>) -> Vec<serde_json::Value> {
    docs.into_iter().map(document_to_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id_accepts_valid_hex() {
        let id = ObjectId::new();
        let parsed = parse_object_id(&id.to_hex()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_object_id_rejects_garbage() {
        assert!(matches!(
            parse_object_id("not-an-id"),
            Err(AppError::ValidationError(_))
        ));
        assert!(parse_object_id("").is_err());
    }

    #[test]
    fn test_document_to_json_renames_id() {
        let id = ObjectId::new();
        let doc = doc! { "_id": id, "name": "The Forest Hiker" };

        let json = document_to_json(doc);
        assert_eq!(json.get("id").unwrap(), &serde_json::json!(id.to_hex()));
        assert!(json.get("_id").is_none());
        assert_eq!(json.get("name").unwrap(), "The Forest Hiker");
    }

    #[test]
    fn test_document_without_id_left_intact() {
        let json = document_to_json(doc! { "name": "projection only" });
        assert!(json.get("id").is_none());
        assert_eq!(json.get("name").unwrap(), "projection only");
    }
}
