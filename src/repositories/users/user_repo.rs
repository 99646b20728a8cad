//! # 사용자 리포지토리 구현
//!
//! 사용자 엔티티의 데이터 액세스 계층입니다. MongoDB를 주 저장소로 사용하고,
//! Redis를 통한 캐싱을 지원합니다.
//!
//! ## 캐싱 전략
//!
//! - 개별 사용자: `user:{user_id}` (TTL 10분)
//! - 이메일 조회: `user:email:{email}` (TTL 10분)
//! - 쓰기 연산 시 두 키를 모두 무효화합니다.
//!
//! ## 소프트 삭제
//!
//! 탈퇴한 사용자는 `active: false`로 표시만 하며, 일반 조회 경로에서는
//! 항상 제외됩니다. 관리자 경로의 물리 삭제만 문서를 실제로 제거합니다.

use std::sync::Arc;
use mongodb::{bson::{doc, DateTime, Document}, options::IndexOptions, IndexModel};
use singleton_macro::repository;

use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::users::user::User,
    repositories::crud,
    utils::api_features::ApiFeatures,
};
use crate::core::errors::AppError;

/// 사용자 데이터 액세스 리포지토리
#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    /// MongoDB 데이터베이스 연결
    db: Arc<Database>,

    /// Redis 캐시 클라이언트
    redis: Arc<RedisClient>,
}

/// 소프트 삭제된 사용자를 제외하는 기본 필터
fn active_filter() -> Document {
    doc! { "active": { "$ne": false } }
}

impl UserRepository {
    /// 이메일 주소로 사용자 조회 (캐시 우선)
    ///
    /// 이메일은 저장 시 소문자로 정규화되므로 조회 전에 소문자로 맞춥니다.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_lowercase();
        let cache_key = format!("user:email:{}", email);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let mut filter = active_filter();
        filter.insert("email", email.clone());

        let user = self
            .collection::<User>()
            .find_one(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref user) = user {
            let _ = self.redis.set_with_expiry(&cache_key, user, 600).await;
        }

        Ok(user)
    }

    /// ID로 사용자 조회 (캐시 우선)
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = crud::find_by_id(&self.collection::<User>(), id, active_filter()).await?;

        if let Some(ref user) = user {
            let _ = self.redis.set_with_expiry(&cache_key, user, 600).await;
        }

        Ok(user)
    }

    /// 재설정 토큰 다이제스트로 사용자 조회
    ///
    /// 만료 여부는 서비스 계층에서 `reset_token_valid`로 확인합니다.
    pub async fn find_by_reset_token(&self, token_digest: &str) -> Result<Option<User>, AppError> {
        let mut filter = active_filter();
        filter.insert("password_reset_token", token_digest);

        self.collection::<User>()
            .find_one(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 쿼리 기능이 적용된 사용자 목록 조회 (관리자용)
    ///
    /// 민감 필드는 항상 제외합니다.
    pub async fn find_all(&self, features: &ApiFeatures) -> Result<Vec<Document>, AppError> {
        let docs =
            crud::find_all(&self.collection::<Document>(), active_filter(), features).await?;

        // 프로젝션과 무관하게 민감 필드는 응답에서 제거
        let docs = docs
            .into_iter()
            .map(|mut doc| {
                doc.remove("password_hash");
                doc.remove("password_reset_token");
                doc.remove("password_reset_expires");
                doc
            })
            .collect();

        Ok(docs)
    }

    /// 새 사용자 생성
    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError(
                "This email is already in use".to_string(),
            ));
        }

        let inserted_id = crud::insert_one(&self.collection::<User>(), &user).await?;
        user.id = Some(inserted_id);

        let _ = self.invalidate_collection_cache(None).await;

        Ok(user)
    }

    /// 사용자 부분 업데이트
    ///
    /// 이메일 변경에 대비해 수정 전 문서의 이메일 캐시까지 무효화합니다.
    pub async fn update(&self, id: &str, set_doc: Document) -> Result<Option<User>, AppError> {
        let previous = crud::find_by_id(&self.collection::<User>(), id, Document::new()).await?;

        let updated = crud::update_by_id(&self.collection::<User>(), id, set_doc).await?;

        if let Some(ref user) = updated {
            self.invalidate_user_caches(id, Some(&user.email)).await;
        }
        if let Some(previous) = previous {
            let _ = self
                .redis
                .del(&format!("user:email:{}", previous.email))
                .await;
        }

        Ok(updated)
    }

    /// 비밀번호 변경
    ///
    /// 해시 갱신과 함께 변경 시각을 기록하고 재설정 토큰을 제거합니다.
    /// 변경 시각은 기존 토큰들의 무효화 기준이 됩니다.
    pub async fn update_password(&self, id: &str, password_hash: &str) -> Result<Option<User>, AppError> {
        let object_id = crud::parse_object_id(id)?;

        let options = mongodb::options::FindOneAndUpdateOptions::builder()
            .return_document(mongodb::options::ReturnDocument::After)
            .build();

        let updated = self
            .collection::<User>()
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! {
                    "$set": {
                        "password_hash": password_hash,
                        "password_changed_at": DateTime::now(),
                        "updated_at": DateTime::now()
                    },
                    "$unset": {
                        "password_reset_token": "",
                        "password_reset_expires": ""
                    }
                },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref user) = updated {
            self.invalidate_user_caches(id, Some(&user.email)).await;
        }

        Ok(updated)
    }

    /// 비밀번호 재설정 토큰 저장
    pub async fn set_reset_token(
        &self,
        id: &str,
        token_digest: &str,
        expires: DateTime,
    ) -> Result<(), AppError> {
        let object_id = crud::parse_object_id(id)?;

        self.collection::<User>()
            .update_one(
                doc! { "_id": object_id },
                doc! { "$set": {
                    "password_reset_token": token_digest,
                    "password_reset_expires": expires,
                    "updated_at": DateTime::now()
                }},
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        self.invalidate_user_caches(id, None).await;

        Ok(())
    }

    /// 비밀번호 재설정 토큰 제거 (메일 발송 실패 시 롤백)
    pub async fn clear_reset_token(&self, id: &str) -> Result<(), AppError> {
        let object_id = crud::parse_object_id(id)?;

        self.collection::<User>()
            .update_one(
                doc! { "_id": object_id },
                doc! { "$unset": {
                    "password_reset_token": "",
                    "password_reset_expires": ""
                }},
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        self.invalidate_user_caches(id, None).await;

        Ok(())
    }

    /// 소프트 삭제 (`active: false`)
    pub async fn soft_delete(&self, id: &str) -> Result<bool, AppError> {
        let updated = crud::update_by_id::<User>(
            &self.collection::<User>(),
            id,
            doc! { "active": false },
        )
        .await?;

        if let Some(ref user) = updated {
            self.invalidate_user_caches(id, Some(&user.email)).await;
        }

        Ok(updated.is_some())
    }

    /// 물리 삭제 (관리자 전용)
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let previous = crud::find_by_id(&self.collection::<User>(), id, Document::new()).await?;

        let deleted = crud::delete_by_id(&self.collection::<User>(), id).await?;

        if deleted {
            let email = previous.as_ref().map(|u| u.email.as_str());
            self.invalidate_user_caches(id, email).await;
        }

        Ok(deleted)
    }

    /// ID/이메일 캐시와 컬렉션 캐시를 함께 무효화합니다.
    async fn invalidate_user_caches(&self, id: &str, email: Option<&str>) {
        let _ = self.invalidate_cache(id).await;
        if let Some(email) = email {
            let _ = self.redis.del(&format!("user:email:{}", email)).await;
        }
        let _ = self.invalidate_collection_cache(None).await;
    }

    /// 데이터베이스 인덱스 생성
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<User>();

        // 이메일 유니크 인덱스
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        // 생성일 인덱스
        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        collection
            .create_indexes([email_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
