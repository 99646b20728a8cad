//! # 사용자 관리 서비스 구현
//!
//! 사용자 프로필 조회/수정과 관리자용 사용자 CRUD의 비즈니스 로직을
//! 담당합니다. 인증 플로우(가입/로그인/비밀번호)는 `AuthService`가
//! 담당하고, 이 서비스는 계정 데이터 관리만 다룹니다.
//!
//! ## 비즈니스 규칙
//!
//! - `/update-me`로는 이름/이메일/프로필 사진만 바꿀 수 있습니다.
//!   비밀번호 필드가 섞여 들어오면 전용 경로를 안내하며 거부합니다.
//! - 본인 탈퇴는 소프트 삭제(`active: false`)이고, 관리자 삭제만
//!   문서를 물리적으로 제거합니다.

use std::sync::Arc;
use mongodb::bson::Document;
use singleton_macro::service;

use crate::{
    domain::{
        dto::users::request::{UpdateMeRequest, UpdateUserRequest},
        dto::users::response::UserResponse,
        entities::users::user::User,
    },
    repositories::{crud, users::user_repo::UserRepository},
    utils::api_features::ApiFeatures,
};
use crate::core::errors::AppError;

/// 사용자 관리 비즈니스 로직 서비스
#[service(name = "user")]
pub struct UserService {
    /// 사용자 데이터 액세스 리포지토리
    user_repo: Arc<UserRepository>,
}

impl UserService {
    /// 쿼리 기능이 적용된 사용자 목록 조회 (관리자용)
    pub async fn get_all(&self, features: &ApiFeatures) -> Result<Vec<serde_json::Value>, AppError> {
        let docs = self.user_repo.find_all(features).await?;
        Ok(crud::documents_to_json(docs))
    }

    /// ID로 사용자 프로필 조회
    pub async fn get_by_id(&self, id: &str) -> Result<UserResponse, AppError> {
        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("No user found with that ID".to_string()))?;

        Ok(UserResponse::from(user))
    }

    /// 엔티티 형태의 사용자 조회 (인증 미들웨어 등 내부 사용)
    pub async fn find_entity(&self, id: &str) -> Result<Option<User>, AppError> {
        self.user_repo.find_by_id(id).await
    }

    /// 내 프로필 수정
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 비밀번호 필드가 포함된 요청
    /// * `AppError::ConflictError` - 이미 사용 중인 이메일로 변경 시도
    pub async fn update_me(
        &self,
        user_id: &str,
        request: UpdateMeRequest,
    ) -> Result<UserResponse, AppError> {
        if request.attempts_password_change() {
            return Err(AppError::ValidationError(
                "This route is not for password updates. Please use /update-my-password instead."
                    .to_string(),
            ));
        }

        let mut set_doc = Document::new();

        if let Some(name) = &request.name {
            set_doc.insert("name", name.trim());
        }
        if let Some(email) = &request.email {
            let email = email.to_lowercase();
            // 다른 계정이 쓰고 있는 이메일로는 변경 불가
            if let Some(existing) = self.user_repo.find_by_email(&email).await? {
                if existing.id_string().as_deref() != Some(user_id) {
                    return Err(AppError::ConflictError(
                        "This email is already in use".to_string(),
                    ));
                }
            }
            set_doc.insert("email", email);
        }
        if let Some(photo) = &request.photo {
            set_doc.insert("photo", photo.clone());
        }

        if set_doc.is_empty() {
            return self.get_by_id(user_id).await;
        }

        let updated = self
            .user_repo
            .update(user_id, set_doc)
            .await?
            .ok_or_else(|| AppError::NotFound("No user found with that ID".to_string()))?;

        Ok(UserResponse::from(updated))
    }

    /// 본인 계정 소프트 삭제
    pub async fn delete_me(&self, user_id: &str) -> Result<(), AppError> {
        let deleted = self.user_repo.soft_delete(user_id).await?;

        if !deleted {
            return Err(AppError::NotFound("No user found with that ID".to_string()));
        }

        log::info!("사용자 탈퇴 처리: {}", user_id);
        Ok(())
    }

    /// 관리자용 사용자 수정 (비밀번호 제외)
    pub async fn update_user(
        &self,
        id: &str,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        let mut set_doc = Document::new();

        if let Some(name) = &request.name {
            set_doc.insert("name", name.trim());
        }
        if let Some(email) = &request.email {
            set_doc.insert("email", email.to_lowercase());
        }
        if let Some(photo) = &request.photo {
            set_doc.insert("photo", photo.clone());
        }
        if let Some(role) = request.role {
            let role_bson = mongodb::bson::to_bson(&role)
                .map_err(|e| AppError::InternalError(format!("BSON conversion failed: {}", e)))?;
            set_doc.insert("role", role_bson);
        }
        if let Some(active) = request.active {
            set_doc.insert("active", active);
        }

        if set_doc.is_empty() {
            return self.get_by_id(id).await;
        }

        let updated = self
            .user_repo
            .update(id, set_doc)
            .await?
            .ok_or_else(|| AppError::NotFound("No user found with that ID".to_string()))?;

        Ok(UserResponse::from(updated))
    }

    /// 관리자용 사용자 물리 삭제
    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let deleted = self.user_repo.delete(id).await?;

        if !deleted {
            return Err(AppError::NotFound("No user found with that ID".to_string()));
        }

        log::info!("사용자 삭제 (관리자): {}", id);
        Ok(())
    }
}
