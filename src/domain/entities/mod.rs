//! # Domain Entities
//!
//! MongoDB 문서와 1:1로 매핑되는 핵심 도메인 엔티티들입니다.
//!
//! ## 공통 규약
//!
//! - `#[serde(rename = "_id", skip_serializing_if = "Option::is_none")]`
//!   형태의 Option\<ObjectId\> ID 필드를 갖습니다. 새 문서는 `id: None`으로
//!   생성하고 MongoDB가 ID를 할당합니다.
//! - 엔티티 간 관계는 ObjectId 참조로 표현합니다 (Review → Tour, User).
//! - 타임스탬프는 `mongodb::bson::DateTime`을 사용합니다.
//! - 클라이언트 응답에는 엔티티를 직접 내보내지 않고 DTO로 변환합니다.
//!
//! ```rust,ignore
//! #[repository(name = "tour", collection = "tours")]
//! pub struct TourRepository {
//!     db: Arc<Database>,
//!     redis: Arc<RedisClient>,
//! }
//! ```

pub mod tours;
pub mod users;
pub mod reviews;
pub mod bookings;
