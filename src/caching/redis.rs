//! # Redis 캐시 클라이언트 구현
//!
//! Redis를 백엔드로 하는 캐시 클라이언트를 제공합니다.
//! 멀티플렉싱된 단일 TCP 연결에서 여러 동시 요청을 처리하며,
//! Serde를 통한 투명한 JSON 직렬화를 지원합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::redis::RedisClient;
//!
//! let redis = RedisClient::new().await?;
//!
//! // 투어 정보 캐싱 (10분 TTL)
//! redis.set_with_expiry("tour:5c88fa8cf4afda39709c2955", &tour, 600).await?;
//!
//! // 캐시된 데이터 조회
//! let cached: Option<Tour> = redis.get("tour:5c88fa8cf4afda39709c2955").await?;
//! ```

use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};
use std::env;

/// Redis 캐시 클라이언트 래퍼
///
/// Redis 서버와의 상호작용을 추상화합니다. 제네릭 기반의 타입 안전한
/// get/set과 TTL 관리, 키 패턴 삭제를 제공합니다.
#[derive(Clone)]
pub struct RedisClient {
    /// 멀티플렉싱을 지원하는 Redis 클라이언트
    client: Client,
}

impl RedisClient {
    /// 새 Redis 클라이언트 인스턴스를 생성합니다.
    ///
    /// 환경 변수 `REDIS_URL`에서 서버 주소를 읽어오며, 설정되지 않은 경우
    /// 기본값 `redis://localhost:6379`를 사용합니다. 생성 시 PING으로
    /// 서버 가용성을 확인합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let redis_url = env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = Client::open(redis_url)?;

        // 연결 테스트
        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        println!("✅ Redis 연결 성공");

        Ok(Self { client })
    }

    /// 키에 저장된 값을 조회하고 역직렬화합니다.
    ///
    /// 키가 없으면 `Ok(None)`을 반환합니다.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => {
                let deserialized = serde_json::from_str(&json).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::TypeError,
                        "Deserialization failed",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    /// 값을 JSON으로 직렬화하여 저장합니다. (만료 없음)
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value).map_err(|e| {
            redis::RedisError::from((
                redis::ErrorKind::TypeError,
                "Serialization failed",
                e.to_string(),
            ))
        })?;
        conn.set(key, json).await
    }

    /// 값을 TTL과 함께 저장합니다.
    ///
    /// * `seconds` - 만료 시간 (초)
    pub async fn set_with_expiry<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        seconds: usize,
    ) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value).map_err(|e| {
            redis::RedisError::from((
                redis::ErrorKind::TypeError,
                "Serialization failed",
                e.to_string(),
            ))
        })?;
        conn.set_ex(key, json, seconds as u64).await
    }

    /// 키를 삭제합니다.
    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(key).await
    }

    /// 여러 키를 한 번에 삭제합니다.
    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), redis::RedisError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(keys).await
    }

    /// 패턴과 일치하는 키 목록을 조회합니다.
    ///
    /// 캐시 무효화 시 `tour:*` 같은 패턴으로 관련 키를 찾는 데 사용됩니다.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.keys(pattern).await
    }
}

impl Default for RedisClient {
    fn default() -> Self {
        let redis_url = env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = Client::open(redis_url)
            .expect("Failed to create Redis client with default configuration");

        Self { client }
    }
}
