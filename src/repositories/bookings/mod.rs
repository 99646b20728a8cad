//! 예약 리포지토리 모듈

pub mod booking_repo;

pub use booking_repo::*;
