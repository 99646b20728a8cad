//! 예약 서비스 모듈

pub mod booking_service;

pub use booking_service::*;
