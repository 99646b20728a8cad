//! 예약 엔티티 모듈

pub mod booking;

pub use booking::*;
