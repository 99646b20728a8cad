//! 투어 엔티티 모듈

pub mod tour;

pub use tour::*;
