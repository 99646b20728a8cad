//! 투어 리포지토리 모듈

pub mod tour_repo;

pub use tour_repo::*;
