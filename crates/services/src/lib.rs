#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod mirror;
pub mod skill_service;

pub use tracker_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, MirrorReleased, SkillServiceError};
pub use mirror::SkillMirror;
pub use skill_service::SkillService;
