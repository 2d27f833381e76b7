//! Business logic services

pub mod athlete_service;
pub mod checkpoint_service;
pub mod result_service;
pub mod timing_service;

pub use athlete_service::AthleteService;
pub use checkpoint_service::CheckpointService;
pub use result_service::ResultService;
pub use timing_service::TimingService;
