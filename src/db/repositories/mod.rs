//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod athlete_repo;
pub mod checkpoint_repo;
pub mod pass_record_repo;
pub mod result_repo;

pub use athlete_repo::AthleteRepository;
pub use checkpoint_repo::CheckpointRepository;
pub use pass_record_repo::PassRecordRepository;
pub use result_repo::ResultRepository;
