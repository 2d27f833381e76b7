//! Race timing core
//!
//! Pass ingestion, completion evaluation, rank publication and finish
//! notification. Storage is reached only through the traits in [`ports`].

pub mod brackets;
pub mod engine;
pub mod evaluator;
pub mod locks;
pub mod notify;
pub mod ports;
pub mod ranking;

pub use brackets::AgeBracket;
pub use engine::{IngestReport, TimingEngine};
pub use evaluator::Evaluation;
pub use notify::{LogNotifier, Notifier, NotifyError};
pub use ports::{AthleteLookup, CheckpointLookup, PassRecordStore, ResultStore, TimingStores};
pub use ranking::{RankingEngine, RecomputeOutcome};
