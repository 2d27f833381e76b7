//! Race completion evaluation
//!
//! Decides whether an athlete's race is complete and, if so, computes the elapsed
//! time and validity and upserts the athlete's result. Running it twice over the
//! same pass records yields the same result.

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    error::AppResult,
    models::{Checkpoint, PassRecord, RaceResult},
};

use super::ports::{CheckpointLookup, PassRecordStore, ResultStore};

/// Timing facts derived from an athlete's passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub total_time_ms: i64,
    pub distinct_checkpoints: i64,
    pub total_checkpoints: i64,
    pub valid: bool,
}

impl Assessment {
    pub fn is_negative(&self) -> bool {
        self.total_time_ms < 0
    }
}

/// Result of evaluating one athlete
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Evaluation {
    /// Start or finish pass is missing; nothing was written
    Incomplete { has_start: bool, has_finish: bool },
    /// The athlete's result was created or replaced
    Completed {
        result: RaceResult,
        negative_duration: bool,
        /// False when the stored time and validity were already the same
        changed: bool,
    },
}

impl Evaluation {
    pub fn result(&self) -> Option<&RaceResult> {
        match self {
            Self::Completed { result, .. } => Some(result),
            Self::Incomplete { .. } => None,
        }
    }

    /// Whether the published rank set may no longer match this result.
    ///
    /// True when the result changed, or when an unchanged result is valid but
    /// unranked (or invalid but still ranked) because an earlier publish failed.
    pub fn needs_publish(&self) -> bool {
        match self {
            Self::Completed {
                result, changed, ..
            } => *changed || result.valid != result.is_ranked(),
            Self::Incomplete { .. } => false,
        }
    }
}

/// Derive elapsed time and validity from passes and the checkpoint directory.
///
/// Returns `None` while the start or the finish pass is missing.
pub fn assess(
    passes: &[PassRecord],
    checkpoints: &[Checkpoint],
    total_checkpoints: i64,
) -> Option<Assessment> {
    let start_id = checkpoints.iter().find(|c| c.is_start)?.id;
    let finish_id = checkpoints.iter().find(|c| c.is_finish)?.id;

    let start = passes.iter().find(|p| p.checkpoint_id == start_id)?;
    let finish = passes.iter().find(|p| p.checkpoint_id == finish_id)?;

    let total_time_ms = (finish.pass_time - start.pass_time).num_milliseconds();

    let known: HashSet<i64> = checkpoints.iter().map(|c| c.id).collect();
    let distinct_checkpoints = passes
        .iter()
        .map(|p| p.checkpoint_id)
        .filter(|id| known.contains(id))
        .collect::<HashSet<_>>()
        .len() as i64;

    let valid = distinct_checkpoints == total_checkpoints && total_time_ms >= 0;

    Some(Assessment {
        total_time_ms,
        distinct_checkpoints,
        total_checkpoints,
        valid,
    })
}

/// Evaluate an athlete's race and upsert the result when it is complete.
///
/// The caller must hold the athlete's lock and trigger a rank recompute when a
/// result was written.
pub async fn evaluate_athlete(
    checkpoints: &dyn CheckpointLookup,
    passes: &dyn PassRecordStore,
    results: &dyn ResultStore,
    athlete_id: i64,
) -> AppResult<Evaluation> {
    let directory = checkpoints.all().await?;
    let total_checkpoints = checkpoints.total().await?;
    let athlete_passes = passes.find_by_athlete(athlete_id).await?;

    let Some(assessment) = assess(&athlete_passes, &directory, total_checkpoints) else {
        let has_pass_for = |flag: fn(&Checkpoint) -> bool| {
            directory
                .iter()
                .filter(|c| flag(c))
                .any(|c| athlete_passes.iter().any(|p| p.checkpoint_id == c.id))
        };
        let has_start = has_pass_for(|c| c.is_start);
        let has_finish = has_pass_for(|c| c.is_finish);

        tracing::debug!(athlete_id, has_start, has_finish, "Race not complete yet");
        return Ok(Evaluation::Incomplete {
            has_start,
            has_finish,
        });
    };

    if assessment.is_negative() {
        tracing::warn!(
            athlete_id,
            total_time_ms = assessment.total_time_ms,
            "Finish pass precedes start pass, result marked invalid"
        );
    } else if !assessment.valid {
        tracing::info!(
            athlete_id,
            passed = assessment.distinct_checkpoints,
            required = assessment.total_checkpoints,
            "Athlete missed checkpoints, result marked invalid"
        );
    }

    let previous = results.find_by_athlete(athlete_id).await?;
    let changed = previous.is_none_or(|prior| {
        prior.total_time_ms != assessment.total_time_ms || prior.valid != assessment.valid
    });

    let result = results
        .upsert_by_athlete(athlete_id, assessment.total_time_ms, assessment.valid)
        .await?;

    tracing::info!(
        athlete_id,
        result_id = result.id,
        total_time_ms = result.total_time_ms,
        valid = result.valid,
        changed,
        "Race result evaluated"
    );

    Ok(Evaluation::Completed {
        result,
        negative_duration: assessment.is_negative(),
        changed,
    })
}
