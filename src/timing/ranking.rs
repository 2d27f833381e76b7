//! Ranking engine
//!
//! Ranks are recomputed from the full valid-result population and published as one
//! batch. Every partition (overall, gender, age bracket) uses dense ranking over the
//! key `(total_time_ms, athlete_id)`: equal times share a rank and the next distinct
//! time advances the rank by exactly one.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use crate::{
    error::AppResult,
    models::{RankAssignment, ValidFinisher},
};

use super::brackets::{AgeBracket, bracket_index};
use super::ports::ResultStore;

/// Assign dense ranks to one partition.
///
/// `members` are indices into `finishers`; the returned pairs are `(index, rank)`
/// in ranking order.
fn dense_rank(finishers: &[ValidFinisher], members: &mut [usize]) -> Vec<(usize, i32)> {
    members.sort_by_key(|&i| (finishers[i].total_time_ms, finishers[i].athlete_id));

    let mut ranked = Vec::with_capacity(members.len());
    let mut rank = 0;
    let mut previous: Option<i64> = None;

    for &i in members.iter() {
        let time = finishers[i].total_time_ms;
        if previous != Some(time) {
            rank += 1;
            previous = Some(time);
        }
        ranked.push((i, rank));
    }

    ranked
}

/// Compute overall, gender and age-group ranks for every valid finisher.
///
/// The result is ordered by overall rank, then athlete id.
pub fn compute_rank_assignments(
    finishers: &[ValidFinisher],
    brackets: &[AgeBracket],
) -> Vec<RankAssignment> {
    let mut overall_members: Vec<usize> = (0..finishers.len()).collect();
    let overall = dense_rank(finishers, &mut overall_members);

    let mut by_gender: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    let mut by_bracket: BTreeMap<usize, Vec<usize>> = BTreeMap::new();

    for (i, finisher) in finishers.iter().enumerate() {
        by_gender.entry(finisher.gender.as_str()).or_default().push(i);
        if let Some(bracket) = bracket_index(brackets, finisher.age) {
            by_bracket.entry(bracket).or_default().push(i);
        }
    }

    let mut gender_ranks: HashMap<usize, i32> = HashMap::with_capacity(finishers.len());
    for members in by_gender.values_mut() {
        gender_ranks.extend(dense_rank(finishers, members));
    }

    let mut age_ranks: HashMap<usize, i32> = HashMap::with_capacity(finishers.len());
    for members in by_bracket.values_mut() {
        age_ranks.extend(dense_rank(finishers, members));
    }

    overall
        .into_iter()
        .map(|(i, overall_rank)| RankAssignment {
            result_id: finishers[i].result_id,
            overall_rank,
            gender_rank: gender_ranks.get(&i).copied().unwrap_or(overall_rank),
            age_group_rank: age_ranks.get(&i).copied(),
        })
        .collect()
}

/// Outcome of a recompute request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeOutcome {
    /// A new rank set was computed and published
    Published { ranked: usize },
    /// A recompute that started after this request already covered it
    Coalesced,
}

/// Serialized, coalescing rank recomputation over a result store
pub struct RankingEngine {
    results: Arc<dyn ResultStore>,
    brackets: Vec<AgeBracket>,
    /// Tickets handed out to recompute requests
    requested: AtomicU64,
    /// Highest ticket covered by a published recompute
    published_through: Mutex<u64>,
}

impl RankingEngine {
    /// Create a new ranking engine
    pub fn new(results: Arc<dyn ResultStore>, brackets: Vec<AgeBracket>) -> Self {
        Self {
            results,
            brackets,
            requested: AtomicU64::new(0),
            published_through: Mutex::new(0),
        }
    }

    /// Recompute and publish ranks for the whole valid population.
    ///
    /// Call after the result change has been written. Only one recompute runs at a
    /// time; a request whose ticket was already covered by a recompute that read the
    /// store after the ticket was issued returns [`RecomputeOutcome::Coalesced`].
    pub async fn recompute(&self) -> AppResult<RecomputeOutcome> {
        let ticket = self.requested.fetch_add(1, Ordering::SeqCst) + 1;

        let mut published_through = self.published_through.lock().await;
        if *published_through >= ticket {
            tracing::debug!(ticket, "Rank recompute coalesced");
            return Ok(RecomputeOutcome::Coalesced);
        }

        // Every ticket up to `target` was issued before the read below
        let target = self.requested.load(Ordering::SeqCst);

        let finishers = self.results.all_valid().await?;
        let assignments = compute_rank_assignments(&finishers, &self.brackets);
        self.results.persist_ranks(&assignments).await?;

        *published_through = target;

        tracing::debug!(
            ranked = assignments.len(),
            covered_through = target,
            "Published rank set"
        );

        Ok(RecomputeOutcome::Published {
            ranked: assignments.len(),
        })
    }
}
