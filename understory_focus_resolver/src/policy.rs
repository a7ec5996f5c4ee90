// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ranking policies for geometric focus search.
//!
//! ## Qualification
//!
//! Both policies first discard candidates that do not lie in the direction of travel: a
//! candidate must begin past the focused item's near edge and end past its far edge.
//! Non-finite rectangles are discarded as well.
//!
//! ## Ties
//!
//! Whatever a policy cannot separate falls back to reading order: topmost, then leftmost,
//! then the smaller handle. Input order never affects the winner.

use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::Rect;
use tracing::trace;

use crate::geometry::Travel;
use crate::{Candidate, FocusDirection, FocusKey};

/// Trait for geometric ranking policies.
///
/// A policy receives the focused rectangle, a geometric direction, and an unordered slice
/// of candidates, and returns the winner if any. Implementations must be deterministic:
/// permuting `candidates` must not change the result.
pub trait FocusPolicy<K>
where
    K: FocusKey,
{
    /// Pick the best candidate for a move from `focused` in `direction`.
    ///
    /// Returns `None` when no candidate qualifies or `direction` is not geometric.
    fn best_candidate(
        &self,
        focused: Rect,
        direction: FocusDirection,
        candidates: &[Candidate<K>],
    ) -> Option<Candidate<K>>;
}

/// Default ranking: beam tier, then major-axis distance, then minor-axis distance.
///
/// A higher [`BeamTier`](crate::BeamTier) always wins, no matter how far away it is. Within a
/// tier the candidate with the smaller gap along the direction of travel wins; on an exact
/// tie, the one whose center is closer to the focused item's center across the direction
/// of travel.
#[derive(Copy, Clone, Debug, Default)]
pub struct TieredPolicy;

/// Ranking that reproduces the classic beam-beats comparator.
///
/// A candidate that overlaps the focused item's beam beats one that does not. For
/// horizontal moves this holds unconditionally; for vertical moves only while the beam
/// candidate's gap is smaller than the distance to the other candidate's far edge.
/// Otherwise the smaller weighted distance `13 * major² + minor²` wins.
///
/// Because of the vertical rule, a layout and its transpose can resolve to different
/// winners.
#[derive(Copy, Clone, Debug, Default)]
pub struct BeamBeatsPolicy;

/// Rank `candidates` for a move from `focused` in `direction` with [`TieredPolicy`].
pub fn rank<K: FocusKey>(
    focused: Rect,
    direction: FocusDirection,
    candidates: &[Candidate<K>],
) -> Option<Candidate<K>> {
    TieredPolicy.best_candidate(focused, direction, candidates)
}

/// A qualifying candidate together with its travel-space projection.
#[derive(Copy, Clone, Debug)]
struct Projected<K> {
    candidate: Candidate<K>,
    travel: Travel,
}

fn qualifying<K: FocusKey>(
    focused: &Travel,
    direction: FocusDirection,
    candidates: &[Candidate<K>],
) -> impl Iterator<Item = Projected<K>> {
    candidates.iter().filter_map(move |c| {
        if !c.rect.is_finite() {
            return None;
        }
        let travel = Travel::project(c.rect, direction)?;
        travel.qualifies(focused).then_some(Projected {
            candidate: *c,
            travel,
        })
    })
}

pub(crate) fn reading_order<K: FocusKey>(a: &Candidate<K>, b: &Candidate<K>) -> Ordering {
    a.rect
        .min_y()
        .total_cmp(&b.rect.min_y())
        .then_with(|| a.rect.min_x().total_cmp(&b.rect.min_x()))
        .then_with(|| a.id.cmp(&b.id))
}

impl<K: FocusKey> FocusPolicy<K> for TieredPolicy {
    fn best_candidate(
        &self,
        focused: Rect,
        direction: FocusDirection,
        candidates: &[Candidate<K>],
    ) -> Option<Candidate<K>> {
        if !focused.is_finite() {
            return None;
        }
        let f = Travel::project(focused, direction)?;

        qualifying(&f, direction, candidates)
            .inspect(|p| {
                trace!(
                    id = ?p.candidate.id,
                    tier = ?p.travel.beam_tier(&f),
                    major = p.travel.major_distance(&f),
                    minor = p.travel.minor_distance(&f),
                    "tiered candidate"
                );
            })
            .min_by(|a, b| {
                a.travel
                    .beam_tier(&f)
                    .cmp(&b.travel.beam_tier(&f))
                    .then_with(|| {
                        a.travel
                            .major_distance(&f)
                            .total_cmp(&b.travel.major_distance(&f))
                    })
                    .then_with(|| {
                        a.travel
                            .minor_distance(&f)
                            .total_cmp(&b.travel.minor_distance(&f))
                    })
                    .then_with(|| reading_order(&a.candidate, &b.candidate))
            })
            .map(|p| p.candidate)
    }
}

impl<K: FocusKey> FocusPolicy<K> for BeamBeatsPolicy {
    fn best_candidate(
        &self,
        focused: Rect,
        direction: FocusDirection,
        candidates: &[Candidate<K>],
    ) -> Option<Candidate<K>> {
        if !focused.is_finite() {
            return None;
        }
        let f = Travel::project(focused, direction)?;
        let vertical = matches!(direction, FocusDirection::Up | FocusDirection::Down);

        // The pairwise comparison is not a total order, so fold over a canonical order.
        let mut ordered: Vec<Projected<K>> = qualifying(&f, direction, candidates).collect();
        ordered.sort_by(|a, b| reading_order(&a.candidate, &b.candidate));

        let mut best: Option<Projected<K>> = None;
        for proposed in ordered {
            let better = match &best {
                None => true,
                Some(current) => is_better(&f, &proposed.travel, &current.travel, vertical),
            };
            trace!(id = ?proposed.candidate.id, better, "beam-beats candidate");
            if better {
                best = Some(proposed);
            }
        }
        best.map(|p| p.candidate)
    }
}

fn is_better(focused: &Travel, proposed: &Travel, current: &Travel, vertical: bool) -> bool {
    if beam_beats(focused, proposed, current, vertical) {
        return true;
    }
    if beam_beats(focused, current, proposed, vertical) {
        return false;
    }
    weighted_distance(focused, proposed) < weighted_distance(focused, current)
}

/// Whether `r1` wins over `r2` purely by sitting in the focused item's beam.
fn beam_beats(focused: &Travel, r1: &Travel, r2: &Travel, vertical: bool) -> bool {
    if r2.overlaps_beam(focused) || !r1.overlaps_beam(focused) {
        return false;
    }
    // r1 is in the beam and r2 is not; r2 not being fully ahead settles it.
    if !r2.is_ahead_of(focused) {
        return true;
    }
    if !vertical {
        return true;
    }
    r1.major_distance(focused) < r2.major_distance_to_far_edge(focused)
}

fn weighted_distance(focused: &Travel, candidate: &Travel) -> f64 {
    // The major axis dominates.
    const MAJOR_WEIGHT: f64 = 13.0;
    let major = candidate.major_distance(focused);
    let minor = candidate.minor_distance(focused);
    MAJOR_WEIGHT * major * major + minor * minor
}
