// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry primitives for directional search.
//!
//! Every rectangle is first projected into *travel space* for the requested direction:
//! the major coordinate grows in the direction of travel and the minor coordinate runs
//! across it. All comparisons below are then written once, for "moving towards larger
//! major coordinates", instead of once per direction.

use kurbo::Rect;

use crate::FocusDirection;

/// A rectangle projected onto a direction of travel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Travel {
    /// Edge reached first when travelling.
    pub(crate) start: f64,
    /// Edge reached last when travelling.
    pub(crate) end: f64,
    pub(crate) minor_start: f64,
    pub(crate) minor_end: f64,
}

impl Travel {
    /// Project `rect` for `direction`; `None` for logical directions.
    pub(crate) fn project(rect: Rect, direction: FocusDirection) -> Option<Self> {
        let rect = rect.abs();
        let travel = match direction {
            FocusDirection::Right => Self {
                start: rect.x0,
                end: rect.x1,
                minor_start: rect.y0,
                minor_end: rect.y1,
            },
            FocusDirection::Left => Self {
                start: -rect.x1,
                end: -rect.x0,
                minor_start: rect.y0,
                minor_end: rect.y1,
            },
            FocusDirection::Down => Self {
                start: rect.y0,
                end: rect.y1,
                minor_start: rect.x0,
                minor_end: rect.x1,
            },
            FocusDirection::Up => Self {
                start: -rect.y1,
                end: -rect.y0,
                minor_start: rect.x0,
                minor_end: rect.x1,
            },
            _ => return None,
        };
        Some(travel)
    }

    fn minor_center(&self) -> f64 {
        (self.minor_start + self.minor_end) * 0.5
    }

    /// Whether `self` (a candidate) lies in the direction of travel from `focused`.
    ///
    /// The candidate must start past the focused item's near edge (or at/after its far
    /// edge) and must end past its far edge. A rectangle that contains the focused one
    /// never qualifies.
    pub(crate) fn qualifies(&self, focused: &Self) -> bool {
        (focused.start < self.start || focused.end <= self.start) && focused.end < self.end
    }

    /// Whether `self` lies entirely at or past the focused item's far edge.
    pub(crate) fn is_ahead_of(&self, focused: &Self) -> bool {
        focused.end <= self.start
    }

    /// Whether the minor extents overlap by a non-zero amount.
    pub(crate) fn overlaps_beam(&self, focused: &Self) -> bool {
        self.minor_end > focused.minor_start && self.minor_start < focused.minor_end
    }

    pub(crate) fn beam_tier(&self, focused: &Self) -> BeamTier {
        let contains = self.minor_start <= focused.minor_start && self.minor_end >= focused.minor_end;
        let contained = self.minor_start >= focused.minor_start && self.minor_end <= focused.minor_end;
        if contains || contained {
            BeamTier::InBeam
        } else if self.overlaps_beam(focused) {
            BeamTier::Overlapping
        } else {
            BeamTier::Outside
        }
    }

    /// Gap between the focused item's far edge and this candidate's near edge, or zero
    /// when they overlap along the major axis.
    pub(crate) fn major_distance(&self, focused: &Self) -> f64 {
        (self.start - focused.end).max(0.0)
    }

    /// Distance from the focused item's far edge to this candidate's far edge, at least one.
    pub(crate) fn major_distance_to_far_edge(&self, focused: &Self) -> f64 {
        (self.end - focused.end).max(1.0)
    }

    /// Offset between minor-axis centers.
    pub(crate) fn minor_distance(&self, focused: &Self) -> f64 {
        (focused.minor_center() - self.minor_center()).abs()
    }
}

/// How a candidate sits relative to the focused item's beam.
///
/// The beam is the band swept by the focused item's minor-axis extent as it travels in the
/// search direction. Variants are ordered from best to worst.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BeamTier {
    /// The candidate's minor extent contains, or is contained by, the focused item's.
    InBeam,
    /// The minor extents partially overlap by a non-zero amount.
    Overlapping,
    /// The minor extents do not overlap (touching edges do not count).
    Outside,
}

impl BeamTier {
    /// Classify `candidate` against `focused` for a geometric `direction`.
    ///
    /// Returns `None` for logical directions.
    pub fn classify(focused: Rect, candidate: Rect, direction: FocusDirection) -> Option<Self> {
        let f = Travel::project(focused, direction)?;
        let c = Travel::project(candidate, direction)?;
        Some(c.beam_tier(&f))
    }
}
