/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Float layout.
//!
//! See CSS 2.2 § 9.5.1: <https://www.w3.org/TR/CSS22/visuren.html#float-position>

use std::collections::VecDeque;
use std::ops::Range;

use app_units::{Au, MIN_AU};
use euclid::num::Zero;
use log::debug;

use crate::geom::LogicalVec2;
use crate::style::{Clear, ComputedStyle, Float};
use crate::tree::BoxId;

/// Which side of the line a float is aligned to. Line-relative: `float: left`
/// is the line-left side in every writing mode and direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatSide {
    LineLeft,
    LineRight,
}

impl FloatSide {
    pub fn from_style(style: &ComputedStyle) -> Option<FloatSide> {
        match style.float {
            Float::None => None,
            Float::Left => Some(FloatSide::LineLeft),
            Float::Right => Some(FloatSide::LineRight),
        }
    }
}

/// Information needed to place one float without colliding with the floats
/// already placed: its *margin* box size, side, and `clear`.
#[derive(Clone, Debug)]
pub struct PlacementInfo {
    pub size: LogicalVec2<Au>,
    pub side: FloatSide,
    pub clear: Clear,
}

/// A block-axis band over which one side's float intrusion is constant.
///
/// `edge` is the intrusion boundary in block-formatting-context coordinates
/// (distance from the BFC content box's line-left edge): for the line-left
/// side the line-right edge of the occupied span, for the line-right side its
/// line-left edge. `None` means no float touches this band, which is distinct
/// from a zero-inline-size float being present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FloatBand {
    top: Au,
    edge: Option<Au>,
    count: usize,
}

/// One side's track grid: bands with strictly increasing, split-only
/// boundaries, plus this side's shelf (the block cursor below which the next
/// float on this side must go).
#[derive(Clone, Debug)]
struct FloatBandList {
    side: FloatSide,
    bands: Vec<FloatBand>,
    shelf: Au,
    /// Lowest margin-box block-end of any float on this side.
    clear_offset: Option<Au>,
}

impl FloatBandList {
    fn new(side: FloatSide) -> Self {
        Self {
            side,
            bands: vec![FloatBand {
                top: MIN_AU,
                edge: None,
                count: 0,
            }],
            shelf: Au::zero(),
            clear_offset: None,
        }
    }

    /// Indices of the bands overlapping the half-open block span
    /// `[block_start, block_end)`. A zero-height span still selects the band
    /// containing `block_start`.
    fn band_range(&self, block_start: Au, block_end: Au) -> Range<usize> {
        let start = self.bands.partition_point(|band| band.top <= block_start) - 1;
        let end = self
            .bands
            .partition_point(|band| band.top < block_end)
            .max(start + 1);
        start..end
    }

    /// The worst-case intrusion edge over a band range, or `None` when no
    /// float touches any band in the range.
    fn intrusion_over(&self, range: Range<usize>) -> Option<Au> {
        let mut result: Option<Au> = None;
        for band in &self.bands[range] {
            let edge = match band.edge {
                Some(edge) => edge,
                None => continue,
            };
            result = Some(match (self.side, result) {
                (_, None) => edge,
                (FloatSide::LineLeft, Some(acc)) => acc.max(edge),
                (FloatSide::LineRight, Some(acc)) => acc.min(edge),
            });
        }
        result
    }

    fn occupied_over(&self, range: Range<usize>) -> bool {
        self.bands[range].iter().any(|band| band.count > 0)
    }

    /// First band boundary strictly below `position`, if any band actually
    /// starts there.
    fn next_boundary_after(&self, position: Au) -> Option<Au> {
        let index = self.bands.partition_point(|band| band.top <= position);
        self.bands.get(index).map(|band| band.top)
    }

    /// Ensure a boundary exists at `at`, duplicating the containing band.
    /// Boundaries are only ever split, never merged.
    fn split_at(&mut self, at: Au) {
        let index = self.bands.partition_point(|band| band.top <= at);
        debug_assert!(index > 0, "split point above the sentinel band");
        if self.bands[index - 1].top == at {
            return;
        }
        let mut band = self.bands[index - 1];
        band.top = at;
        self.bands.insert(index, band);
    }

    /// Record a float covering `block_range` whose intrusion boundary is
    /// `new_edge`, splitting boundaries at both extents.
    fn add_float_extent(&mut self, block_range: Range<Au>, new_edge: Au) {
        if block_range.start >= block_range.end {
            return;
        }
        self.split_at(block_range.start);
        self.split_at(block_range.end);
        let range = self.band_range(block_range.start, block_range.end);
        for band in &mut self.bands[range] {
            debug_assert!(band.top >= block_range.start && band.top < block_range.end);
            band.edge = Some(match (self.side, band.edge) {
                (_, None) => new_edge,
                (FloatSide::LineLeft, Some(old)) => old.max(new_edge),
                (FloatSide::LineRight, Some(old)) => old.min(new_edge),
            });
            band.count += 1;
        }
    }
}

/// The available inline span at some block position after subtracting both
/// sides' float intrusion, in BFC coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vacancy {
    pub block_offset: Au,
    pub line_left: Au,
    pub line_right: Au,
}

impl Vacancy {
    pub fn inline_size(&self) -> Au {
        self.line_right - self.line_left
    }

    /// Intersect with a containing block's own inline extent. Floats
    /// intrude in BFC coordinates; lines still may not escape their
    /// container.
    pub fn clamped_to(&self, walls: (Au, Au)) -> Vacancy {
        Vacancy {
            block_offset: self.block_offset,
            line_left: self.line_left.max(walls.0),
            line_right: self.line_right.min(walls.1),
        }
    }
}

/// The outcome of asking to place a float right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatPlacement {
    Placed(LogicalVec2<Au>),
    /// The current line must finish first; the caller queues the float.
    Deferred,
}

/// Per-BFC float state: one track grid per side, the ceilings imposed by
/// earlier floats and earlier in-flow content, and floats waiting on the
/// current line to finish.
///
/// All coordinates are relative to the BFC content box's block-start /
/// line-left corner.
#[derive(Clone, Debug)]
pub struct FloatContext {
    line_left: FloatBandList,
    line_right: FloatBandList,
    /// Inline size of the BFC content box; the line-right wall.
    inline_size: Au,
    /// CSS 2.2 § 9.5.1 rule 6: no float may start above an earlier float.
    ceiling_from_floats: Au,
    /// No float may start above the in-flow content that precedes it.
    ceiling_from_non_floats: Au,
    misfits: VecDeque<(BoxId, PlacementInfo)>,
}

impl FloatContext {
    pub fn new(inline_size: Au) -> Self {
        Self {
            line_left: FloatBandList::new(FloatSide::LineLeft),
            line_right: FloatBandList::new(FloatSide::LineRight),
            inline_size,
            ceiling_from_floats: Au::zero(),
            ceiling_from_non_floats: Au::zero(),
            misfits: VecDeque::new(),
        }
    }

    /// (Logically) lowers the non-float ceiling. Floats may not be placed
    /// above the flow position of the content that precedes them.
    pub fn set_ceiling_from_non_floats(&mut self, ceiling: Au) {
        self.ceiling_from_non_floats = self.ceiling_from_non_floats.max(ceiling);
    }

    fn ceiling(&self) -> Au {
        self.ceiling_from_floats.max(self.ceiling_from_non_floats)
    }

    /// The block position below the floats an element with this `clear`
    /// value must clear, if there are any.
    pub fn clear_position(&self, clear: Clear) -> Option<Au> {
        match clear {
            Clear::None => None,
            Clear::Left => self.line_left.clear_offset,
            Clear::Right => self.line_right.clear_offset,
            Clear::Both => match (self.line_left.clear_offset, self.line_right.clear_offset) {
                (None, None) => None,
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (Some(a), Some(b)) => Some(a.max(b)),
            },
        }
    }

    /// Lowest float bottom on either side; what a BFC root's auto block size
    /// must contain.
    pub fn lowest_float_bottom(&self) -> Option<Au> {
        self.clear_position(Clear::Both)
    }

    pub fn has_pending_misfits(&self) -> bool {
        !self.misfits.is_empty()
    }

    pub fn queue_misfit(&mut self, float_box: BoxId, info: PlacementInfo) {
        self.misfits.push_back((float_box, info));
    }

    pub fn take_misfits(&mut self) -> Vec<(BoxId, PlacementInfo)> {
        self.misfits.drain(..).collect()
    }

    fn side(&self, side: FloatSide) -> &FloatBandList {
        match side {
            FloatSide::LineLeft => &self.line_left,
            FloatSide::LineRight => &self.line_right,
        }
    }

    fn side_mut(&mut self, side: FloatSide) -> &mut FloatBandList {
        match side {
            FloatSide::LineLeft => &mut self.line_left,
            FloatSide::LineRight => &mut self.line_right,
        }
    }

    /// The vacancy at `block_offset` for an object spanning
    /// `size.block` (clamped to zero; negative margins never grow bands).
    pub fn vacancy_for_box(&self, block_offset: Au, size: LogicalVec2<Au>) -> Vacancy {
        let block_end = block_offset + size.block.max(Au::zero());
        let left_range = self.line_left.band_range(block_offset, block_end);
        let right_range = self.line_right.band_range(block_offset, block_end);
        let line_left = self
            .line_left
            .intrusion_over(left_range)
            .unwrap_or_else(Au::zero)
            .max(Au::zero());
        let line_right = self
            .line_right
            .intrusion_over(right_range)
            .unwrap_or(self.inline_size)
            .min(self.inline_size);
        Vacancy {
            block_offset,
            line_left,
            line_right,
        }
    }

    fn any_float_in_band(&self, block_offset: Au, block_size: Au) -> bool {
        let block_end = block_offset + block_size.max(Au::zero());
        self.line_left
            .occupied_over(self.line_left.band_range(block_offset, block_end)) ||
            self.line_right
                .occupied_over(self.line_right.band_range(block_offset, block_end))
    }

    /// Place one float (CSS 2.2 § 9.5.1 rules 1–9), given how much of the
    /// current line is already consumed and whether that line is still empty.
    ///
    /// Returns the BFC-relative start corner of the float's margin box, or
    /// [`FloatPlacement::Deferred`] when the float cannot be committed until
    /// the in-progress line finishes.
    pub fn place_float(
        &mut self,
        line_width: Au,
        line_is_empty: bool,
        info: &PlacementInfo,
    ) -> FloatPlacement {
        let inline_size = info.size.inline.max(Au::zero());
        let block_size = info.size.block.max(Au::zero());

        // Rules 5 and 6: not above the flow, not above earlier floats, and
        // not above the bottom of floats this one clears.
        let mut position = self.side(info.side).shelf.max(self.ceiling());
        if let Some(clear) = self.clear_position(info.clear) {
            position = position.max(clear);
        }

        loop {
            let vacancy = self.vacancy_for_box(position, info.size);
            let fits_next_to_line = inline_size + line_width <= vacancy.inline_size();
            // A float on an otherwise empty line is accepted even when it is
            // wider than the available space, as long as no other float
            // occupies its vertical band.
            let empty_line_exception =
                line_is_empty && !self.any_float_in_band(position, block_size);
            if fits_next_to_line || empty_line_exception {
                return FloatPlacement::Placed(self.commit(position, &vacancy, info));
            }

            let own_next = self.side(info.side).next_boundary_after(position);
            let next = match own_next {
                Some(boundary) => Some(boundary),
                None => match info.side {
                    FloatSide::LineLeft => self.line_right.next_boundary_after(position),
                    FloatSide::LineRight => self.line_left.next_boundary_after(position),
                },
            };
            match next {
                Some(boundary) => position = boundary,
                // Nothing is in the way; the line itself is the obstacle.
                // Retry once the line is known to be empty.
                None => return FloatPlacement::Deferred,
            }
        }
    }

    fn commit(&mut self, position: Au, vacancy: &Vacancy, info: &PlacementInfo) -> LogicalVec2<Au> {
        let inline_size = info.size.inline.max(Au::zero());
        let block_size = info.size.block.max(Au::zero());

        let (origin_inline, new_edge) = match info.side {
            FloatSide::LineLeft => (vacancy.line_left, vacancy.line_left + inline_size),
            FloatSide::LineRight => {
                let origin = vacancy.line_right - inline_size;
                (origin, origin)
            },
        };

        let block_range = position..position + block_size;
        self.side_mut(info.side)
            .add_float_extent(block_range.clone(), new_edge);

        let side = self.side_mut(info.side);
        side.clear_offset = Some(
            side.clear_offset
                .map_or(block_range.end, |bottom| bottom.max(block_range.end)),
        );
        side.shelf = position;
        self.ceiling_from_floats = self.ceiling_from_floats.max(position);

        debug!(
            "placed {:?} float at block {:?} inline {:?} (margin box {:?}x{:?})",
            info.side, position, origin_inline, info.size.inline, info.size.block,
        );
        LogicalVec2 {
            inline: origin_inline,
            block: position,
        }
    }

    /// First block position at or below `block_offset` where a span of
    /// `inline_size` over `block_size` fits between both sides' floats,
    /// within the containing block extent `walls`. When every band is too
    /// narrow, the position below all floats is returned (there the span is
    /// unconstrained).
    pub fn find_line_position(
        &self,
        block_offset: Au,
        block_size: Au,
        inline_size: Au,
        walls: (Au, Au),
    ) -> Vacancy {
        let mut position = block_offset;
        loop {
            let vacancy = self
                .vacancy_for_box(
                    position,
                    LogicalVec2 {
                        inline: inline_size,
                        block: block_size,
                    },
                )
                .clamped_to(walls);
            if vacancy.inline_size() >= inline_size {
                return vacancy;
            }
            let next = match (
                self.line_left.next_boundary_after(position),
                self.line_right.next_boundary_after(position),
            ) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (None, None) => None,
            };
            match next {
                Some(boundary) => position = boundary,
                None => {
                    return Vacancy {
                        block_offset: position,
                        line_left: walls.0,
                        line_right: walls.1,
                    };
                },
            }
        }
    }
}
