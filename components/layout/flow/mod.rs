/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Flow layout, also known as block-and-inline layout.
//!
//! The block formatting context here walks a block-level subtree in document
//! order. Because CSS 2.2 § 8.3.1 defines a collapsed margin as a max/min
//! over the *entire* adjoining run, no box in a run can be positioned until
//! the whole run has been seen; start/end events are therefore queued and
//! positions assigned in deferred batches.

use app_units::Au;
use euclid::num::Zero;
use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::context::LayoutContext;
use crate::flow::float::{
    FloatContext, FloatPlacement, FloatSide, PlacementInfo,
};
use crate::geom::{AuOrAuto, LogicalVec2, WritingMode};
use crate::sizing::ContentSizes;
use crate::style::{LengthPercentageOrAuto, PaddingBorderMargin};
use crate::tree::{AreaKind, AreaRef, BoxFlags, BoxId, BoxKind, BoxTree};

pub mod float;
pub mod inline;

/// A set of adjoining margins being collapsed into one value.
///
/// CSS 2.2 § 8.3.1: the collapsed value is the maximum of the positive
/// adjoining margins added to the minimum (most negative) of the negative
/// adjoining margins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollapsedMargin {
    max_positive: Au,
    min_negative: Au,
}

impl CollapsedMargin {
    pub fn zero() -> Self {
        Self {
            max_positive: Au::zero(),
            min_negative: Au::zero(),
        }
    }

    pub fn new(margin: Au) -> Self {
        Self {
            max_positive: margin.max(Au::zero()),
            min_negative: margin.min(Au::zero()),
        }
    }

    pub fn adjoin(&self, other: &Self) -> Self {
        Self {
            max_positive: self.max_positive.max(other.max_positive),
            min_negative: self.min_negative.min(other.min_negative),
        }
    }

    pub fn adjoin_assign(&mut self, other: &Self) {
        *self = self.adjoin(other);
    }

    pub fn solve(&self) -> Au {
        self.max_positive + self.min_negative
    }
}

/// The used values of one box's inline-axis box model, resolved exactly once
/// per layout (CSS 2.2 § 10.3.3).
#[derive(Clone, Copy, Debug)]
pub struct InlineBoxModel {
    /// Content-box inline size.
    pub inline_size: Au,
    pub margin_line_left: Au,
    pub margin_line_right: Au,
}

#[derive(Clone, Debug)]
struct BoxModels {
    pbm: PaddingBorderMargin,
    inline: InlineBoxModel,
    /// Resolved block size; `Auto` is settled by the collapsing machinery
    /// or by `finalize`.
    block: AuOrAuto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Last {
    Start,
    End,
}

#[derive(Debug)]
enum PendingEvent {
    Start {
        box_id: BoxId,
        level: usize,
        /// Border + padding block-start: border-box to content-box offset.
        bp_start: Au,
    },
    End {
        box_id: BoxId,
        level: usize,
        /// `None` means the block size is auto and comes from the children
        /// seen between the start and end events.
        content_block_size: Option<Au>,
        padding_sum: Au,
        border_sum: Au,
        /// Whether the box's end margin stayed in the run (the run is still
        /// pending below this box).
        end_adjoins: bool,
    },
}

/// The current collapsing run and the flow level it is anchored to (the
/// level whose content flow the collapsed value will materialize in).
#[derive(Debug)]
struct MarginRun {
    collection: CollapsedMargin,
    level: usize,
    /// Set when a box at this depth took clearance and collapsed through;
    /// its end margin must not merge upward across the clearance boundary.
    clearance_at: Option<usize>,
}

impl MarginRun {
    fn empty_at(level: usize) -> Self {
        Self {
            collection: CollapsedMargin::zero(),
            level,
            clearance_at: None,
        }
    }
}

/// Where the containing block currently open at some level sits inside the
/// BFC. The block position is an estimate that excludes margins still being
/// collapsed; inline positions are exact (they are resolved eagerly).
#[derive(Clone, Copy, Debug)]
struct CbInfo {
    block_start_estimate: Au,
    line_left: Au,
    line_right: Au,
}

/// One block formatting context's traversal state. Created fresh per
/// BFC-root box and discarded once the subtree is positioned.
pub struct BlockFormattingContext {
    pub fctx: FloatContext,
    /// BFC-relative flow position, excluding margins still being collapsed.
    cursor: Au,
    pending: Vec<PendingEvent>,
    /// Depth of the box whose content flow we are currently inside;
    /// the BFC root's content is level 0.
    level: usize,
    margin: MarginRun,
    last: Option<Last>,
    hypotheticals: FxHashMap<BoxId, Au>,
    // Per-open-level drain state, persisted across flushes because a batch
    // may start or end mid-tree.
    size_stack: Vec<Au>,
    offset_stack: Vec<Au>,
    rel_stack: Vec<Au>,
    cb_stack: Vec<CbInfo>,
}

impl BlockFormattingContext {
    pub fn new(inline_size: Au) -> Self {
        Self {
            fctx: FloatContext::new(inline_size),
            cursor: Au::zero(),
            pending: Vec::new(),
            level: 0,
            margin: MarginRun::empty_at(0),
            last: None,
            hypotheticals: FxHashMap::default(),
            size_stack: vec![Au::zero()],
            offset_stack: vec![Au::zero()],
            rel_stack: vec![Au::zero()],
            cb_stack: vec![CbInfo {
                block_start_estimate: Au::zero(),
                line_left: Au::zero(),
                line_right: inline_size,
            }],
        }
    }

    fn cb(&self) -> CbInfo {
        *self.cb_stack.last().expect("BFC containing-block stack underflow")
    }

    /// Whether a box with these models can have its own margins collapse
    /// through it: auto or zero block size and no content of its own.
    fn can_collapse_through(tree: &BoxTree, box_id: BoxId, models: &BoxModels) -> bool {
        if tree[box_id].is_bfc_root() || tree[box_id].is_float() {
            return false;
        }
        let size_permits = match models.block {
            AuOrAuto::Auto => true,
            AuOrAuto::Length(size) => size == Au::zero(),
        };
        if !size_permits {
            return false;
        }
        match tree[box_id].kind {
            BoxKind::BlockContainer(ref children) => children.is_empty(),
            BoxKind::InlineContainer(ref ifc) => !ifc.has_text_content(),
        }
    }

    /// Open a box: collapse or break the margin run, queue the start event,
    /// and (for a block container of inlines) run text layout at the
    /// already-collapsed position.
    fn box_start(
        &mut self,
        tree: &mut BoxTree,
        box_id: BoxId,
        models: &BoxModels,
        avoid_floats: Option<LogicalVec2<Au>>,
    ) {
        let clear = tree[box_id].style.clear;
        let pbm = &models.pbm;
        let start_margin = CollapsedMargin::new(pbm.margin.block_start.auto_is(Au::zero));
        let bp_start = pbm.border.block_start + pbm.padding.block_start;
        let depth = self.level + 1;

        // Clearance (CSS 2.2 § 9.5.2): required when the hypothetical
        // collapsed position would overlap a float on a cleared side. An
        // independent formatting context additionally may not overlap any
        // float, cleared or not.
        let hypothetical = self.cursor + self.margin.collection.adjoin(&start_margin).solve();
        let mut float_bottom = self.fctx.clear_position(clear);
        if let Some(size) = avoid_floats {
            let cb = self.cb();
            let fit = self.fctx.find_line_position(
                float_bottom.unwrap_or(hypothetical).max(hypothetical),
                size.block,
                size.inline,
                (cb.line_left, cb.line_right),
            );
            if fit.block_offset > hypothetical {
                float_bottom = Some(fit.block_offset);
            }
        }
        let clearance = match float_bottom {
            Some(bottom) if bottom > hypothetical => bottom - hypothetical,
            _ => Au::zero(),
        };

        let adjoins_previous = clearance == Au::zero();
        if adjoins_previous {
            self.margin.collection.adjoin_assign(&start_margin);
        } else {
            trace!("clearance of {:?} before {:?}", clearance, box_id);
            self.position_pending_boxes(tree);
            let bottom = float_bottom.expect("clearance without a float bottom");
            self.margin = MarginRun {
                collection: CollapsedMargin::new(bottom - self.cursor),
                level: self.level,
                clearance_at: None,
            };
            if Self::can_collapse_through(tree, box_id, models) {
                self.margin.clearance_at = Some(depth);
            }
        }

        self.level = depth;
        let outer_cb = self.cb();
        let content_line_left = outer_cb.line_left +
            models.inline.margin_line_left +
            pbm.border.line_left +
            pbm.padding.line_left;
        self.cb_stack.push(CbInfo {
            block_start_estimate: self.cursor + self.margin.collection.solve() + bp_start,
            line_left: content_line_left,
            line_right: content_line_left + models.inline.inline_size,
        });
        self.pending.push(PendingEvent::Start {
            box_id,
            level: depth,
            bp_start,
        });
        self.last = Some(Last::Start);

        if tree[box_id].is_inline_container() && !tree[box_id].is_bfc_root() {
            // Text layout must see the collapsed position, but line boxes
            // stay container-relative and shift with the box when pending
            // boxes are positioned later; the cursor is restored afterward.
            // (A BFC-root inline container laid its text out in its own
            // context already.)
            let advance = bp_start + self.margin.collection.solve();
            self.cursor += advance;
            self.fctx.set_ceiling_from_non_floats(self.cursor);
            let origin = LogicalVec2 {
                inline: self.cb().line_left,
                block: self.cursor,
            };
            layout_inline_content(tree, box_id, &mut self.fctx, origin, models.inline.inline_size);
            self.cursor -= advance;
        }

        let adjoins_next = pbm.padding.block_start == Au::zero() &&
            pbm.border.block_start == Au::zero() &&
            !tree[box_id].is_bfc_root();
        if !adjoins_next {
            self.position_pending_boxes(tree);
            self.margin = MarginRun::empty_at(self.level);
        }
    }

    /// Close a box: decide whether its end margin keeps the run alive,
    /// queue the end event, and merge the end margin.
    fn box_end(&mut self, tree: &mut BoxTree, box_id: BoxId, models: &BoxModels) {
        let depth = self.level;
        assert!(depth > 0, "box_end without a matching box_start");
        let mode = tree[box_id].style.writing_mode;
        let pbm = &models.pbm;

        let clearance_blocks = self
            .margin
            .clearance_at
            .is_some_and(|level| level >= depth);
        let mut adjoins = pbm.padding.block_end == Au::zero() &&
            pbm.border.block_end == Au::zero() &&
            !clearance_blocks &&
            !tree[box_id].is_bfc_root();
        let mut collapsed_through = false;
        if adjoins {
            if self.last == Some(Last::Start) {
                collapsed_through = Self::can_collapse_through(tree, box_id, models);
                adjoins = collapsed_through;
            } else {
                adjoins = models.block.is_auto();
            }
        }

        // An inline container's content size is known now (its paragraph is
        // laid out); write it eagerly so the drain sees a definite size.
        let content_block_size = match models.block {
            AuOrAuto::Length(size) => Some(size),
            AuOrAuto::Auto => {
                let paragraph_size = match tree[box_id].kind {
                    BoxKind::InlineContainer(ref ifc) => Some(
                        ifc.paragraph
                            .as_ref()
                            .expect("inline container closed before text layout")
                            .block_size,
                    ),
                    BoxKind::BlockContainer(_) => None,
                };
                if let Some(size) = paragraph_size {
                    write_block_sizes(
                        tree,
                        box_id,
                        mode,
                        size,
                        pbm.padding.block_sum(),
                        pbm.border.block_sum(),
                    );
                }
                paragraph_size
            },
        };

        self.pending.push(PendingEvent::End {
            box_id,
            level: depth,
            content_block_size,
            padding_sum: pbm.padding.block_sum(),
            border_sum: pbm.border.block_sum(),
            end_adjoins: adjoins,
        });
        self.level -= 1;
        self.cb_stack.pop();

        if !adjoins {
            self.position_pending_boxes(tree);
            self.margin = MarginRun::empty_at(self.level);
        }
        if collapsed_through {
            // The box's final position must be where it would have landed
            // with the run as it stands now, before later margins join it.
            self.hypotheticals
                .insert(box_id, self.margin.collection.solve());
        }
        let end_margin = CollapsedMargin::new(pbm.margin.block_end.auto_is(Au::zero));
        self.margin.collection.adjoin_assign(&end_margin);
        if self.margin.level > self.level {
            // The margin has collapsed into a shallower ancestor's flow.
            self.margin.level = self.level;
        }
        self.last = Some(Last::End);
    }

    /// Drain the deferred event stack, assigning block positions now that
    /// the collapsing run covering these boxes is fully known.
    fn position_pending_boxes(&mut self, tree: &mut BoxTree) {
        let events = std::mem::take(&mut self.pending);
        if events.is_empty() {
            return;
        }
        let margin_value = self.margin.collection.solve();
        trace!(
            "positioning {} deferred events, run {:?} at level {}",
            events.len(),
            margin_value,
            self.margin.level,
        );
        // The run materializes exactly once along any open ancestor chain:
        // at the first start event of the batch, and again after a planted
        // box closes with zero extent (the run continues past it).
        let mut planted: Option<usize> = None;
        let mut consumed = false;

        for event in events {
            match event {
                PendingEvent::Start {
                    box_id,
                    level,
                    bp_start,
                } => {
                    debug_assert_eq!(self.size_stack.len(), level);
                    let mut rel = self.size_stack[level - 1];
                    if planted.is_none() && !consumed {
                        rel += margin_value;
                        if let Some(&hypothetical) = self.hypotheticals.get(&box_id) {
                            rel -= margin_value - hypothetical;
                        }
                        planted = Some(level);
                    }
                    let mode = tree[box_id].style.writing_mode;
                    tree[box_id].border_area.set_block_start(mode, rel);
                    let parent_offset = self.offset_stack[level - 1];
                    self.size_stack.push(Au::zero());
                    self.offset_stack.push(parent_offset + rel + bp_start);
                    self.rel_stack.push(rel);
                    self.cursor = parent_offset + rel + bp_start;
                },
                PendingEvent::End {
                    box_id,
                    level,
                    content_block_size,
                    padding_sum,
                    border_sum,
                    end_adjoins,
                } => {
                    let child_flow = self.size_stack.pop().expect("size stack underflow");
                    self.offset_stack.pop().expect("offset stack underflow");
                    let rel = self.rel_stack.pop().expect("rel stack underflow");
                    let content = match content_block_size {
                        Some(size) => size,
                        None => {
                            let mut content = child_flow;
                            // A run pending in this box's own flow is part
                            // of its auto height (CSS 2.2 § 10.6.3: the
                            // child's end margin does not collapse out).
                            if !consumed && self.margin.level == level {
                                content += margin_value;
                                consumed = true;
                            }
                            let mode = tree[box_id].style.writing_mode;
                            write_block_sizes(tree, box_id, mode, content, padding_sum, border_sum);
                            content
                        },
                    };
                    let border_box = padding_sum + border_sum + content;
                    let parent_size = &mut self.size_stack[level - 1];
                    if planted == Some(level) {
                        planted = None;
                        // A zero-extent box whose end margin stayed in the
                        // run leaves the running size untouched: the run is
                        // still pending for whatever follows it.
                        if border_box != Au::zero() || !end_adjoins {
                            *parent_size = rel + border_box;
                        }
                    } else {
                        *parent_size = rel + border_box;
                    }
                    self.cursor = self.offset_stack[level - 1] + self.size_stack[level - 1];
                },
            }
        }
        self.fctx.set_ceiling_from_non_floats(self.cursor);
    }

    /// Close out a BFC root: run the last deferred batch and report the
    /// content block size its auto size resolves to.
    fn finalize(&mut self, tree: &mut BoxTree, inline_content_size: Option<Au>) -> Au {
        assert_eq!(
            self.level, 0,
            "finalize with {} boxes still open",
            self.level
        );
        self.position_pending_boxes(tree);
        // Unlike a mid-flow box, a BFC root's auto size includes the
        // trailing margin run and any float overhang (CSS 2.2 § 10.6.7).
        let flow_end = self.cursor + self.margin.collection.solve();
        let float_end = self.fctx.lowest_float_bottom().unwrap_or_else(Au::zero);
        flow_end
            .max(float_end)
            .max(inline_content_size.unwrap_or_else(Au::zero))
    }

    /// Size, place, and record one float child encountered in block context.
    fn place_float_box(&mut self, tree: &mut BoxTree, float_id: BoxId) {
        let info = float_placement_info(tree, float_id);
        // Rule 6: the float may not be above the current flow position.
        self.fctx
            .set_ceiling_from_non_floats(self.cursor + self.margin.collection.solve());
        let margin_origin = match self.fctx.place_float(Au::zero(), true, &info) {
            FloatPlacement::Placed(origin) => origin,
            FloatPlacement::Deferred => {
                unreachable!("block-context float placement never defers")
            },
        };
        let cb = self.cb();
        commit_float_position(tree, float_id, margin_origin, cb.block_start_estimate, cb.line_left);
    }

}

/// Write the three block sizes of a box given its content block size.
fn write_block_sizes(
    tree: &mut BoxTree,
    box_id: BoxId,
    mode: WritingMode,
    content: Au,
    padding_sum: Au,
    border_sum: Au,
) {
    let node = &mut tree[box_id];
    node.content_area.set_block_size(mode, content);
    node.padding_area.set_block_size(mode, content + padding_sum);
    node.border_area
        .set_block_size(mode, content + padding_sum + border_sum);
}

/// The margin-box placement request for an already-sized float.
fn float_placement_info(tree: &BoxTree, float_id: BoxId) -> PlacementInfo {
    let node = &tree[float_id];
    assert!(node.is_float(), "placement info requested for a non-float");
    let mode = node.style.writing_mode;
    let cb = node
        .containing_block
        .expect("float placed before containing block assignment");
    let cb_inline_size = tree.area(cb).inline_size(mode);
    let pbm = node.style.padding_border_margin(cb_inline_size);
    let border_box = LogicalVec2 {
        inline: tree[float_id].border_area.inline_size(mode),
        block: tree[float_id].border_area.block_size(mode),
    };
    PlacementInfo {
        size: LogicalVec2 {
            inline: border_box.inline +
                pbm.margin.line_left.auto_is(Au::zero) +
                pbm.margin.line_right.auto_is(Au::zero),
            block: border_box.block +
                pbm.margin.block_start.auto_is(Au::zero) +
                pbm.margin.block_end.auto_is(Au::zero),
        },
        side: FloatSide::from_style(&node.style).expect("float box without a float side"),
        clear: node.style.clear,
    }
}

/// Convert a placed float's BFC-relative margin-box origin into
/// containing-block-relative border-box offsets and write them.
fn commit_float_position(
    tree: &mut BoxTree,
    float_id: BoxId,
    margin_origin: LogicalVec2<Au>,
    cb_block_start: Au,
    cb_line_left: Au,
) {
    let mode = tree[float_id].style.writing_mode;
    let cb = tree[float_id]
        .containing_block
        .expect("float positioned before containing block assignment");
    let cb_inline_size = tree.area(cb).inline_size(mode);
    let pbm = tree[float_id].style.padding_border_margin(cb_inline_size);
    let rel_block =
        margin_origin.block - cb_block_start + pbm.margin.block_start.auto_is(Au::zero);
    let rel_inline =
        margin_origin.inline - cb_line_left + pbm.margin.line_left.auto_is(Au::zero);
    let node = &mut tree[float_id];
    node.border_area.set_block_start(mode, rel_block);
    node.border_area.set_line_left(mode, rel_inline);
}

// ---------------------------------------------------------------------------
// Box model resolvers
// ---------------------------------------------------------------------------

/// Solve the inline axis for an in-flow block-level box
/// (CSS 2.2 § 10.3.3) and write the box's inline geometry.
///
/// Handles auto inline size, one or two auto margins, and over-constrained
/// values (the excess is absorbed by the trailing margin in the box's
/// direction, which may go negative).
fn solve_inline_box_model(tree: &mut BoxTree, box_id: BoxId) -> (PaddingBorderMargin, InlineBoxModel) {
    assert!(
        !tree[box_id].is_float(),
        "block-level inline resolution invoked on a float"
    );
    let cb = tree[box_id]
        .containing_block
        .expect("inline box model resolution before containing block assignment");
    let style = tree[box_id].style.clone();
    let mode = style.writing_mode;
    let cb_inline = tree.area(cb).inline_size(mode);
    let pbm = style.padding_border_margin(cb_inline);
    let min_inline = style
        .min_box_size(mode)
        .inline
        .percentage_relative_to(cb_inline)
        .auto_is(Au::zero);
    let max_inline = style
        .max_box_size(mode)
        .inline
        .map(|lp| lp.resolve(cb_inline));

    let ltr = mode.is_bidi_ltr();
    let solve_margins = |inline_size: Au| -> (Au, Au) {
        let available = cb_inline - pbm.padding_border_sums.inline - inline_size;
        match (pbm.margin.line_left, pbm.margin.line_right) {
            (AuOrAuto::Auto, AuOrAuto::Auto) => {
                if available >= Au::zero() {
                    (available / 2, available - available / 2)
                } else if ltr {
                    (Au::zero(), available)
                } else {
                    (available, Au::zero())
                }
            },
            (AuOrAuto::Auto, AuOrAuto::Length(right)) => (available - right, right),
            (AuOrAuto::Length(left), AuOrAuto::Auto) => (left, available - left),
            (AuOrAuto::Length(left), AuOrAuto::Length(right)) => {
                // Over-constrained; the trailing margin takes the slack.
                if ltr {
                    (left, available - left)
                } else {
                    (available - right, right)
                }
            },
        }
    };

    let (mut inline_size, mut margins) = match style
        .box_size(mode)
        .inline
        .percentage_relative_to(cb_inline)
    {
        AuOrAuto::Length(size) => (size, solve_margins(size)),
        AuOrAuto::Auto => {
            let margin_line_left = pbm.margin.line_left.auto_is(Au::zero);
            let margin_line_right = pbm.margin.line_right.auto_is(Au::zero);
            let size = cb_inline -
                pbm.padding_border_sums.inline -
                margin_line_left -
                margin_line_right;
            (size, (margin_line_left, margin_line_right))
        },
    };
    // CSS 2.2 § 10.4: clamp, then solve again with the clamped value.
    if let Some(max_inline) = max_inline {
        if inline_size > max_inline {
            inline_size = max_inline;
            margins = solve_margins(inline_size);
        }
    }
    if inline_size < min_inline {
        inline_size = min_inline;
        margins = solve_margins(inline_size);
    }

    write_inline_geometry(tree, box_id, cb, &pbm, inline_size, margins.0);
    (
        pbm,
        InlineBoxModel {
            inline_size,
            margin_line_left: margins.0,
            margin_line_right: margins.1,
        },
    )
}

/// Write a box's inline geometry and area parent links given its resolved
/// content inline size and line-left margin.
fn write_inline_geometry(
    tree: &mut BoxTree,
    box_id: BoxId,
    cb: AreaRef,
    pbm: &PaddingBorderMargin,
    inline_size: Au,
    margin_line_left: Au,
) {
    let mode = tree[box_id].style.writing_mode;
    let node = &mut tree[box_id];
    node.border_area.parent = Some(cb);
    node.padding_area.parent = Some(AreaRef::Area(box_id, AreaKind::Border));
    node.content_area.parent = Some(AreaRef::Area(box_id, AreaKind::Padding));

    node.border_area.set_line_left(mode, margin_line_left);
    node.border_area
        .set_inline_size(mode, inline_size + pbm.padding_border_sums.inline);
    node.padding_area.set_line_left(mode, pbm.border.line_left);
    node.padding_area.set_block_start(mode, pbm.border.block_start);
    node.padding_area
        .set_inline_size(mode, inline_size + pbm.padding.inline_sum());
    node.content_area.set_line_left(mode, pbm.padding.line_left);
    node.content_area.set_block_start(mode, pbm.padding.block_start);
    node.content_area.set_inline_size(mode, inline_size);
}

/// Resolve the block axis. Definite sizes (after min/max clamping) are
/// written immediately; `Auto` is left to the collapsing machinery and
/// `finalize`.
fn solve_block_box_model(tree: &mut BoxTree, box_id: BoxId, pbm: &PaddingBorderMargin) -> AuOrAuto {
    let cb = tree[box_id]
        .containing_block
        .expect("block box model resolution before containing block assignment");
    let style = tree[box_id].style.clone();
    let mode = style.writing_mode;
    let basis = {
        let area = tree.area(cb);
        if area.has_block_size(mode) {
            Some(area.block_size(mode))
        } else {
            None
        }
    };
    let block = style
        .box_size(mode)
        .block
        .maybe_percentage_relative_to(basis);
    match block {
        AuOrAuto::Auto => AuOrAuto::Auto,
        AuOrAuto::Length(size) => {
            let size = clamp_block_size(&style, basis, size);
            write_block_sizes(
                tree,
                box_id,
                mode,
                size,
                pbm.padding.block_sum(),
                pbm.border.block_sum(),
            );
            AuOrAuto::Length(size)
        },
    }
}

fn clamp_block_size(style: &crate::style::ComputedStyle, basis: Option<Au>, size: Au) -> Au {
    let mode = style.writing_mode;
    let min = style
        .min_box_size(mode)
        .block
        .maybe_percentage_relative_to(basis)
        .non_auto()
        .unwrap_or_else(Au::zero);
    let max = style
        .max_box_size(mode)
        .block
        .and_then(|lp| lp.maybe_resolve(basis));
    let size = match max {
        Some(max) => size.min(max),
        None => size,
    };
    size.max(min)
}

// ---------------------------------------------------------------------------
// Layout drivers
// ---------------------------------------------------------------------------

/// Lay out one in-flow block-level box inside an ongoing block formatting
/// context: assign its containing block, resolve both box-model axes, then
/// walk its children between `box_start` and `box_end`.
pub(crate) fn layout_block_box(
    tree: &mut BoxTree,
    ctx: &LayoutContext,
    bfc: &mut BlockFormattingContext,
    box_id: BoxId,
    cb: AreaRef,
    abs_cb: AreaRef,
) {
    assert!(
        !tree[box_id].is_float(),
        "layout_block_box invoked on a float"
    );
    if let Some(parent) = tree[box_id].parent {
        assert_eq!(
            tree[parent].style.writing_mode, tree[box_id].style.writing_mode,
            "orthogonal writing modes are not supported"
        );
    }
    if tree[box_id].flags.contains(BoxFlags::LOGGING) {
        debug!("layout_block_box {:?}", box_id);
    }
    tree[box_id].containing_block = Some(cb);
    let (pbm, inline_model) = solve_inline_box_model(tree, box_id);
    let block = solve_block_box_model(tree, box_id, &pbm);
    let mut models = BoxModels {
        pbm,
        inline: inline_model,
        block,
    };
    let child_abs_cb = if tree[box_id].style.position.is_positioned() {
        AreaRef::Area(box_id, AreaKind::Padding)
    } else {
        abs_cb
    };
    let content_area = AreaRef::Area(box_id, AreaKind::Content);

    if tree[box_id].is_bfc_root() {
        // Its interior is independent of the outer flow, so it can be laid
        // out before being placed; the outer flow then knows its size and
        // can keep it from overlapping outer floats.
        let content = layout_independent_flow(tree, ctx, box_id, child_abs_cb);
        let resolved = match models.block {
            AuOrAuto::Length(size) => size,
            AuOrAuto::Auto => {
                let mode = tree[box_id].style.writing_mode;
                let style = tree[box_id].style.clone();
                let basis = {
                    let area = tree.area(cb);
                    if area.has_block_size(mode) {
                        Some(area.block_size(mode))
                    } else {
                        None
                    }
                };
                let clamped = clamp_block_size(&style, basis, content);
                write_block_sizes(
                    tree,
                    box_id,
                    mode,
                    clamped,
                    models.pbm.padding.block_sum(),
                    models.pbm.border.block_sum(),
                );
                clamped
            },
        };
        models.block = AuOrAuto::Length(resolved);
        let margin_box = LogicalVec2 {
            inline: models.inline.inline_size +
                models.pbm.padding_border_sums.inline +
                models.inline.margin_line_left +
                models.inline.margin_line_right,
            block: resolved +
                models.pbm.padding_border_sums.block +
                models.pbm.margin.block_start.auto_is(Au::zero) +
                models.pbm.margin.block_end.auto_is(Au::zero),
        };
        bfc.box_start(tree, box_id, &models, Some(margin_box));
        bfc.box_end(tree, box_id, &models);
    } else {
        if tree[box_id].is_inline_container() {
            // Floats among the inline items need sizes before text layout
            // can place them.
            let floats: Vec<BoxId> = match tree[box_id].kind {
                BoxKind::InlineContainer(ref ifc) => ifc.float_children().collect(),
                BoxKind::BlockContainer(_) => unreachable!(),
            };
            for float_id in floats {
                layout_float_box(tree, ctx, float_id, content_area, child_abs_cb);
            }
        }
        bfc.box_start(tree, box_id, &models, None);
        let children: Vec<BoxId> = tree[box_id].children().to_vec();
        for child in children {
            if tree[child].is_float() {
                layout_float_box(tree, ctx, child, content_area, child_abs_cb);
                bfc.place_float_box(tree, child);
            } else {
                layout_block_box(tree, ctx, bfc, child, content_area, child_abs_cb);
            }
        }
        bfc.box_end(tree, box_id, &models);
    }
}

/// Lay out the interior of a box that establishes its own block formatting
/// context and return its content block size. The box's inline geometry
/// must already be resolved.
pub(crate) fn layout_independent_flow(
    tree: &mut BoxTree,
    ctx: &LayoutContext,
    box_id: BoxId,
    abs_cb: AreaRef,
) -> Au {
    assert!(
        tree[box_id].is_bfc_root(),
        "independent flow layout on a box that does not establish a BFC"
    );
    let mode = tree[box_id].style.writing_mode;
    let content_inline = tree[box_id].content_area.inline_size(mode);
    let content_area = AreaRef::Area(box_id, AreaKind::Content);
    let mut bfc = BlockFormattingContext::new(content_inline);

    if tree[box_id].is_inline_container() {
        let floats: Vec<BoxId> = match tree[box_id].kind {
            BoxKind::InlineContainer(ref ifc) => ifc.float_children().collect(),
            BoxKind::BlockContainer(_) => unreachable!(),
        };
        for float_id in floats {
            layout_float_box(tree, ctx, float_id, content_area, abs_cb);
        }
        let paragraph_size = layout_inline_content(
            tree,
            box_id,
            &mut bfc.fctx,
            LogicalVec2::zero(),
            content_inline,
        );
        bfc.finalize(tree, Some(paragraph_size))
    } else {
        let children: Vec<BoxId> = tree[box_id].children().to_vec();
        for child in children {
            if tree[child].is_float() {
                layout_float_box(tree, ctx, child, content_area, abs_cb);
                bfc.place_float_box(tree, child);
            } else {
                layout_block_box(tree, ctx, &mut bfc, child, content_area, abs_cb);
            }
        }
        bfc.finalize(tree, None)
    }
}

/// Run text layout for a block container of inlines whose content box
/// starts at `origin` (BFC coordinates), committing any floats the lines
/// place. Returns the paragraph's block extent.
fn layout_inline_content(
    tree: &mut BoxTree,
    box_id: BoxId,
    fctx: &mut FloatContext,
    origin: LogicalVec2<Au>,
    inline_size: Au,
) -> Au {
    let (items, line_height) = match tree[box_id].kind {
        BoxKind::InlineContainer(ref ifc) => (ifc.items.clone(), ifc.line_height),
        BoxKind::BlockContainer(_) => {
            unreachable!("text layout on a block container of blocks")
        },
    };
    let mut float_infos: FxHashMap<BoxId, PlacementInfo> = FxHashMap::default();
    for item in &items {
        if let inline::InlineItem::Float(float_id) = *item {
            float_infos.insert(float_id, float_placement_info(tree, float_id));
        }
    }
    let (paragraph, placed) = inline::layout_text(
        &items,
        line_height,
        fctx,
        origin,
        inline_size,
        &|float_id| float_infos[&float_id].clone(),
    );
    for (float_id, margin_origin) in placed {
        commit_float_position(tree, float_id, margin_origin, origin.block, origin.inline);
    }
    let block_size = paragraph.block_size;
    match tree[box_id].kind {
        BoxKind::InlineContainer(ref mut ifc) => ifc.paragraph = Some(paragraph),
        BoxKind::BlockContainer(_) => unreachable!(),
    }
    block_size
}

/// Lay out a float: resolve its inline size (shrink-to-fit when auto), lay
/// out its interior in a fresh formatting context, and resolve its block
/// size. Its position is assigned separately, by float placement.
pub(crate) fn layout_float_box(
    tree: &mut BoxTree,
    ctx: &LayoutContext,
    box_id: BoxId,
    cb: AreaRef,
    abs_cb: AreaRef,
) {
    assert!(
        tree[box_id].is_float(),
        "layout_float_box invoked on a box that is not floated"
    );
    assert!(
        tree[box_id].is_bfc_root(),
        "a float must establish its own formatting context"
    );
    tree[box_id].containing_block = Some(cb);
    let style = tree[box_id].style.clone();
    let mode = style.writing_mode;
    let cb_inline = tree.area(cb).inline_size(mode);
    let pbm = style.padding_border_margin(cb_inline);
    let margin_line_left = pbm.margin.line_left.auto_is(Au::zero);
    let margin_line_right = pbm.margin.line_right.auto_is(Au::zero);

    let min_inline = style
        .min_box_size(mode)
        .inline
        .percentage_relative_to(cb_inline)
        .auto_is(Au::zero);
    let max_inline = style
        .max_box_size(mode)
        .inline
        .map(|lp| lp.resolve(cb_inline));
    let mut inline_size = match style
        .box_size(mode)
        .inline
        .percentage_relative_to(cb_inline)
    {
        AuOrAuto::Length(size) => size,
        AuOrAuto::Auto => {
            let available = (cb_inline -
                pbm.padding_border_sums.inline -
                margin_line_left -
                margin_line_right)
                .max(Au::zero());
            content_inline_contribution(tree, box_id).shrink_to_fit(available)
        },
    };
    if let Some(max_inline) = max_inline {
        inline_size = inline_size.min(max_inline);
    }
    inline_size = inline_size.max(min_inline);

    write_inline_geometry(tree, box_id, cb, &pbm, inline_size, margin_line_left);

    let basis = {
        let area = tree.area(cb);
        if area.has_block_size(mode) {
            Some(area.block_size(mode))
        } else {
            None
        }
    };
    let block = style
        .box_size(mode)
        .block
        .maybe_percentage_relative_to(basis);
    match block {
        AuOrAuto::Length(size) => {
            let size = clamp_block_size(&style, basis, size);
            // Write the definite size first: the interior may resolve
            // percentages against it.
            write_block_sizes(
                tree,
                box_id,
                mode,
                size,
                pbm.padding.block_sum(),
                pbm.border.block_sum(),
            );
            layout_independent_flow(tree, ctx, box_id, abs_cb);
        },
        AuOrAuto::Auto => {
            let content = layout_independent_flow(tree, ctx, box_id, abs_cb);
            let clamped = clamp_block_size(&style, basis, content);
            write_block_sizes(
                tree,
                box_id,
                mode,
                clamped,
                pbm.padding.block_sum(),
                pbm.border.block_sum(),
            );
        },
    }
}

/// Lay out the root box against the initial containing block. The root's
/// margins have nothing to collapse with, so it is positioned directly at
/// its margin offsets.
pub(crate) fn layout_root(tree: &mut BoxTree, ctx: &LayoutContext) {
    let root = tree.root();
    assert!(
        tree[root].is_bfc_root(),
        "the root box must establish a block formatting context"
    );
    assert!(!tree[root].is_float(), "the root box may not be floated");
    tree[root].containing_block = Some(AreaRef::InitialContainingBlock);
    let (pbm, _) = solve_inline_box_model(tree, root);
    let block = solve_block_box_model(tree, root, &pbm);
    let mode = tree[root].style.writing_mode;
    let block_start = pbm.margin.block_start.auto_is(Au::zero);
    tree[root].border_area.set_block_start(mode, block_start);
    let content = layout_independent_flow(tree, ctx, root, AreaRef::InitialContainingBlock);
    if block.is_auto() {
        let style = tree[root].style.clone();
        let basis = Some(tree.icb.block_size(mode));
        let clamped = clamp_block_size(&style, basis, content);
        write_block_sizes(
            tree,
            root,
            mode,
            clamped,
            pbm.padding.block_sum(),
            pbm.border.block_sum(),
        );
    }
}

// ---------------------------------------------------------------------------
// Intrinsic contributions
// ---------------------------------------------------------------------------

/// A box's min-/max-content contribution to its parent, margin box
/// (percentages contribute nothing; intrinsic sizing has no definite basis).
pub(crate) fn outer_inline_contribution(tree: &BoxTree, box_id: BoxId) -> ContentSizes {
    let style = &tree[box_id].style;
    let mode = style.writing_mode;
    let mut edges = style.border_width(mode).inline_sum();
    let mut add_lp = |lp: &crate::style::LengthPercentage| {
        if let crate::style::LengthPercentage::Length(length) = *lp {
            edges += length;
        }
    };
    let padding = style.padding(mode);
    add_lp(&padding.line_left);
    add_lp(&padding.line_right);
    let margin = style.margin(mode);
    for side in [margin.line_left, margin.line_right] {
        if let LengthPercentageOrAuto::LengthPercentage(ref lp) = side {
            add_lp(lp);
        }
    }

    let specified = match style.box_size(mode).inline {
        LengthPercentageOrAuto::LengthPercentage(crate::style::LengthPercentage::Length(l)) => {
            Some(l)
        },
        _ => None,
    };
    let mut inner = match specified {
        Some(length) => ContentSizes::definite(length),
        None => content_inline_contribution(tree, box_id),
    };
    if let Some(crate::style::LengthPercentage::Length(max)) = style.max_box_size(mode).inline {
        inner.min_content = inner.min_content.min(max);
        inner.max_content = inner.max_content.min(max);
    }
    if let LengthPercentageOrAuto::LengthPercentage(crate::style::LengthPercentage::Length(min)) =
        style.min_box_size(mode).inline
    {
        inner.min_content = inner.min_content.max(min);
        inner.max_content = inner.max_content.max(min);
    }
    inner.grow_by(edges)
}

/// Content-box intrinsic sizes: max over block children, with consecutive
/// floats accumulated side by side; line-based for inline content.
fn content_inline_contribution(tree: &BoxTree, box_id: BoxId) -> ContentSizes {
    match tree[box_id].kind {
        BoxKind::BlockContainer(ref children) => {
            let mut result = ContentSizes::zero();
            let mut float_run = Au::zero();
            for &child in children {
                let contribution = outer_inline_contribution(tree, child);
                if tree[child].is_float() {
                    float_run += contribution.max_content;
                    result.min_content = result.min_content.max(contribution.min_content);
                    result.max_content = result.max_content.max(float_run);
                } else {
                    float_run = Au::zero();
                    result.max_assign(contribution);
                }
            }
            result
        },
        BoxKind::InlineContainer(ref ifc) => {
            let mut result = ContentSizes::zero();
            let mut segment = Au::zero();
            for item in &ifc.items {
                match *item {
                    inline::InlineItem::Word(advance) => {
                        segment += advance;
                        result.min_content = result.min_content.max(advance);
                    },
                    inline::InlineItem::HardBreak => {
                        result.max_content = result.max_content.max(segment);
                        segment = Au::zero();
                    },
                    inline::InlineItem::Float(float_id) => {
                        let contribution = outer_inline_contribution(tree, float_id);
                        segment += contribution.max_content;
                        result.min_content = result.min_content.max(contribution.min_content);
                    },
                }
            }
            result.max_content = result.max_content.max(segment);
            result
        },
    }
}
