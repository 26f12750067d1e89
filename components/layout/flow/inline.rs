/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The inline formatting context boundary.
//!
//! Shaping, bidi, and font matching happen upstream; by the time layout
//! runs, inline content has been reduced to measured advances. This module
//! packs those advances into lines, asking the float context where each
//! line may go and placing any floats the line encounters, and leaves
//! behind a queryable [`Paragraph`] whose block extent sizes the container.

use app_units::Au;
use euclid::num::Zero;
use log::trace;

use crate::flow::float::{FloatContext, FloatPlacement, Vacancy};
use crate::geom::LogicalVec2;
use crate::tree::BoxId;

/// One pre-measured piece of inline content.
#[derive(Clone, Copy, Debug)]
pub enum InlineItem {
    /// An unbreakable run with the given inline advance.
    Word(Au),
    /// A forced line break.
    HardBreak,
    /// A float originating between the surrounding words.
    Float(BoxId),
}

#[derive(Debug)]
pub struct InlineFormattingContext {
    pub items: Vec<InlineItem>,
    /// Every line box is this tall. Font metrics are resolved upstream.
    pub line_height: Au,
    /// The result of the most recent text layout of this context.
    pub paragraph: Option<Paragraph>,
}

impl InlineFormattingContext {
    pub fn new(items: Vec<InlineItem>, line_height: Au) -> Self {
        Self {
            items,
            line_height,
            paragraph: None,
        }
    }

    /// Whether any rendered text would come out of this context. An inline
    /// container without rendered text can still collapse through.
    pub fn has_text_content(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, InlineItem::Word(_) | InlineItem::HardBreak))
    }

    pub fn float_children(&self) -> impl Iterator<Item = BoxId> + '_ {
        self.items.iter().filter_map(|item| match item {
            InlineItem::Float(id) => Some(*id),
            _ => None,
        })
    }
}

/// A positioned line box, relative to the container's content area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineBox {
    pub block_offset: Au,
    pub line_left: Au,
    pub inline_size: Au,
    pub block_size: Au,
}

/// What text layout leaves behind for the container to query.
#[derive(Clone, Debug, Default)]
pub struct Paragraph {
    pub lines: Vec<LineBox>,
    /// Total block extent of the line boxes.
    pub block_size: Au,
}

struct OpenLine {
    vacancy: Vacancy,
    used: Au,
}

/// The engine's half of the text-layout contract: the container's content
/// box is already positioned (`origin`, BFC coordinates) and sized
/// (`inline_size`); floats among the items are already laid out but not yet
/// positioned. Returns the paragraph and the floats placed, as
/// (float, margin-box origin in BFC coordinates) pairs.
pub(crate) fn layout_text(
    ifc_items: &[InlineItem],
    line_height: Au,
    fctx: &mut FloatContext,
    origin: LogicalVec2<Au>,
    inline_size: Au,
    float_sizes: &dyn Fn(BoxId) -> crate::flow::float::PlacementInfo,
) -> (Paragraph, Vec<(BoxId, LogicalVec2<Au>)>) {
    let mut paragraph = Paragraph::default();
    let mut placed_floats = Vec::new();
    let mut block_cursor = Au::zero();
    let mut line: Option<OpenLine> = None;
    let walls = (origin.inline, origin.inline + inline_size);

    let close_line = |line: &mut Option<OpenLine>,
                          block_cursor: &mut Au,
                          paragraph: &mut Paragraph,
                          fctx: &mut FloatContext,
                          placed: &mut Vec<(BoxId, LogicalVec2<Au>)>| {
        let open = match line.take() {
            Some(open) => open,
            None => return,
        };
        let line_box = LineBox {
            block_offset: open.vacancy.block_offset - origin.block,
            line_left: open.vacancy.line_left - origin.inline,
            inline_size: open.used,
            block_size: line_height,
        };
        trace!("line box {:?}", line_box);
        *block_cursor = line_box.block_offset + line_height;
        paragraph.lines.push(line_box);

        // Floats that did not fit beside this line go below it.
        let line_bottom = origin.block + *block_cursor;
        for (float_box, info) in fctx.take_misfits() {
            fctx.set_ceiling_from_non_floats(line_bottom);
            match fctx.place_float(Au::zero(), true, &info) {
                FloatPlacement::Placed(margin_origin) => placed.push((float_box, margin_origin)),
                FloatPlacement::Deferred => {
                    unreachable!("float placement on an empty line never defers")
                },
            }
        }
    };

    for item in ifc_items {
        match *item {
            InlineItem::Word(advance) => {
                if let Some(ref mut open) = line {
                    if open.used + advance <= open.vacancy.inline_size() {
                        open.used += advance;
                        continue;
                    }
                    close_line(
                        &mut line,
                        &mut block_cursor,
                        &mut paragraph,
                        fctx,
                        &mut placed_floats,
                    );
                }
                let vacancy = fctx.find_line_position(
                    origin.block + block_cursor,
                    line_height,
                    advance,
                    walls,
                );
                line = Some(OpenLine {
                    vacancy,
                    used: advance,
                });
            },
            InlineItem::HardBreak => {
                if line.is_none() {
                    // A forced break on an empty line still produces a line.
                    let vacancy = fctx.find_line_position(
                        origin.block + block_cursor,
                        line_height,
                        Au::zero(),
                        walls,
                    );
                    line = Some(OpenLine {
                        vacancy,
                        used: Au::zero(),
                    });
                }
                close_line(
                    &mut line,
                    &mut block_cursor,
                    &mut paragraph,
                    fctx,
                    &mut placed_floats,
                );
            },
            InlineItem::Float(float_box) => {
                let info = float_sizes(float_box);
                let (line_width, line_is_empty, line_offset) = match line {
                    Some(ref open) => (open.used, open.used == Au::zero(), open.vacancy.block_offset),
                    None => (Au::zero(), true, origin.block + block_cursor),
                };
                if fctx.has_pending_misfits() {
                    fctx.queue_misfit(float_box, info);
                    continue;
                }
                fctx.set_ceiling_from_non_floats(line_offset);
                match fctx.place_float(line_width, line_is_empty, &info) {
                    FloatPlacement::Placed(margin_origin) => {
                        placed_floats.push((float_box, margin_origin));
                        // The float may have eaten into the line being built.
                        if let Some(ref mut open) = line {
                            open.vacancy = fctx
                                .vacancy_for_box(
                                    open.vacancy.block_offset,
                                    LogicalVec2 {
                                        inline: Au::zero(),
                                        block: line_height,
                                    },
                                )
                                .clamped_to(walls);
                        }
                    },
                    FloatPlacement::Deferred => fctx.queue_misfit(float_box, info),
                }
            },
        }
    }
    close_line(
        &mut line,
        &mut block_cursor,
        &mut paragraph,
        fctx,
        &mut placed_floats,
    );
    debug_assert!(
        !fctx.has_pending_misfits(),
        "misfit floats survived the paragraph"
    );

    paragraph.block_size = block_cursor;
    (paragraph, placed_floats)
}
