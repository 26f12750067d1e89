/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Small builders so tests read as trees, not arena plumbing.

use std::sync::Arc;

use app_units::Au;
use layout::flow::inline::{InlineFormattingContext, InlineItem, Paragraph};
use layout::geom::{PhysicalRect, PhysicalSize};
use layout::style::{ComputedStyle, Float, LengthPercentage, LengthPercentageOrAuto};
use layout::tree::{BoxFlags, BoxId, BoxKind, BoxTree};

pub fn px(value: i32) -> Au {
    Au::from_px(value)
}

pub fn style(build: impl FnOnce(&mut ComputedStyle)) -> Arc<ComputedStyle> {
    let mut style = ComputedStyle::default();
    build(&mut style);
    Arc::new(style)
}

pub fn length(value: f32) -> LengthPercentageOrAuto {
    LengthPercentageOrAuto::px(value)
}

pub fn percent(fraction: f32) -> LengthPercentageOrAuto {
    LengthPercentageOrAuto::LengthPercentage(LengthPercentage::Percentage(fraction))
}

pub fn block(tree: &mut BoxTree, style: Arc<ComputedStyle>, children: Vec<BoxId>) -> BoxId {
    tree.add_box(style, BoxFlags::empty(), BoxKind::BlockContainer(children))
}

pub fn bfc_root(tree: &mut BoxTree, style: Arc<ComputedStyle>, children: Vec<BoxId>) -> BoxId {
    tree.add_box(style, BoxFlags::BFC_ROOT, BoxKind::BlockContainer(children))
}

pub fn float_box(tree: &mut BoxTree, style: Arc<ComputedStyle>, children: Vec<BoxId>) -> BoxId {
    assert!(style.float != Float::None, "float_box needs a float style");
    tree.add_box(
        style,
        BoxFlags::FLOAT | BoxFlags::BFC_ROOT,
        BoxKind::BlockContainer(children),
    )
}

pub fn float_text(
    tree: &mut BoxTree,
    style: Arc<ComputedStyle>,
    items: Vec<InlineItem>,
    line_height: i32,
) -> BoxId {
    assert!(style.float != Float::None, "float_text needs a float style");
    tree.add_box(
        style,
        BoxFlags::FLOAT | BoxFlags::BFC_ROOT,
        BoxKind::InlineContainer(InlineFormattingContext::new(items, px(line_height))),
    )
}

pub fn text(
    tree: &mut BoxTree,
    style: Arc<ComputedStyle>,
    items: Vec<InlineItem>,
    line_height: i32,
) -> BoxId {
    tree.add_box(
        style,
        BoxFlags::empty(),
        BoxKind::InlineContainer(InlineFormattingContext::new(items, px(line_height))),
    )
}

pub fn words(advances: &[i32]) -> Vec<InlineItem> {
    advances.iter().map(|&a| InlineItem::Word(px(a))).collect()
}

/// Set the root and run a full layout against the given viewport.
pub fn finish(tree: &mut BoxTree, root: BoxId, viewport: (i32, i32)) {
    tree.set_root(root);
    layout::layout(tree, PhysicalSize::new(px(viewport.0), px(viewport.1)));
}

pub fn border_rect(tree: &BoxTree, id: BoxId) -> PhysicalRect {
    tree.physical_border_rect(id)
}

pub fn paragraph(tree: &BoxTree, id: BoxId) -> Paragraph {
    match tree[id].kind {
        BoxKind::InlineContainer(ref ifc) => ifc
            .paragraph
            .clone()
            .expect("no paragraph was laid out for this box"),
        BoxKind::BlockContainer(_) => panic!("paragraph requested for a block container of blocks"),
    }
}
