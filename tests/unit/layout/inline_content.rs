/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Line packing through the inline-collaborator boundary.

use layout::flow::inline::InlineItem;
use layout::style::Float;
use layout::tree::BoxTree;

use crate::helpers::*;

#[test]
fn words_wrap_at_the_container_edge() {
    let mut tree = BoxTree::new();
    let para = text(&mut tree, style(|_| {}), words(&[60, 60, 60]), 20);
    let root = bfc_root(&mut tree, style(|_| {}), vec![para]);
    finish(&mut tree, root, (100, 400));

    let lines = paragraph(&tree, para).lines;
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1].block_offset, px(20));
    assert_eq!(lines[2].block_offset, px(40));
    assert_eq!(border_rect(&tree, para).size.height, px(60));
}

#[test]
fn hard_break_forces_a_new_line() {
    let mut tree = BoxTree::new();
    let mut items = words(&[40]);
    items.push(InlineItem::HardBreak);
    items.extend(words(&[40]));
    let para = text(&mut tree, style(|_| {}), items, 20);
    let root = bfc_root(&mut tree, style(|_| {}), vec![para]);
    finish(&mut tree, root, (200, 400));

    let lines = paragraph(&tree, para).lines;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].inline_size, px(40));
    assert_eq!(lines[1].block_offset, px(20));
    assert_eq!(border_rect(&tree, root).size.height, px(40));
}

#[test]
fn inline_container_without_text_collapses_through() {
    let mut tree = BoxTree::new();
    let para = text(
        &mut tree,
        style(|s| {
            s.margin.top = length(10.0);
            s.margin.bottom = length(10.0);
        }),
        vec![],
        20,
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![para]);
    finish(&mut tree, root, (100, 400));

    assert_eq!(border_rect(&tree, para).size.height, px(0));
    assert_eq!(border_rect(&tree, root).size.height, px(10));
}

#[test]
fn float_that_misses_the_line_goes_below_it() {
    let mut tree = BoxTree::new();
    let float = float_box(
        &mut tree,
        style(|s| {
            s.float = Float::Left;
            s.width = length(30.0);
            s.height = length(30.0);
        }),
        vec![],
    );
    let mut items = words(&[80]);
    items.push(InlineItem::Float(float));
    items.extend(words(&[60]));
    let para = text(&mut tree, style(|_| {}), items, 20);
    let root = bfc_root(&mut tree, style(|_| {}), vec![para]);
    finish(&mut tree, root, (100, 400));

    // No room beside the 80px line, so the float waits for the line to end
    // and lands under it; the next line then flows beside the float.
    assert_eq!(border_rect(&tree, float).origin.y, px(20));
    assert_eq!(border_rect(&tree, float).origin.x, px(0));
    let lines = paragraph(&tree, para).lines;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].block_offset, px(20));
    assert_eq!(lines[1].line_left, px(30));
    assert_eq!(border_rect(&tree, root).size.height, px(50));
}
