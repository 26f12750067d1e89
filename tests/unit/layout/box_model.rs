/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Inline-axis resolution (CSS 2.2 § 10.3.3) and size clamping.

use layout::geom::WritingMode;
use layout::style::LengthPercentage;
use layout::tree::BoxTree;

use crate::helpers::*;

#[test]
fn auto_width_fills_the_containing_block() {
    let mut tree = BoxTree::new();
    let a = block(&mut tree, style(|_| {}), vec![]);
    let root = bfc_root(&mut tree, style(|_| {}), vec![a]);
    finish(&mut tree, root, (200, 100));
    assert_eq!(border_rect(&tree, a).size.width, px(200));
}

#[test]
fn two_auto_margins_center() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.width = length(50.0);
            s.margin.left = layout::style::LengthPercentageOrAuto::Auto;
            s.margin.right = layout::style::LengthPercentageOrAuto::Auto;
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a]);
    finish(&mut tree, root, (100, 100));
    assert_eq!(border_rect(&tree, a).origin.x, px(25));
}

#[test]
fn one_auto_margin_takes_the_remainder() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.width = length(60.0);
            s.margin.left = length(10.0);
            s.margin.right = layout::style::LengthPercentageOrAuto::Auto;
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a]);
    finish(&mut tree, root, (100, 100));
    assert_eq!(border_rect(&tree, a).origin.x, px(10));
}

#[test]
fn overconstrained_ltr_ignores_the_trailing_margin() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.width = length(80.0);
            s.margin.left = length(10.0);
            s.margin.right = length(50.0);
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a]);
    finish(&mut tree, root, (100, 100));
    // The leading margin wins; the trailing one absorbs the (negative) slack.
    assert_eq!(border_rect(&tree, a).origin.x, px(10));
}

#[test]
fn overconstrained_rtl_honors_the_right_margin() {
    let mut tree = BoxTree::new();
    let mode = WritingMode::horizontal_tb().with_rtl();
    let a = block(
        &mut tree,
        style(|s| {
            s.writing_mode = mode;
            s.width = length(80.0);
            s.margin.left = length(10.0);
            s.margin.right = length(50.0);
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|s| s.writing_mode = mode), vec![a]);
    finish(&mut tree, root, (100, 100));
    // In RTL the line-left margin absorbs the slack: 100 - 80 - 50 = -30.
    assert_eq!(border_rect(&tree, a).origin.x, px(-30));
}

#[test]
fn max_width_clamps_then_margins_resolve_again() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.max_width = Some(LengthPercentage::px(60.0));
            s.margin.left = layout::style::LengthPercentageOrAuto::Auto;
            s.margin.right = layout::style::LengthPercentageOrAuto::Auto;
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a]);
    finish(&mut tree, root, (100, 100));
    assert_eq!(border_rect(&tree, a).size.width, px(60));
    assert_eq!(border_rect(&tree, a).origin.x, px(20));
}

#[test]
fn min_width_overrides_specified_width() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.width = length(10.0);
            s.min_width = length(50.0);
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a]);
    finish(&mut tree, root, (100, 100));
    assert_eq!(border_rect(&tree, a).size.width, px(50));
}

#[test]
fn percentages_resolve_against_the_inline_measure() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.width = percent(0.5);
            s.padding.left = LengthPercentage::Percentage(0.1);
            s.padding.right = LengthPercentage::Percentage(0.1);
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a]);
    finish(&mut tree, root, (200, 100));
    // 50% content + 2 × 10% padding of the 200px containing block.
    assert_eq!(border_rect(&tree, a).size.width, px(140));
}

#[test]
fn percentage_block_size_of_auto_containing_block_is_auto() {
    let mut tree = BoxTree::new();
    let child = block(&mut tree, style(|s| s.height = percent(0.5)), vec![]);
    let parent = block(&mut tree, style(|_| {}), vec![child]);
    let root = bfc_root(&mut tree, style(|_| {}), vec![parent]);
    finish(&mut tree, root, (100, 100));
    assert_eq!(border_rect(&tree, child).size.height, px(0));
}

#[test]
fn percentage_block_size_of_definite_containing_block_resolves() {
    let mut tree = BoxTree::new();
    let child = block(&mut tree, style(|s| s.height = percent(0.5)), vec![]);
    let parent = block(&mut tree, style(|s| s.height = length(200.0)), vec![child]);
    let root = bfc_root(&mut tree, style(|_| {}), vec![parent]);
    finish(&mut tree, root, (100, 400));
    assert_eq!(border_rect(&tree, child).size.height, px(100));
}

#[test]
fn min_block_size_clamps_definite_sizes() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.height = length(10.0);
            s.min_height = length(30.0);
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a]);
    finish(&mut tree, root, (100, 100));
    assert_eq!(border_rect(&tree, a).size.height, px(30));
}

#[test]
fn padding_and_border_offset_the_content_area() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.height = length(40.0);
            s.padding.left = LengthPercentage::px(7.0);
            s.padding.top = LengthPercentage::px(3.0);
            s.border_width.left = px(2);
            s.border_width.top = px(1);
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a]);
    finish(&mut tree, root, (100, 100));
    let border = border_rect(&tree, a);
    let content = tree[a].content_area.physical_rect();
    assert_eq!(content.origin.x, border.origin.x + px(2) + px(7));
    assert_eq!(content.origin.y, border.origin.y + px(1) + px(3));
    assert_eq!(content.size.height, px(40));
    assert_eq!(border.size.height, px(44));
}
