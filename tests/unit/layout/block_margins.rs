/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Margin collapsing across sibling and nested runs (CSS 2.2 § 8.3.1).

use app_units::Au;
use euclid::num::Zero;
use layout::tree::BoxTree;
use quickcheck::quickcheck;

use crate::helpers::*;

#[test]
fn sibling_margins_collapse_to_one_gap() {
    let mut tree = BoxTree::new();
    let margins = style(|s| {
        s.margin.top = length(10.0);
        s.margin.bottom = length(10.0);
    });
    let a = block(&mut tree, margins.clone(), vec![]);
    let b = block(&mut tree, margins, vec![]);
    let root = bfc_root(&mut tree, style(|_| {}), vec![a, b]);
    finish(&mut tree, root, (400, 400));

    // Everything collapses into a single 10px run.
    assert_eq!(border_rect(&tree, a).origin.y, px(10));
    assert_eq!(border_rect(&tree, b).origin.y, px(10));
    assert_eq!(border_rect(&tree, root).size.height, px(10));
}

#[test]
fn unequal_margins_use_the_larger() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.margin.top = length(20.0);
            s.margin.bottom = length(20.0);
        }),
        vec![],
    );
    let b = block(
        &mut tree,
        style(|s| {
            s.margin.top = length(10.0);
            s.margin.bottom = length(10.0);
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a, b]);
    finish(&mut tree, root, (400, 400));

    assert_eq!(border_rect(&tree, a).origin.y, px(20));
    assert_eq!(border_rect(&tree, b).origin.y, px(20));
    assert_eq!(border_rect(&tree, root).size.height, px(20));
}

#[test]
fn bottom_border_breaks_the_run() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.margin.top = length(20.0);
            s.margin.bottom = length(20.0);
            s.border_width.bottom = px(1);
        }),
        vec![],
    );
    let b = block(
        &mut tree,
        style(|s| {
            s.margin.top = length(10.0);
            s.margin.bottom = length(10.0);
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a, b]);
    finish(&mut tree, root, (400, 400));

    // The border keeps A from collapsing through, so A's top margin and its
    // bottom margin are separate runs; the bottom run still collapses with
    // B's top margin.
    assert_eq!(border_rect(&tree, a).origin.y, px(20));
    assert_eq!(border_rect(&tree, a).size.height, px(1));
    assert_eq!(border_rect(&tree, b).origin.y, px(41));
    assert_eq!(border_rect(&tree, root).size.height, px(41));
}

#[test]
fn empty_box_collapses_through() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.margin.top = length(30.0);
            s.margin.bottom = length(5.0);
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a]);
    finish(&mut tree, root, (400, 400));

    assert_eq!(border_rect(&tree, a).origin.y, px(30));
    assert_eq!(border_rect(&tree, a).size.height, px(0));
    assert_eq!(border_rect(&tree, root).size.height, px(30));
}

#[test]
fn nested_collapse_through_chain() {
    // A parent whose children all collapse through: one run end to end.
    let mut tree = BoxTree::new();
    let margins = style(|s| {
        s.margin.top = length(10.0);
        s.margin.bottom = length(10.0);
    });
    let a = block(&mut tree, margins.clone(), vec![]);
    let b = block(&mut tree, margins, vec![]);
    let parent = block(&mut tree, style(|_| {}), vec![a, b]);
    let root = bfc_root(&mut tree, style(|_| {}), vec![parent]);
    finish(&mut tree, root, (400, 400));

    assert_eq!(border_rect(&tree, parent).origin.y, px(10));
    assert_eq!(border_rect(&tree, parent).size.height, px(0));
    assert_eq!(border_rect(&tree, a).origin.y, px(10));
    assert_eq!(border_rect(&tree, b).origin.y, px(10));
    assert_eq!(border_rect(&tree, root).size.height, px(10));
}

#[test]
fn definite_size_breaks_collapse() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.margin.top = length(20.0);
            s.margin.bottom = length(20.0);
            s.height = length(50.0);
        }),
        vec![],
    );
    let b = block(
        &mut tree,
        style(|s| {
            s.margin.top = length(10.0);
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a, b]);
    finish(&mut tree, root, (400, 400));

    assert_eq!(border_rect(&tree, a).origin.y, px(20));
    assert_eq!(border_rect(&tree, a).size.height, px(50));
    // A's bottom margin collapses with B's top margin: max(20, 10).
    assert_eq!(border_rect(&tree, b).origin.y, px(90));
    assert_eq!(border_rect(&tree, root).size.height, px(90));
}

#[test]
fn negative_margins_subtract() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.height = length(20.0);
            s.margin.bottom = length(-10.0);
        }),
        vec![],
    );
    let b = block(
        &mut tree,
        style(|s| {
            s.margin.top = length(30.0);
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a, b]);
    finish(&mut tree, root, (400, 400));

    // Collapsed gap: max positive (30) + most negative (-10).
    assert_eq!(border_rect(&tree, b).origin.y, px(40));
    assert_eq!(border_rect(&tree, root).size.height, px(40));
}

#[test]
fn padding_keeps_child_margin_inside() {
    // A parent with block-start padding: the child's top margin cannot
    // escape, so it pushes the child down inside the parent.
    let mut tree = BoxTree::new();
    let child = block(
        &mut tree,
        style(|s| {
            s.margin.top = length(15.0);
            s.height = length(10.0);
        }),
        vec![],
    );
    let parent = block(
        &mut tree,
        style(|s| {
            s.padding.top = layout::style::LengthPercentage::px(5.0);
        }),
        vec![child],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![parent]);
    finish(&mut tree, root, (400, 400));

    assert_eq!(border_rect(&tree, parent).origin.y, px(0));
    // 5px padding, then the 15px margin inside it.
    assert_eq!(border_rect(&tree, child).origin.y, px(20));
    // Parent auto height: margin + child, under the padding.
    assert_eq!(border_rect(&tree, parent).size.height, px(30));
}

#[test]
fn trailing_margin_stays_inside_padded_parent() {
    let mut tree = BoxTree::new();
    let child = block(
        &mut tree,
        style(|s| {
            s.height = length(10.0);
            s.margin.bottom = length(25.0);
        }),
        vec![],
    );
    let parent = block(
        &mut tree,
        style(|s| {
            s.padding.bottom = layout::style::LengthPercentage::px(5.0);
        }),
        vec![child],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![parent]);
    finish(&mut tree, root, (400, 400));

    // The bottom padding stops the child's end margin from collapsing out,
    // so the parent's auto height includes it (CSS 2.2 § 10.6.3).
    assert_eq!(border_rect(&tree, parent).size.height, px(40));
    assert_eq!(border_rect(&tree, root).size.height, px(40));
}

quickcheck! {
    /// With only empty children, the BFC root's auto block size is the
    /// collapsed value of every margin in the tree: one run end to end.
    fn empty_children_collapse_to_single_run(margins: Vec<(u8, u8)>) -> bool {
        let mut tree = BoxTree::new();
        let mut children = Vec::new();
        let mut expected = 0i32;
        for &(top, bottom) in &margins {
            expected = expected.max(top as i32).max(bottom as i32);
            let child = block(
                &mut tree,
                style(|s| {
                    s.margin.top = length(top as f32);
                    s.margin.bottom = length(bottom as f32);
                }),
                vec![],
            );
            children.push(child);
        }
        let root = bfc_root(&mut tree, style(|_| {}), children);
        finish(&mut tree, root, (500, 500));
        border_rect(&tree, root).size.height == px(expected)
    }
}

#[test]
fn relayout_is_idempotent_for_margins() {
    let mut tree = BoxTree::new();
    let a = block(
        &mut tree,
        style(|s| {
            s.margin.top = length(20.0);
            s.height = length(30.0);
        }),
        vec![],
    );
    let b = block(
        &mut tree,
        style(|s| {
            s.margin.top = length(10.0);
            s.margin.bottom = length(10.0);
        }),
        vec![],
    );
    let root = bfc_root(&mut tree, style(|_| {}), vec![a, b]);
    finish(&mut tree, root, (400, 400));
    let first: Vec<_> = [root, a, b]
        .iter()
        .map(|&id| border_rect(&tree, id))
        .collect();

    layout::layout(&mut tree, euclid::default::Size2D::new(px(400), px(400)));
    let second: Vec<_> = [root, a, b]
        .iter()
        .map(|&id| border_rect(&tree, id))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn zero_margins_collapse_to_zero() {
    let mut tree = BoxTree::new();
    let a = block(&mut tree, style(|_| {}), vec![]);
    let root = bfc_root(&mut tree, style(|_| {}), vec![a]);
    finish(&mut tree, root, (100, 100));
    assert_eq!(border_rect(&tree, a).origin.y, Au::zero());
    assert_eq!(border_rect(&tree, root).size.height, Au::zero());
}
