/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! A CSS 2.2 block and float layout engine.
//!
//! Given a box tree with resolved styles and a viewport, [`layout`] assigns
//! every box a position and size, following the CSS 2.2 visual formatting
//! model for block-level and float layout: margin collapsing, float
//! placement and clearance, intrinsic (shrink-to-fit) sizing, and multiple
//! writing modes through one logical coordinate model.
//!
//! Out of scope, by design: markup parsing, the style cascade, text shaping
//! (inline content arrives pre-measured), and painting. Layout is a pure
//! function from (box tree + styles + viewport) to geometry; it performs no
//! I/O and keeps no state between runs.

pub mod context;
pub mod flow;
pub mod geom;
pub mod sizing;
pub mod style;
pub mod tree;

use app_units::Au;
use euclid::num::Zero;
use log::debug;

use crate::context::LayoutContext;
use crate::geom::{PhysicalPoint, PhysicalRect, PhysicalSize};
use crate::tree::BoxTree;

/// Lay out the whole tree against a viewport-sized initial containing
/// block, then absolutify every area.
///
/// Re-running on the same tree with the same viewport yields identical
/// geometry: all per-run state is discarded afterward and previously
/// assigned geometry is cleared first.
pub fn layout(tree: &mut BoxTree, viewport: PhysicalSize) {
    debug!("layout start, viewport {:?}", viewport);
    tree.reset_geometry();
    tree.icb.set_physical(PhysicalRect::new(
        PhysicalPoint::new(Au::zero(), Au::zero()),
        viewport,
    ));
    let ctx = LayoutContext::new(viewport);
    flow::layout_root(tree, &ctx);
    tree.absolutify();
    debug!("layout done");
}
