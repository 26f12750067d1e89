/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::geom::PhysicalSize;

/// Which measure a traversal is computing.
///
/// `MinContent`/`MaxContent` run the same recursive machinery as `Normal`
/// but only produce inline-size contributions; no geometry is assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    Normal,
    MinContent,
    MaxContent,
}

/// Per-run inputs. Freshly built for every layout call; nothing here
/// outlives the run.
#[derive(Clone, Copy, Debug)]
pub struct LayoutContext {
    /// Size of the initial containing block.
    pub viewport: PhysicalSize,
    pub mode: LayoutMode,
}

impl LayoutContext {
    pub fn new(viewport: PhysicalSize) -> Self {
        Self {
            viewport,
            mode: LayoutMode::Normal,
        }
    }
}
