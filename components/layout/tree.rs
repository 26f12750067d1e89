/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The box tree.
//!
//! Boxes live in one arena and refer to each other (children, containing
//! blocks, area parents) by index, so there are no ownership cycles and no
//! reference counting. Box-tree construction happens upstream; layout only
//! assigns geometry.

use std::sync::Arc;

use crate::flow::inline::InlineFormattingContext;
use crate::geom::{BoxArea, PhysicalRect};
use crate::style::ComputedStyle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoxId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaKind {
    Border,
    Padding,
    Content,
}

/// A non-owning reference to one area of one box, or to the initial
/// containing block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaRef {
    InitialContainingBlock,
    Area(BoxId, AreaKind),
}

bitflags::bitflags! {
    /// Orthogonal facets of a box. Structure (block container of blocks vs.
    /// of inlines) is the [`BoxKind`] sum instead.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct BoxFlags: u8 {
        /// Synthesized during box-tree construction, not from a styled element.
        const ANONYMOUS = 1 << 0;
        /// Out of normal flow; positioned by the float context.
        const FLOAT = 1 << 1;
        /// Establishes a new block formatting context.
        const BFC_ROOT = 1 << 2;
        /// Emit verbose logging while laying this box out.
        const LOGGING = 1 << 3;
    }
}

#[derive(Debug)]
pub enum BoxKind {
    /// A block container whose children are all block-level.
    BlockContainer(Vec<BoxId>),
    /// A block container of inline content; owns its inline formatting
    /// context root.
    InlineContainer(InlineFormattingContext),
}

#[derive(Debug)]
pub struct BoxNode {
    pub style: Arc<ComputedStyle>,
    pub flags: BoxFlags,
    pub kind: BoxKind,
    pub parent: Option<BoxId>,
    /// The area percentages and auto margins resolve against. Assigned
    /// top-down during layout, before this box's own sizing.
    pub containing_block: Option<AreaRef>,
    pub border_area: BoxArea,
    pub padding_area: BoxArea,
    pub content_area: BoxArea,
}

impl BoxNode {
    pub fn is_float(&self) -> bool {
        self.flags.contains(BoxFlags::FLOAT)
    }

    pub fn is_bfc_root(&self) -> bool {
        self.flags.contains(BoxFlags::BFC_ROOT)
    }

    pub fn is_anonymous(&self) -> bool {
        self.flags.contains(BoxFlags::ANONYMOUS)
    }

    pub fn is_inline_container(&self) -> bool {
        matches!(self.kind, BoxKind::InlineContainer(_))
    }

    pub fn children(&self) -> &[BoxId] {
        match self.kind {
            BoxKind::BlockContainer(ref children) => children,
            BoxKind::InlineContainer(_) => &[],
        }
    }
}

pub struct BoxTree {
    boxes: Vec<BoxNode>,
    root: Option<BoxId>,
    /// The viewport-sized area everything ultimately resolves against.
    pub icb: BoxArea,
}

impl BoxTree {
    pub fn new() -> Self {
        Self {
            boxes: Vec::new(),
            root: None,
            icb: BoxArea::new(),
        }
    }

    pub fn add_box(
        &mut self,
        style: Arc<ComputedStyle>,
        flags: BoxFlags,
        kind: BoxKind,
    ) -> BoxId {
        let id = BoxId(self.boxes.len());
        self.boxes.push(BoxNode {
            style,
            flags,
            kind,
            parent: None,
            containing_block: None,
            border_area: BoxArea::new(),
            padding_area: BoxArea::new(),
            content_area: BoxArea::new(),
        });
        id
    }

    /// Declare the tree complete. Fills in parent links, including floats
    /// owned by inline formatting contexts.
    pub fn set_root(&mut self, root: BoxId) {
        self.root = Some(root);
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let mut children: Vec<BoxId> = self[id].children().to_vec();
            if let BoxKind::InlineContainer(ref ifc) = self[id].kind {
                children.extend(ifc.float_children());
            }
            for child in children {
                self.boxes[child.0].parent = Some(id);
                stack.push(child);
            }
        }
    }

    pub fn root(&self) -> BoxId {
        self.root.expect("layout invoked on a tree with no root box")
    }

    pub fn area(&self, area: AreaRef) -> &BoxArea {
        match area {
            AreaRef::InitialContainingBlock => &self.icb,
            AreaRef::Area(id, AreaKind::Border) => &self[id].border_area,
            AreaRef::Area(id, AreaKind::Padding) => &self[id].padding_area,
            AreaRef::Area(id, AreaKind::Content) => &self[id].content_area,
        }
    }

    /// Clear all geometry a previous run assigned, so relaying out the same
    /// tree is indistinguishable from a first layout.
    pub fn reset_geometry(&mut self) {
        for node in &mut self.boxes {
            node.containing_block = None;
            node.border_area.reset();
            node.padding_area.reset();
            node.content_area.reset();
            if let BoxKind::InlineContainer(ref mut ifc) = node.kind {
                ifc.paragraph = None;
            }
        }
        self.icb.reset();
    }

    /// Final pass: convert every box's areas to absolute physical
    /// coordinates, parents before children.
    pub fn absolutify(&mut self) {
        let root = self.root();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let parent_area = self[id]
                .border_area
                .parent
                .unwrap_or_else(|| panic!("box {:?} has no parent area assigned", id));
            let parent_rect = self.area(parent_area).physical_rect();
            let node = &mut self.boxes[id.0];
            node.border_area.absolutify(&parent_rect);
            let border_rect = node.border_area.physical_rect();
            node.padding_area.absolutify(&border_rect);
            let padding_rect = node.padding_area.physical_rect();
            node.content_area.absolutify(&padding_rect);
            stack.extend(self[id].children().iter().copied());
            if let BoxKind::InlineContainer(ref ifc) = self[id].kind {
                for float in ifc.float_children() {
                    stack.push(float);
                }
            }
        }
    }

    pub fn physical_border_rect(&self, id: BoxId) -> PhysicalRect {
        self[id].border_area.physical_rect()
    }
}

impl Default for BoxTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<BoxId> for BoxTree {
    type Output = BoxNode;

    fn index(&self, id: BoxId) -> &BoxNode {
        &self.boxes[id.0]
    }
}

impl std::ops::IndexMut<BoxId> for BoxTree {
    fn index_mut(&mut self, id: BoxId) -> &mut BoxNode {
        &mut self.boxes[id.0]
    }
}
