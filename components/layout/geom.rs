/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Writing-mode-relative geometry.
//!
//! Layout runs entirely in logical (block/inline, line-left/line-right)
//! coordinates; physical x/y/width/height only exist after the final
//! absolutify walk.

use app_units::Au;
use euclid::num::Zero;

use crate::tree::AreaRef;

pub type PhysicalPoint = euclid::default::Point2D<Au>;
pub type PhysicalSize = euclid::default::Size2D<Au>;
pub type PhysicalRect = euclid::default::Rect<Au>;

bitflags::bitflags! {
    /// One of three writing modes (horizontal-tb, vertical-rl, vertical-lr)
    /// plus the bidi direction of the root inline base direction.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct WritingMode: u8 {
        const RTL = 1 << 0;
        const VERTICAL = 1 << 1;
        /// In vertical mode, blocks grow left-to-right rather than right-to-left.
        const VERTICAL_LR = 1 << 2;
    }
}

impl WritingMode {
    pub fn horizontal_tb() -> Self {
        WritingMode::empty()
    }

    pub fn vertical_rl() -> Self {
        WritingMode::VERTICAL
    }

    pub fn vertical_lr() -> Self {
        WritingMode::VERTICAL | WritingMode::VERTICAL_LR
    }

    pub fn with_rtl(self) -> Self {
        self | WritingMode::RTL
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.intersects(WritingMode::VERTICAL)
    }

    #[inline]
    pub fn is_vertical_lr(&self) -> bool {
        self.intersects(WritingMode::VERTICAL_LR)
    }

    #[inline]
    pub fn is_bidi_ltr(&self) -> bool {
        !self.intersects(WritingMode::RTL)
    }
}

/// The physical side a logical offset routes to for a given writing mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicalSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl WritingMode {
    /// Physical side of the block-start edge.
    pub fn block_start_side(&self) -> PhysicalSide {
        if !self.is_vertical() {
            PhysicalSide::Top
        } else if self.is_vertical_lr() {
            PhysicalSide::Left
        } else {
            PhysicalSide::Right
        }
    }

    /// Physical side of the line-left edge. Line-relative sides depend only
    /// on the writing mode, never on direction: floats and line boxes do not
    /// flip with `direction: rtl`.
    pub fn line_left_side(&self) -> PhysicalSide {
        if self.is_vertical() {
            PhysicalSide::Top
        } else {
            PhysicalSide::Left
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogicalVec2<T> {
    pub inline: T,
    pub block: T,
}

impl LogicalVec2<Au> {
    pub fn zero() -> Self {
        Self {
            inline: Au::zero(),
            block: Au::zero(),
        }
    }
}

/// Per-side logical values. The inline axis is carried line-relative
/// (line-left / line-right) because float placement is line-relative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogicalSides<T> {
    pub block_start: T,
    pub block_end: T,
    pub line_left: T,
    pub line_right: T,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhysicalSides<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> LogicalSides<T> {
    pub fn from_physical(mode: WritingMode, sides: &PhysicalSides<T>) -> Self {
        if !mode.is_vertical() {
            Self {
                block_start: sides.top,
                block_end: sides.bottom,
                line_left: sides.left,
                line_right: sides.right,
            }
        } else if mode.is_vertical_lr() {
            Self {
                block_start: sides.left,
                block_end: sides.right,
                line_left: sides.top,
                line_right: sides.bottom,
            }
        } else {
            Self {
                block_start: sides.right,
                block_end: sides.left,
                line_left: sides.top,
                line_right: sides.bottom,
            }
        }
    }
}

impl LogicalSides<Au> {
    pub fn zero() -> Self {
        Self {
            block_start: Au::zero(),
            block_end: Au::zero(),
            line_left: Au::zero(),
            line_right: Au::zero(),
        }
    }

    pub fn block_sum(&self) -> Au {
        self.block_start + self.block_end
    }

    pub fn inline_sum(&self) -> Au {
        self.line_left + self.line_right
    }
}

/// A length that may still be `auto`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuOrAuto {
    Auto,
    Length(Au),
}

impl AuOrAuto {
    #[inline]
    pub fn auto_is(&self, f: impl FnOnce() -> Au) -> Au {
        match *self {
            AuOrAuto::Auto => f(),
            AuOrAuto::Length(length) => length,
        }
    }

    #[inline]
    pub fn non_auto(&self) -> Option<Au> {
        match *self {
            AuOrAuto::Auto => None,
            AuOrAuto::Length(length) => Some(length),
        }
    }

    #[inline]
    pub fn is_auto(&self) -> bool {
        matches!(*self, AuOrAuto::Auto)
    }
}

/// One of the three rectangles (border, padding, content) owned by a box.
///
/// Offsets are written in logical terms and stored under the physical field
/// the writing mode routes them to; only one of `left`/`right` is ever
/// assigned for a given area. Absolute coordinates are undefined until
/// [`BoxArea::absolutify`] has run for the whole ancestor chain.
#[derive(Clone, Debug, Default)]
pub struct BoxArea {
    /// The area this area's offsets are relative to. Not an ownership link;
    /// resolved through the box arena.
    pub parent: Option<AreaRef>,
    top: Option<Au>,
    left: Option<Au>,
    right: Option<Au>,
    width: Option<Au>,
    height: Option<Au>,
    x: Option<Au>,
    y: Option<Au>,
}

fn resolved(value: Option<Au>, what: &str) -> Au {
    match value {
        Some(value) => value,
        None => panic!("{} read before layout resolved it", what),
    }
}

impl BoxArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything a previous layout run assigned. Keeps relayout of
    /// the same tree idempotent.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_block_start(&mut self, mode: WritingMode, v: Au) {
        match mode.block_start_side() {
            PhysicalSide::Top => self.top = Some(v),
            PhysicalSide::Left => self.left = Some(v),
            PhysicalSide::Right => self.right = Some(v),
            PhysicalSide::Bottom => unreachable!("block-start never maps to bottom"),
        }
    }

    pub fn block_start(&self, mode: WritingMode) -> Au {
        let v = match mode.block_start_side() {
            PhysicalSide::Top => self.top,
            PhysicalSide::Left => self.left,
            PhysicalSide::Right => self.right,
            PhysicalSide::Bottom => unreachable!("block-start never maps to bottom"),
        };
        resolved(v, "block-start")
    }

    pub fn set_line_left(&mut self, mode: WritingMode, v: Au) {
        match mode.line_left_side() {
            PhysicalSide::Left => self.left = Some(v),
            PhysicalSide::Top => self.top = Some(v),
            _ => unreachable!("line-left never maps to right or bottom"),
        }
    }

    pub fn line_left(&self, mode: WritingMode) -> Au {
        let v = match mode.line_left_side() {
            PhysicalSide::Left => self.left,
            PhysicalSide::Top => self.top,
            _ => unreachable!("line-left never maps to right or bottom"),
        };
        resolved(v, "line-left")
    }

    pub fn set_inline_size(&mut self, mode: WritingMode, v: Au) {
        if mode.is_vertical() {
            self.height = Some(v);
        } else {
            self.width = Some(v);
        }
    }

    pub fn inline_size(&self, mode: WritingMode) -> Au {
        let v = if mode.is_vertical() {
            self.height
        } else {
            self.width
        };
        resolved(v, "inline size")
    }

    pub fn set_block_size(&mut self, mode: WritingMode, v: Au) {
        if mode.is_vertical() {
            self.width = Some(v);
        } else {
            self.height = Some(v);
        }
    }

    pub fn block_size(&self, mode: WritingMode) -> Au {
        let v = if mode.is_vertical() {
            self.width
        } else {
            self.height
        };
        resolved(v, "block size")
    }

    pub fn has_block_size(&self, mode: WritingMode) -> bool {
        if mode.is_vertical() {
            self.width.is_some()
        } else {
            self.height.is_some()
        }
    }

    /// Install physical coordinates directly. Only the initial containing
    /// block is created this way.
    pub fn set_physical(&mut self, rect: PhysicalRect) {
        self.x = Some(rect.origin.x);
        self.y = Some(rect.origin.y);
        self.top = Some(Au::zero());
        self.left = Some(Au::zero());
        self.width = Some(rect.size.width);
        self.height = Some(rect.size.height);
    }

    /// Convert this area's logical offsets to absolute physical coordinates
    /// against its already-absolutified parent area.
    ///
    /// x anchors to the parent's right edge when the writing mode assigned a
    /// `right` offset (vertical-rl); y always anchors to the top.
    pub fn absolutify(&mut self, parent: &PhysicalRect) {
        let width = resolved(self.width, "width during absolutify");
        let x = match (self.left, self.right) {
            (Some(left), _) => parent.origin.x + left,
            (None, Some(right)) => {
                parent.origin.x + parent.size.width - right - width
            },
            (None, None) => panic!("area has no inline offset to absolutify"),
        };
        let y = parent.origin.y + resolved(self.top, "top during absolutify");
        self.x = Some(x);
        self.y = Some(y);
    }

    /// The absolute rectangle. Only valid after `absolutify`.
    pub fn physical_rect(&self) -> PhysicalRect {
        PhysicalRect::new(
            PhysicalPoint::new(
                resolved(self.x, "absolute x"),
                resolved(self.y, "absolute y"),
            ),
            PhysicalSize::new(
                resolved(self.width, "width"),
                resolved(self.height, "height"),
            ),
        )
    }

    pub fn is_absolutified(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}
