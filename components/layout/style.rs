/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The resolved-style input contract.
//!
//! The cascade runs upstream of layout and hands each box a [`ComputedStyle`].
//! Percentages and `auto` are still distinguishable here; resolving them
//! against the containing block is layout's job, never the cascade's.

use app_units::Au;
use euclid::num::Zero;

use crate::geom::{
    AuOrAuto, LogicalSides, LogicalVec2, PhysicalSides, WritingMode,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LengthPercentage {
    Length(Au),
    /// Fraction of the containing block measure (0.5 = 50%).
    Percentage(f32),
}

impl LengthPercentage {
    pub fn zero() -> Self {
        LengthPercentage::Length(Au::zero())
    }

    pub fn px(px: f32) -> Self {
        LengthPercentage::Length(Au::from_f32_px(px))
    }

    pub fn resolve(&self, basis: Au) -> Au {
        match *self {
            LengthPercentage::Length(length) => length,
            LengthPercentage::Percentage(fraction) => basis.scale_by(fraction),
        }
    }

    /// Resolves against a basis that may itself be indefinite; a percentage
    /// of an indefinite basis is indefinite.
    pub fn maybe_resolve(&self, basis: Option<Au>) -> Option<Au> {
        match *self {
            LengthPercentage::Length(length) => Some(length),
            LengthPercentage::Percentage(fraction) => basis.map(|b| b.scale_by(fraction)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LengthPercentageOrAuto {
    Auto,
    LengthPercentage(LengthPercentage),
}

impl LengthPercentageOrAuto {
    pub fn zero() -> Self {
        LengthPercentageOrAuto::LengthPercentage(LengthPercentage::zero())
    }

    pub fn px(px: f32) -> Self {
        LengthPercentageOrAuto::LengthPercentage(LengthPercentage::px(px))
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, LengthPercentageOrAuto::Auto)
    }

    pub fn percentage_relative_to(&self, basis: Au) -> AuOrAuto {
        match *self {
            LengthPercentageOrAuto::Auto => AuOrAuto::Auto,
            LengthPercentageOrAuto::LengthPercentage(ref lp) => AuOrAuto::Length(lp.resolve(basis)),
        }
    }

    pub fn maybe_percentage_relative_to(&self, basis: Option<Au>) -> AuOrAuto {
        match *self {
            LengthPercentageOrAuto::Auto => AuOrAuto::Auto,
            LengthPercentageOrAuto::LengthPercentage(ref lp) => {
                lp.maybe_resolve(basis).map_or(AuOrAuto::Auto, AuOrAuto::Length)
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Display {
    #[default]
    Block,
    /// `display: flow-root`; establishes a block formatting context.
    FlowRoot,
    Inline,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
}

impl Position {
    pub fn is_positioned(&self) -> bool {
        !matches!(self, Position::Static)
    }
}

/// `float` uses line-relative sides: `left` means line-left in every writing
/// mode, so vertical flows float toward the physical top.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Float {
    #[default]
    None,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Clear {
    #[default]
    None,
    Left,
    Right,
    Both,
}

/// Percentages resolved but not `auto` margins: everything block layout
/// needs about one box's edges, computed once per box.
#[derive(Clone, Debug)]
pub struct PaddingBorderMargin {
    pub padding: LogicalSides<Au>,
    pub border: LogicalSides<Au>,
    pub margin: LogicalSides<AuOrAuto>,

    /// Pre-computed sums in each axis.
    pub padding_border_sums: LogicalVec2<Au>,
}

impl PaddingBorderMargin {
    pub fn zero() -> Self {
        Self {
            padding: LogicalSides::zero(),
            border: LogicalSides::zero(),
            margin: LogicalSides {
                block_start: AuOrAuto::Length(Au::zero()),
                block_end: AuOrAuto::Length(Au::zero()),
                line_left: AuOrAuto::Length(Au::zero()),
                line_right: AuOrAuto::Length(Au::zero()),
            },
            padding_border_sums: LogicalVec2::zero(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ComputedStyle {
    pub writing_mode: WritingMode,
    pub display: Display,
    pub position: Position,
    pub float: Float,
    pub clear: Clear,
    pub margin: PhysicalSides<LengthPercentageOrAuto>,
    pub padding: PhysicalSides<LengthPercentage>,
    pub border_width: PhysicalSides<Au>,
    pub width: LengthPercentageOrAuto,
    pub height: LengthPercentageOrAuto,
    pub min_width: LengthPercentageOrAuto,
    pub min_height: LengthPercentageOrAuto,
    pub max_width: Option<LengthPercentage>,
    pub max_height: Option<LengthPercentage>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            writing_mode: WritingMode::horizontal_tb(),
            display: Display::default(),
            position: Position::default(),
            float: Float::default(),
            clear: Clear::default(),
            margin: PhysicalSides {
                top: LengthPercentageOrAuto::zero(),
                right: LengthPercentageOrAuto::zero(),
                bottom: LengthPercentageOrAuto::zero(),
                left: LengthPercentageOrAuto::zero(),
            },
            padding: PhysicalSides {
                top: LengthPercentage::zero(),
                right: LengthPercentage::zero(),
                bottom: LengthPercentage::zero(),
                left: LengthPercentage::zero(),
            },
            border_width: PhysicalSides {
                top: Au::zero(),
                right: Au::zero(),
                bottom: Au::zero(),
                left: Au::zero(),
            },
            width: LengthPercentageOrAuto::Auto,
            height: LengthPercentageOrAuto::Auto,
            min_width: LengthPercentageOrAuto::zero(),
            min_height: LengthPercentageOrAuto::zero(),
            max_width: None,
            max_height: None,
        }
    }
}

impl ComputedStyle {
    pub fn establishes_block_formatting_context(&self) -> bool {
        self.display == Display::FlowRoot || self.float != Float::None
    }

    pub fn margin(&self, mode: WritingMode) -> LogicalSides<LengthPercentageOrAuto> {
        LogicalSides::from_physical(mode, &self.margin)
    }

    pub fn padding(&self, mode: WritingMode) -> LogicalSides<LengthPercentage> {
        LogicalSides::from_physical(mode, &self.padding)
    }

    pub fn border_width(&self, mode: WritingMode) -> LogicalSides<Au> {
        LogicalSides::from_physical(mode, &self.border_width)
    }

    /// `width`/`height` routed to logical axes for the given mode.
    pub fn box_size(&self, mode: WritingMode) -> LogicalVec2<LengthPercentageOrAuto> {
        if mode.is_vertical() {
            LogicalVec2 {
                inline: self.height,
                block: self.width,
            }
        } else {
            LogicalVec2 {
                inline: self.width,
                block: self.height,
            }
        }
    }

    pub fn min_box_size(&self, mode: WritingMode) -> LogicalVec2<LengthPercentageOrAuto> {
        if mode.is_vertical() {
            LogicalVec2 {
                inline: self.min_height,
                block: self.min_width,
            }
        } else {
            LogicalVec2 {
                inline: self.min_width,
                block: self.min_height,
            }
        }
    }

    pub fn max_box_size(&self, mode: WritingMode) -> LogicalVec2<Option<LengthPercentage>> {
        if mode.is_vertical() {
            LogicalVec2 {
                inline: self.max_height,
                block: self.max_width,
            }
        } else {
            LogicalVec2 {
                inline: self.max_width,
                block: self.max_height,
            }
        }
    }

    /// Resolve padding, border, and margin against the containing block
    /// inline size. Percentages in both axes resolve against the *inline*
    /// measure, per CSS 2.2 §8.3/§8.4.
    pub fn padding_border_margin(&self, cb_inline_size: Au) -> PaddingBorderMargin {
        let mode = self.writing_mode;
        let padding_lp = self.padding(mode);
        let padding = LogicalSides {
            block_start: padding_lp.block_start.resolve(cb_inline_size),
            block_end: padding_lp.block_end.resolve(cb_inline_size),
            line_left: padding_lp.line_left.resolve(cb_inline_size),
            line_right: padding_lp.line_right.resolve(cb_inline_size),
        };
        let border = self.border_width(mode);
        let margin_lp = self.margin(mode);
        let margin = LogicalSides {
            block_start: margin_lp.block_start.percentage_relative_to(cb_inline_size),
            block_end: margin_lp.block_end.percentage_relative_to(cb_inline_size),
            line_left: margin_lp.line_left.percentage_relative_to(cb_inline_size),
            line_right: margin_lp.line_right.percentage_relative_to(cb_inline_size),
        };
        PaddingBorderMargin {
            padding_border_sums: LogicalVec2 {
                inline: padding.inline_sum() + border.inline_sum(),
                block: padding.block_sum() + border.block_sum(),
            },
            padding,
            border,
            margin,
        }
    }
}
