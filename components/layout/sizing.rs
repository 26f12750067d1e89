/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Intrinsic (min-content / max-content) inline sizes.
//!
//! <https://dbaron.org/css/intrinsic/>

use app_units::Au;
use euclid::num::Zero;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentSizes {
    pub min_content: Au,
    pub max_content: Au,
}

impl ContentSizes {
    pub fn zero() -> Self {
        Self {
            min_content: Au::zero(),
            max_content: Au::zero(),
        }
    }

    /// Both measures pinned to one definite size.
    pub fn definite(size: Au) -> Self {
        Self {
            min_content: size,
            max_content: size,
        }
    }

    pub fn max(self, other: Self) -> Self {
        Self {
            min_content: self.min_content.max(other.min_content),
            max_content: self.max_content.max(other.max_content),
        }
    }

    pub fn max_assign(&mut self, other: Self) {
        *self = self.max(other);
    }

    /// Add the same amount (e.g. padding+border+margin) to both measures.
    pub fn grow_by(self, amount: Au) -> Self {
        Self {
            min_content: self.min_content + amount,
            max_content: self.max_content + amount,
        }
    }

    /// CSS 2.2 §10.3.5: `min(max(preferred minimum, available), preferred)`.
    pub fn shrink_to_fit(&self, available: Au) -> Au {
        available.max(self.min_content).min(self.max_content)
    }
}
