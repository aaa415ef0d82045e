//! Hat-switch decoding.
//!
//! The adapter packs the D-pad into the low nibble of the first button byte
//! using the usual HID hat convention: 0 is up, codes advance clockwise in
//! 45° steps, and 8 means released. Anything above 8 is treated as released.

use serde::{Deserialize, Serialize};

/// Mask selecting the hat code from the first button byte.
pub const HAT_MASK: u8 = 0x0F;

/// Hat code meaning "no direction pressed".
pub const HAT_CENTERED: u8 = 8;

/// `(x, y)` per hat code; `y` grows downwards like the host's `ABS_HAT0Y`.
pub const HAT_TABLE: [(i8, i8); 9] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, 0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HatDirection {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    #[default]
    Centered,
}

impl HatDirection {
    /// Decode a hat code. Codes 9–15 collapse to [`HatDirection::Centered`].
    pub fn from_code(code: u8) -> Self {
        match clamp_hat_code(code) {
            0 => HatDirection::Up,
            1 => HatDirection::UpRight,
            2 => HatDirection::Right,
            3 => HatDirection::DownRight,
            4 => HatDirection::Down,
            5 => HatDirection::DownLeft,
            6 => HatDirection::Left,
            7 => HatDirection::UpLeft,
            _ => HatDirection::Centered,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            HatDirection::Up => 0,
            HatDirection::UpRight => 1,
            HatDirection::Right => 2,
            HatDirection::DownRight => 3,
            HatDirection::Down => 4,
            HatDirection::DownLeft => 5,
            HatDirection::Left => 6,
            HatDirection::UpLeft => 7,
            HatDirection::Centered => HAT_CENTERED,
        }
    }

    /// Host-facing `(HAT0X, HAT0Y)` pair for this direction.
    pub fn axes(self) -> (i8, i8) {
        hat_to_axes(self.code())
    }
}

/// Clamp a raw hat code into `0..=8`.
pub fn clamp_hat_code(code: u8) -> u8 {
    code.min(HAT_CENTERED)
}

/// Look up the `(x, y)` pair for a raw hat code, clamping first.
pub fn hat_to_axes(code: u8) -> (i8, i8) {
    HAT_TABLE
        .get(usize::from(clamp_hat_code(code)))
        .copied()
        .unwrap_or((0, 0))
}
