//! Ports, hardware revisions and the per-revision input mapping tables.

use crate::ids::report_ids;
use crate::SanwaError;
use serde::{Deserialize, Serialize};

/// Number of analog axis bytes in every input report.
pub const AXIS_BYTES: usize = 4;

/// Number of logical buttons carried by the button bytes.
pub const BUTTON_COUNT: usize = 12;

/// Number of face buttons (high nibble of the first button byte).
pub const FACE_BUTTON_COUNT: usize = 4;

/// One of the adapter's two controller sockets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PortIndex {
    One,
    Two,
}

impl PortIndex {
    pub const ALL: [PortIndex; 2] = [PortIndex::One, PortIndex::Two];

    /// Resolve the port addressed by a report ID; `None` for anything but 1 or 2.
    pub fn from_report_id(report_id: u8) -> Option<Self> {
        match report_id {
            report_ids::PORT_ONE => Some(PortIndex::One),
            report_ids::PORT_TWO => Some(PortIndex::Two),
            _ => None,
        }
    }

    /// Resolve a 1-based socket number.
    pub fn from_number(number: u8) -> Option<Self> {
        Self::from_report_id(number)
    }

    pub fn report_id(self) -> u8 {
        match self {
            PortIndex::One => report_ids::PORT_ONE,
            PortIndex::Two => report_ids::PORT_TWO,
        }
    }

    /// Zero-based slot index.
    pub fn index(self) -> usize {
        match self {
            PortIndex::One => 0,
            PortIndex::Two => 1,
        }
    }

    /// 1-based socket number, as printed on the adapter.
    pub fn number(self) -> u8 {
        self.report_id()
    }
}

impl core::fmt::Display for PortIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Port {}", self.number())
    }
}

/// Absolute axes a port can expose, with their Linux `ABS_*` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisId {
    X,
    Y,
    Z,
    Rx,
    Ry,
    Rz,
    Hat0X,
    Hat0Y,
}

impl AxisId {
    pub fn code(self) -> u16 {
        match self {
            AxisId::X => 0x00,
            AxisId::Y => 0x01,
            AxisId::Z => 0x02,
            AxisId::Rx => 0x03,
            AxisId::Ry => 0x04,
            AxisId::Rz => 0x05,
            AxisId::Hat0X => 0x10,
            AxisId::Hat0Y => 0x11,
        }
    }

    pub fn is_hat(self) -> bool {
        matches!(self, AxisId::Hat0X | AxisId::Hat0Y)
    }
}

/// Digital buttons a port can expose, with their Linux `BTN_*` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonId {
    South,
    East,
    North,
    West,
    Tl,
    Tr,
    Tl2,
    Tr2,
    Select,
    Start,
    ThumbL,
    ThumbR,
}

impl ButtonId {
    pub fn code(self) -> u16 {
        match self {
            ButtonId::South => 0x130,
            ButtonId::East => 0x131,
            ButtonId::North => 0x133,
            ButtonId::West => 0x134,
            ButtonId::Tl => 0x136,
            ButtonId::Tr => 0x137,
            ButtonId::Tl2 => 0x138,
            ButtonId::Tr2 => 0x139,
            ButtonId::Select => 0x13A,
            ButtonId::Start => 0x13B,
            ButtonId::ThumbL => 0x13D,
            ButtonId::ThumbR => 0x13E,
        }
    }

    pub fn is_face(self) -> bool {
        matches!(
            self,
            ButtonId::South | ButtonId::East | ButtonId::North | ButtonId::West
        )
    }
}

/// Adapter hardware revisions sharing the same USB signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareRevision {
    /// First revision: three axis pairs declared, no force feedback.
    Original,
    /// Later revision: two analog sticks and a rumble motor pair per port.
    #[default]
    Rumble,
}

const ORIGINAL_AXES: [AxisId; 6] = [
    AxisId::X,
    AxisId::Y,
    AxisId::Z,
    AxisId::Rx,
    AxisId::Ry,
    AxisId::Rz,
];

const RUMBLE_AXES: [AxisId; 4] = [AxisId::X, AxisId::Y, AxisId::Rx, AxisId::Ry];

impl HardwareRevision {
    /// Analog axes declared to the host (hat axes are declared separately).
    pub fn declared_axes(self) -> &'static [AxisId] {
        match self {
            HardwareRevision::Original => &ORIGINAL_AXES,
            HardwareRevision::Rumble => &RUMBLE_AXES,
        }
    }

    pub fn axis_layout(self) -> AxisLayout {
        match self {
            HardwareRevision::Original => AxisLayout([AxisId::X, AxisId::Y, AxisId::Z, AxisId::Rz]),
            HardwareRevision::Rumble => AxisLayout([AxisId::X, AxisId::Y, AxisId::Rx, AxisId::Ry]),
        }
    }

    pub fn supports_rumble(self) -> bool {
        matches!(self, HardwareRevision::Rumble)
    }
}

/// Which absolute axis each of the four payload axis bytes drives.
///
/// Deserializes from a plain list of four axes and runs the same checks as
/// [`AxisLayout::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[AxisId; 4]", into = "[AxisId; 4]")]
pub struct AxisLayout([AxisId; AXIS_BYTES]);

impl AxisLayout {
    /// Build a custom layout. Entries must be distinct analog (non-hat) axes.
    pub fn new(axes: [AxisId; AXIS_BYTES]) -> Result<Self, SanwaError> {
        if let Some(hat) = axes.iter().find(|axis| axis.is_hat()) {
            return Err(SanwaError::InvalidMapping(format!(
                "hat axis {hat:?} cannot be driven by an analog byte"
            )));
        }
        if has_duplicates(&axes) {
            return Err(SanwaError::InvalidMapping(format!(
                "axis layout {axes:?} repeats an axis"
            )));
        }
        Ok(Self(axes))
    }

    /// Build a layout for `revision`. On top of the checks in
    /// [`new`](Self::new), every axis must be one the revision declares.
    pub fn for_revision(
        revision: HardwareRevision,
        axes: [AxisId; AXIS_BYTES],
    ) -> Result<Self, SanwaError> {
        let layout = Self::new(axes)?;
        let declared = revision.declared_axes();
        if let Some(axis) = axes.iter().find(|axis| !declared.contains(axis)) {
            return Err(SanwaError::InvalidMapping(format!(
                "axis {axis:?} is not declared by the {revision:?} revision"
            )));
        }
        Ok(layout)
    }

    pub fn axes(&self) -> &[AxisId; AXIS_BYTES] {
        &self.0
    }
}

impl TryFrom<[AxisId; AXIS_BYTES]> for AxisLayout {
    type Error = SanwaError;

    fn try_from(axes: [AxisId; AXIS_BYTES]) -> Result<Self, Self::Error> {
        Self::new(axes)
    }
}

impl From<AxisLayout> for [AxisId; AXIS_BYTES] {
    fn from(layout: AxisLayout) -> Self {
        layout.0
    }
}

impl Default for AxisLayout {
    fn default() -> Self {
        HardwareRevision::default().axis_layout()
    }
}

/// Which logical button each input bit drives.
///
/// Entry `i` belongs to bit `4 + i` of the first button byte for `i < 4`
/// (face positions A–D), and to bit `i - 4` of the second button byte
/// otherwise (L1, L2, R1, R2, Select, Start, L3, R3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[ButtonId; 12]", into = "[ButtonId; 12]")]
pub struct ButtonMap([ButtonId; BUTTON_COUNT]);

const SHOULDER_AND_SYSTEM: [ButtonId; 8] = [
    ButtonId::Tl,
    ButtonId::Tl2,
    ButtonId::Tr,
    ButtonId::Tr2,
    ButtonId::Select,
    ButtonId::Start,
    ButtonId::ThumbL,
    ButtonId::ThumbR,
];

impl ButtonMap {
    /// Default map. Face positions B and D are deliberately cross-wired to
    /// `BTN_NORTH` and `BTN_SOUTH` so existing consumers see the layout they
    /// were tuned against.
    pub const fn cross_wired() -> Self {
        Self::from_face([
            ButtonId::West,
            ButtonId::North,
            ButtonId::East,
            ButtonId::South,
        ])
    }

    /// Positional map: B is the bottom face button, D the top one.
    pub const fn literal() -> Self {
        Self::from_face([
            ButtonId::West,
            ButtonId::South,
            ButtonId::East,
            ButtonId::North,
        ])
    }

    /// Override the face-button assignment; must be a permutation of the
    /// four face buttons.
    pub fn with_face_buttons(face: [ButtonId; FACE_BUTTON_COUNT]) -> Result<Self, SanwaError> {
        if face.iter().any(|button| !button.is_face()) || has_duplicates(&face) {
            return Err(SanwaError::InvalidMapping(format!(
                "face buttons {face:?} must be a permutation of south/east/north/west"
            )));
        }
        Ok(Self::from_face(face))
    }

    const fn from_face(face: [ButtonId; FACE_BUTTON_COUNT]) -> Self {
        let s = SHOULDER_AND_SYSTEM;
        Self([
            face[0], face[1], face[2], face[3], s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7],
        ])
    }

    pub fn buttons(&self) -> &[ButtonId; BUTTON_COUNT] {
        &self.0
    }

    pub fn face_buttons(&self) -> [ButtonId; FACE_BUTTON_COUNT] {
        let [a, b, c, d, ..] = self.0;
        [a, b, c, d]
    }
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self::cross_wired()
    }
}

impl TryFrom<[ButtonId; BUTTON_COUNT]> for ButtonMap {
    type Error = SanwaError;

    /// Only the face positions are remappable; the shoulder and system
    /// buttons must sit on their fixed bits.
    fn try_from(buttons: [ButtonId; BUTTON_COUNT]) -> Result<Self, Self::Error> {
        let [a, b, c, d, ..] = buttons;
        let map = Self::with_face_buttons([a, b, c, d])?;
        if map.0 != buttons {
            return Err(SanwaError::InvalidMapping(format!(
                "button map {buttons:?} moves a shoulder or system button"
            )));
        }
        Ok(map)
    }
}

impl From<ButtonMap> for [ButtonId; BUTTON_COUNT] {
    fn from(map: ButtonMap) -> Self {
        map.0
    }
}

fn has_duplicates<T: PartialEq>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .any(|(i, item)| items.iter().skip(i.saturating_add(1)).any(|other| other == item))
}
