//! Adapter configuration.
//!
//! ```json
//! {
//!   "revision": "rumble",
//!   "button_map": "literal",
//!   "axis_layout": ["x", "y", "rx", "ry"],
//!   "name": "Arcade Stick"
//! }
//! ```
//!
//! Every field is optional. `button_map` also accepts an explicit list of
//! the four face buttons for positions A–D, e.g.
//! `["west", "north", "east", "south"]`.

use std::path::{Path, PathBuf};

use sanwa_hid_common::HidDeviceInfo;
use sanwa_hid_protocol::{
    AxisId, AxisLayout, ButtonId, ButtonMap, HardwareRevision, InputDecoder, SanwaError,
    product_name,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] SanwaError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonMapPreset {
    /// Faces B and D cross-wired to north and south.
    #[default]
    Default,
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ButtonMapConfig {
    Preset(ButtonMapPreset),
    /// Face buttons for positions A, B, C, D.
    Face([ButtonId; 4]),
}

impl Default for ButtonMapConfig {
    fn default() -> Self {
        ButtonMapConfig::Preset(ButtonMapPreset::Default)
    }
}

impl ButtonMapConfig {
    /// # Errors
    ///
    /// Returns [`SanwaError::InvalidMapping`] if an explicit face list is not
    /// a permutation of the four face buttons.
    pub fn resolve(&self) -> Result<ButtonMap, SanwaError> {
        match self {
            ButtonMapConfig::Preset(ButtonMapPreset::Default) => Ok(ButtonMap::cross_wired()),
            ButtonMapConfig::Preset(ButtonMapPreset::Literal) => Ok(ButtonMap::literal()),
            ButtonMapConfig::Face(face) => ButtonMap::with_face_buttons(*face),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    pub revision: HardwareRevision,
    pub button_map: ButtonMapConfig,
    /// Overrides the revision's byte-to-axis table. Only axes the revision
    /// declares are accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_layout: Option<[AxisId; 4]>,
    /// Host-visible base name; ports append `" Port N"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AdapterConfig {
    pub fn for_revision(revision: HardwareRevision) -> Self {
        Self {
            revision,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields,
    /// and [`ConfigError::Invalid`] for mappings that fail validation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the button map or axis layout is
    /// rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.decoder().map(|_| ())
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an invalid face-button list.
    pub fn button_map(&self) -> Result<ButtonMap, ConfigError> {
        Ok(self.button_map.resolve()?)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an axis layout that repeats an
    /// axis, names a hat axis, or names an axis the revision does not declare.
    pub fn axis_layout(&self) -> Result<AxisLayout, ConfigError> {
        match self.axis_layout {
            Some(axes) => Ok(AxisLayout::for_revision(self.revision, axes)?),
            None => Ok(self.revision.axis_layout()),
        }
    }

    /// Decoder configured with this revision, layout and button map.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if either mapping is rejected.
    pub fn decoder(&self) -> Result<InputDecoder, ConfigError> {
        Ok(InputDecoder::new(self.revision)
            .with_axis_layout(self.axis_layout()?)
            .with_button_map(self.button_map()?))
    }

    /// Base name for the ports: the configured name, else the device's
    /// product string, else the built-in product name.
    pub fn device_name(&self, identity: &HidDeviceInfo) -> String {
        self.name
            .clone()
            .or_else(|| identity.product_name.clone())
            .or_else(|| product_name(identity.product_id).map(str::to_string))
            .unwrap_or_else(|| identity.display_name())
    }
}
