use serde::{Deserialize, Serialize};

pub const GRID_SIZE_DEFAULT: usize = 3;
pub const GRID_SIZE_MIN: usize = 2;
pub const PIECE_SIZE_DEFAULT: f32 = 160.0;
pub const TAB_SIZE_DEFAULT: f32 = 25.0;
pub const SNAP_THRESHOLD_DEFAULT: f32 = 30.0;
pub const IMAGE_REF_DEFAULT: &str = "puzzle.jpg";

pub const PIN_CODE_DEFAULT: &str = "1202";
pub const PIN_CODE_LEN: usize = 4;
pub const SONG_VOLUME_DEFAULT: f32 = 0.3;
pub const EVADE_DISTANCE_DEFAULT: f32 = 150.0;
pub const SONG_REF_DEFAULT: &str = "love-song.mp3";
pub const LETTER_DEFAULT: &str = "You said yes ♡";

/// Bulb half-width as a multiple of the tab size.
pub const BULB_WIDTH_RATIO: f32 = 1.2;
/// Neck half-width as a multiple of the tab size.
pub const NECK_WIDTH_RATIO: f32 = 0.6;

pub const PLEAS_DEFAULT: [&str; 9] = [
    "why do you not love me :<",
    "say yes please",
    "i love you",
    "okay you dont love me",
    "please love me",
    "why u no love me :<",
    "im gonna cry",
    "im not your baby anymore",
    "you hurt meee :<",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("grid size must be at least {min}, got {found}")]
    GridTooSmall { min: usize, found: usize },
    #[error("piece size must be a positive number, got {0}")]
    PieceSize(f32),
    #[error("tab size {tab} does not fit a piece of size {piece}")]
    TabSize { tab: f32, piece: f32 },
    #[error("snap threshold must be a non-negative number, got {0}")]
    SnapThreshold(f32),
    #[error("missing puzzle image reference")]
    MissingImage,
    #[error("pin code must be {expected} digits")]
    PinCode { expected: usize },
    #[error("at least one plea message is required")]
    NoPleas,
    #[error("song volume must be within 0..=1, got {0}")]
    Volume(f32),
    #[error("evade distance must be a non-negative number, got {0}")]
    EvadeDistance(f32),
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PuzzleConfig {
    pub grid_size: usize,
    pub piece_size: f32,
    pub tab_size: f32,
    pub snap_threshold: f32,
    pub image_ref: String,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE_DEFAULT,
            piece_size: PIECE_SIZE_DEFAULT,
            tab_size: TAB_SIZE_DEFAULT,
            snap_threshold: SNAP_THRESHOLD_DEFAULT,
            image_ref: IMAGE_REF_DEFAULT.to_string(),
        }
    }
}

impl PuzzleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < GRID_SIZE_MIN {
            return Err(ConfigError::GridTooSmall {
                min: GRID_SIZE_MIN,
                found: self.grid_size,
            });
        }
        if !self.piece_size.is_finite() || self.piece_size <= 0.0 {
            return Err(ConfigError::PieceSize(self.piece_size));
        }
        let fits = self.tab_size * BULB_WIDTH_RATIO <= self.piece_size * 0.5;
        if !self.tab_size.is_finite() || self.tab_size <= 0.0 || !fits {
            return Err(ConfigError::TabSize {
                tab: self.tab_size,
                piece: self.piece_size,
            });
        }
        if !self.snap_threshold.is_finite() || self.snap_threshold < 0.0 {
            return Err(ConfigError::SnapThreshold(self.snap_threshold));
        }
        if self.image_ref.trim().is_empty() {
            return Err(ConfigError::MissingImage);
        }
        Ok(())
    }

    pub fn total_pieces(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Edge length of the assembled picture.
    pub fn board_size(&self) -> f32 {
        self.grid_size as f32 * self.piece_size
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    pub pin_code: String,
    pub puzzle: PuzzleConfig,
    pub pleas: Vec<String>,
    pub song_volume: f32,
    /// Empty disables the song.
    pub song_ref: String,
    pub evade_distance: f32,
    pub letter: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            pin_code: PIN_CODE_DEFAULT.to_string(),
            puzzle: PuzzleConfig::default(),
            pleas: PLEAS_DEFAULT.iter().map(|plea| plea.to_string()).collect(),
            song_volume: SONG_VOLUME_DEFAULT,
            song_ref: SONG_REF_DEFAULT.to_string(),
            evade_distance: EVADE_DISTANCE_DEFAULT,
            letter: LETTER_DEFAULT.to_string(),
        }
    }
}

impl PageConfig {
    pub fn from_json(value: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = serde_json::from_str(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.puzzle.validate()?;
        let pin_ok = self.pin_code.len() == PIN_CODE_LEN
            && self.pin_code.chars().all(|ch| ch.is_ascii_digit());
        if !pin_ok {
            return Err(ConfigError::PinCode {
                expected: PIN_CODE_LEN,
            });
        }
        if self.pleas.is_empty() {
            return Err(ConfigError::NoPleas);
        }
        if !(0.0..=1.0).contains(&self.song_volume) {
            return Err(ConfigError::Volume(self.song_volume));
        }
        if !self.evade_distance.is_finite() || self.evade_distance < 0.0 {
            return Err(ConfigError::EvadeDistance(self.evade_distance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(PageConfig::default().validate().is_ok());
        assert_eq!(PuzzleConfig::default().total_pieces(), 9);
        assert_eq!(PuzzleConfig::default().board_size(), 480.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            PageConfig::from_json(r#"{"pinCode":"4321","puzzle":{"snapThreshold":12.5}}"#)
                .expect("valid config");
        assert_eq!(config.pin_code, "4321");
        assert_eq!(config.puzzle.snap_threshold, 12.5);
        assert_eq!(config.puzzle.grid_size, GRID_SIZE_DEFAULT);
        assert_eq!(config.pleas.len(), PLEAS_DEFAULT.len());
    }

    #[test]
    fn oversized_tab_is_rejected() {
        let config = PuzzleConfig {
            tab_size: 70.0,
            ..PuzzleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TabSize { .. })
        ));
    }

    #[test]
    fn bad_pin_and_json_are_rejected() {
        assert!(matches!(
            PageConfig::from_json(r#"{"pinCode":"12a4"}"#),
            Err(ConfigError::PinCode { .. })
        ));
        assert!(matches!(
            PageConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
