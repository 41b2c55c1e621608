use crate::models::gesture::Action;
use crate::models::input::VirtualKey;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Which key each steering action holds down
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyBindings {
    pub steer_left: VirtualKey,
    pub steer_right: VirtualKey,
    pub accelerate: VirtualKey,
    pub brake: VirtualKey,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            steer_left: VirtualKey::Left,
            steer_right: VirtualKey::Right,
            accelerate: VirtualKey::Up,
            brake: VirtualKey::Down,
        }
    }
}

impl KeyBindings {
    /// Key for an action; `Action::None` holds nothing
    pub fn key_for(&self, action: Action) -> Option<VirtualKey> {
        match action {
            Action::SteerLeft => Some(self.steer_left),
            Action::SteerRight => Some(self.steer_right),
            Action::Accelerate => Some(self.accelerate),
            Action::Brake => Some(self.brake),
            Action::None => None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Camera device index passed to the capture backend
    pub camera_index: u32,
    /// Delay before the first frame is read, giving the camera time to settle
    pub warmup_ms: u64,
    /// Minimum confidence for the palm detector (0.0-1.0)
    pub min_detection_confidence: f32,
    /// Minimum confidence for landmark tracking between frames (0.0-1.0)
    pub min_tracking_confidence: f32,
    /// Maximum number of hands the detector reports per frame
    pub max_num_hands: u32,
    /// Action to key mapping
    pub bindings: KeyBindings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_index: 0,
            warmup_ms: 2000,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            max_num_hands: 2,
            bindings: KeyBindings::default(),
        }
    }
}

impl Config {
    /// Load configuration from a specific file, creating it with defaults if missing
    pub fn load_from(config_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if !(0.0..=1.0).contains(&self.min_detection_confidence) {
            return Err(format!(
                "Invalid detection confidence: {}. Must be between 0.0 and 1.0",
                self.min_detection_confidence
            )
            .into());
        }

        if !(0.0..=1.0).contains(&self.min_tracking_confidence) {
            return Err(format!(
                "Invalid tracking confidence: {}. Must be between 0.0 and 1.0",
                self.min_tracking_confidence
            )
            .into());
        }

        if self.max_num_hands == 0 || self.max_num_hands > 4 {
            return Err(format!(
                "Invalid max hands: {}. Must be between 1 and 4",
                self.max_num_hands
            )
            .into());
        }

        if self.warmup_ms > 30_000 {
            return Err(format!(
                "Invalid warm-up delay: {} ms. Must be at most 30000",
                self.warmup_ms
            )
            .into());
        }

        let keys = [
            self.bindings.steer_left,
            self.bindings.steer_right,
            self.bindings.accelerate,
            self.bindings.brake,
        ];
        let distinct: HashSet<VirtualKey> = keys.iter().copied().collect();
        if distinct.len() != keys.len() {
            return Err("Key bindings must map each action to a different key".into());
        }

        Ok(())
    }

    /// Overwrite the file at `config_path` with the default configuration
    pub fn reset_at(config_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let config = Self::default();
        config.save_to(config_path)?;
        Ok(config)
    }

    /// Get the configuration file path
    pub fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| "Could not determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".gesture_drive");
        path.push("config");
        path.push("settings.json");

        Ok(path)
    }
}
