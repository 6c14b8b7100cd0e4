//! Acoustic parameters per switch type.
//!
//! The table is built once and only ever hands out copies, so per-event
//! jitter applied by the synthesizer can never leak back into the base
//! timbre of another key.

use crate::constants::DEFAULT_SWITCH_ID;
use fnv::FnvHashMap;
use thiserror::Error;

/// Fixed acoustic parameter set for one switch type.
///
/// Fields:
/// - `body_frequency`: center pitch (Hz) of the low tonal thud on bottom-out
/// - `click_frequency`: pitch (Hz) of the click transient; `0.0` disables the click layer
/// - `filter_center_frequency`: center (Hz) of the bandpass shaping the noise body
/// - `filter_resonance`: Q of that bandpass
/// - `body_decay_time`: seconds for the noise-body envelope to reach the floor
/// - `click_decay_time`: seconds for the click envelope; ignored without a click
/// - `master_volume`: linear gain ceiling in (0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwitchProfile {
    pub body_frequency: f32,
    pub click_frequency: f32,
    pub filter_center_frequency: f32,
    pub filter_resonance: f32,
    pub body_decay_time: f32,
    pub click_decay_time: f32,
    pub master_volume: f32,
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("master_volume must be in (0, 1], got {0}")]
    VolumeOutOfRange(f32),
    #[error("click_decay_time must be positive when a click is present, got {0}")]
    MissingClickDecay(f32),
}

impl SwitchProfile {
    #[inline]
    pub fn has_click(&self) -> bool {
        self.click_frequency > 0.0
    }

    /// Check every field against its domain.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let positive = [
            ("body_frequency", self.body_frequency),
            ("filter_center_frequency", self.filter_center_frequency),
            ("filter_resonance", self.filter_resonance),
            ("body_decay_time", self.body_decay_time),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ProfileError::NotPositive { field, value });
            }
        }
        let non_negative = [
            ("click_frequency", self.click_frequency),
            ("click_decay_time", self.click_decay_time),
        ];
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(ProfileError::Negative { field, value });
            }
        }
        if self.master_volume.is_nan() || self.master_volume <= 0.0 || self.master_volume > 1.0 {
            return Err(ProfileError::VolumeOutOfRange(self.master_volume));
        }
        if self.has_click() && self.click_decay_time <= 0.0 {
            return Err(ProfileError::MissingClickDecay(self.click_decay_time));
        }
        Ok(())
    }
}

/// Linear, quiet. Also the fallback for unknown identifiers.
pub const RED: SwitchProfile = SwitchProfile {
    body_frequency: 180.0,
    click_frequency: 0.0,
    filter_center_frequency: 800.0,
    filter_resonance: 1.2,
    body_decay_time: 0.08,
    click_decay_time: 0.0,
    master_volume: 0.5,
};

/// Clicky: sharp high click over a bright body.
pub const BLUE: SwitchProfile = SwitchProfile {
    body_frequency: 220.0,
    click_frequency: 4200.0,
    filter_center_frequency: 1500.0,
    filter_resonance: 1.5,
    body_decay_time: 0.06,
    click_decay_time: 0.02,
    master_volume: 0.6,
};

/// Tactile: soft bump rendered as a lower, shorter click.
pub const BROWN: SwitchProfile = SwitchProfile {
    body_frequency: 200.0,
    click_frequency: 2200.0,
    filter_center_frequency: 1000.0,
    filter_resonance: 1.3,
    body_decay_time: 0.07,
    click_decay_time: 0.015,
    master_volume: 0.55,
};

/// Heavy linear: deeper, longer thock.
pub const BLACK: SwitchProfile = SwitchProfile {
    body_frequency: 150.0,
    click_frequency: 0.0,
    filter_center_frequency: 700.0,
    filter_resonance: 1.0,
    body_decay_time: 0.09,
    click_decay_time: 0.0,
    master_volume: 0.6,
};

/// Short-travel linear: tight, bright and quick.
pub const SPEED: SwitchProfile = SwitchProfile {
    body_frequency: 240.0,
    click_frequency: 0.0,
    filter_center_frequency: 1200.0,
    filter_resonance: 1.4,
    body_decay_time: 0.035,
    click_decay_time: 0.0,
    master_volume: 0.45,
};

pub const BUILTIN_PROFILES: [(&str, SwitchProfile); 5] = [
    ("red", RED),
    ("blue", BLUE),
    ("brown", BROWN),
    ("black", BLACK),
    ("speed", SPEED),
];

/// Switch-type identifier to profile map with a guaranteed fallback.
#[derive(Clone, Debug)]
pub struct ProfileTable {
    profiles: FnvHashMap<&'static str, SwitchProfile>,
    fallback: SwitchProfile,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileTable {
    pub fn builtin() -> Self {
        let mut profiles = FnvHashMap::default();
        for (id, profile) in BUILTIN_PROFILES {
            debug_assert!(profile.validate().is_ok(), "builtin profile '{id}' is invalid");
            profiles.insert(id, profile);
        }
        let fallback = profiles.get(DEFAULT_SWITCH_ID).copied().unwrap_or(RED);
        Self { profiles, fallback }
    }

    /// Resolve a switch identifier. Never fails: unknown ids get the default profile.
    pub fn lookup(&self, switch_id: &str) -> SwitchProfile {
        match self.profiles.get(switch_id) {
            Some(p) => *p,
            None => {
                log::debug!("[profile] unknown switch '{}', using '{}'", switch_id, DEFAULT_SWITCH_ID);
                self.fallback
            }
        }
    }

    pub fn contains(&self, switch_id: &str) -> bool {
        self.profiles.contains_key(switch_id)
    }

    /// Known identifiers, sorted for stable presentation.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.profiles.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
