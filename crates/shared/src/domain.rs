use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl FromStr for Orientation {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "h" | "horizontal" => Ok(Self::Horizontal),
            "v" | "vertical" => Ok(Self::Vertical),
            _ => Err(ParseEnumError::new("orientation", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justification {
    Left,
    Right,
    Center,
    Fill,
}

impl FromStr for Justification {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "center" => Ok(Self::Center),
            "fill" => Ok(Self::Fill),
            _ => Err(ParseEnumError::new("justify", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    None,
    Crossfade,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
}

impl FromStr for Transition {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "crossfade" => Ok(Self::Crossfade),
            "slide_left" => Ok(Self::SlideLeft),
            "slide_right" => Ok(Self::SlideRight),
            "slide_up" => Ok(Self::SlideUp),
            "slide_down" => Ok(Self::SlideDown),
            _ => Err(ParseEnumError::new("transition", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollPolicy {
    Always,
    Automatic,
    External,
    Never,
}

impl FromStr for ScrollPolicy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "automatic" => Ok(Self::Automatic),
            "external" => Ok(Self::External),
            "never" => Ok(Self::Never),
            _ => Err(ParseEnumError::new("scroll policy", s)),
        }
    }
}

/// Device state vocabulary. Native codes outside the known table map to
/// `Unknown`, never to a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceState {
    Unmanaged,
    Unavailable,
    Disconnected,
    Prepare,
    Config,
    NeedAuth,
    IpConfig,
    IpCheck,
    Secondaries,
    Activated,
    Deactivating,
    Failed,
    Unknown,
}

impl DeviceState {
    pub fn from_code(code: u32) -> Self {
        match code {
            10 => Self::Unmanaged,
            20 => Self::Unavailable,
            30 => Self::Disconnected,
            40 => Self::Prepare,
            50 => Self::Config,
            60 => Self::NeedAuth,
            70 => Self::IpConfig,
            80 => Self::IpCheck,
            90 => Self::Secondaries,
            100 => Self::Activated,
            110 => Self::Deactivating,
            120 => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

/// Coarse internet status classified from a connection-activation state code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Internet {
    Connected,
    Connecting,
    Disconnected,
}

impl Internet {
    pub fn from_activation_code(code: u32) -> Self {
        match code {
            1 => Self::Connecting,
            2 => Self::Connected,
            _ => Self::Disconnected,
        }
    }
}

/// Internet-reachability classification reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    None,
    Portal,
    Limited,
    Full,
    #[default]
    Unknown,
}

impl Connectivity {
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Self::None,
            2 => Self::Portal,
            3 => Self::Limited,
            4 => Self::Full,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryKind {
    Wifi,
    Wired,
}

impl PrimaryKind {
    /// Maps a native connection type string onto the primary kind.
    /// Unmapped types yield `None`, not an error.
    pub fn from_connection_type(connection_type: &str) -> Option<Self> {
        match connection_type {
            "802-11-wireless" => Some(Self::Wifi),
            "802-3-ethernet" => Some(Self::Wired),
            _ => Option::None,
        }
    }
}

/// Derived network state, recomputed atomically on every triggering event.
/// Consumers always observe a self-consistent pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub primary: Option<PrimaryKind>,
    pub connectivity: Connectivity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPointInfo {
    pub ssid: String,
    pub strength: u8,
    pub frequency_mhz: u32,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_accepts_short_and_full_names() {
        assert_eq!("v".parse::<Orientation>().unwrap(), Orientation::Vertical);
        assert_eq!("H".parse::<Orientation>().unwrap(), Orientation::Horizontal);
        assert_eq!(
            "VERTICAL".parse::<Orientation>().unwrap(),
            Orientation::Vertical
        );
        assert!("diagonal".parse::<Orientation>().is_err());
    }

    #[test]
    fn device_state_codes_map_to_fixed_vocabulary() {
        assert_eq!(DeviceState::from_code(60), DeviceState::NeedAuth);
        assert_eq!(DeviceState::from_code(100), DeviceState::Activated);
        assert_eq!(DeviceState::from_code(7), DeviceState::Unknown);
        assert_eq!(DeviceState::from_code(0), DeviceState::Unknown);
    }

    #[test]
    fn connectivity_codes_fall_back_to_unknown() {
        assert_eq!(Connectivity::from_code(2), Connectivity::Portal);
        assert_eq!(Connectivity::from_code(4), Connectivity::Full);
        assert_eq!(Connectivity::from_code(99), Connectivity::Unknown);
    }

    #[test]
    fn primary_kind_ignores_unmapped_connection_types() {
        assert_eq!(
            PrimaryKind::from_connection_type("802-11-wireless"),
            Some(PrimaryKind::Wifi)
        );
        assert_eq!(
            PrimaryKind::from_connection_type("802-3-ethernet"),
            Some(PrimaryKind::Wired)
        );
        assert_eq!(PrimaryKind::from_connection_type("tun"), None);
    }

    #[test]
    fn internet_classifies_activation_codes() {
        assert_eq!(Internet::from_activation_code(1), Internet::Connecting);
        assert_eq!(Internet::from_activation_code(2), Internet::Connected);
        assert_eq!(Internet::from_activation_code(0), Internet::Disconnected);
        assert_eq!(Internet::from_activation_code(4), Internet::Disconnected);
    }
}
