//! emulation module parameters.

use serde::Deserialize;

/// Mock geolocation coordinates.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationCoordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Accuracy in meters; 1.0 by default.
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Altitude in meters.
    #[serde(default)]
    pub altitude: Option<f64>,
    /// Altitude accuracy in meters.
    #[serde(default)]
    pub altitude_accuracy: Option<f64>,
    /// Heading in degrees.
    #[serde(default)]
    pub heading: Option<f64>,
    /// Speed in meters per second.
    #[serde(default)]
    pub speed: Option<f64>,
}

/// A simulated geolocation failure.
#[derive(Debug, Clone, Deserialize)]
pub struct GeolocationPositionError {
    /// Error kind; only "positionUnavailable".
    #[serde(rename = "type")]
    pub error_type: String,
}

/// Parameters for emulation.setGeolocationOverride.
///
/// Exactly one of `coordinates` and `error` may be present; both absent
/// clears the override.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetGeolocationOverrideParams {
    /// Coordinates to report.
    #[serde(default)]
    pub coordinates: Option<GeolocationCoordinates>,
    /// Failure to report instead of a position.
    #[serde(default)]
    pub error: Option<GeolocationPositionError>,
    /// Contexts to apply to.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
    /// User contexts to apply to.
    #[serde(default)]
    pub user_contexts: Option<Vec<String>>,
}

/// Parameters for emulation.setLocaleOverride.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetLocaleOverrideParams {
    /// Locale to report, e.g. "de-DE"; absent clears the override.
    #[serde(default)]
    pub locale: Option<String>,
    /// Contexts to apply to.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
    /// User contexts to apply to.
    #[serde(default)]
    pub user_contexts: Option<Vec<String>>,
}

/// Screen orientation natures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrientationNatural {
    /// Naturally portrait.
    Portrait,
    /// Naturally landscape.
    Landscape,
}

/// Screen orientation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrientationType {
    /// Portrait, primary position.
    PortraitPrimary,
    /// Portrait, upside down.
    PortraitSecondary,
    /// Landscape, primary position.
    LandscapePrimary,
    /// Landscape, secondary position.
    LandscapeSecondary,
}

/// A screen orientation override.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenOrientationOverride {
    /// The device's natural orientation.
    pub natural: OrientationNatural,
    /// The orientation to report.
    #[serde(rename = "type")]
    pub orientation_type: OrientationType,
}

/// Parameters for emulation.setScreenOrientationOverride.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetScreenOrientationOverrideParams {
    /// Orientation to report; absent clears the override.
    #[serde(default)]
    pub screen_orientation: Option<ScreenOrientationOverride>,
    /// Contexts to apply to.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
    /// User contexts to apply to.
    #[serde(default)]
    pub user_contexts: Option<Vec<String>>,
}

/// Parameters for emulation.setTimezoneOverride.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetTimezoneOverrideParams {
    /// Timezone to report, e.g. "Europe/Berlin" or an offset string;
    /// absent clears the override.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Contexts to apply to.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
    /// User contexts to apply to.
    #[serde(default)]
    pub user_contexts: Option<Vec<String>>,
}
