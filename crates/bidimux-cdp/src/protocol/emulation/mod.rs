//! Emulation domain types.
//!
//! Device, geolocation, locale, timezone and screen-orientation overrides
//! applied per attached target.

use serde::Serialize;

/// Screen orientation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScreenOrientationType {
    /// Portrait, the primary position.
    PortraitPrimary,
    /// Portrait, upside down.
    PortraitSecondary,
    /// Landscape, rotated counter-clockwise from portrait.
    LandscapePrimary,
    /// Landscape, rotated clockwise from portrait.
    LandscapeSecondary,
}

/// Screen orientation override.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenOrientation {
    /// Orientation type.
    #[serde(rename = "type")]
    pub orientation_type: ScreenOrientationType,
    /// Orientation angle in degrees.
    pub angle: i64,
}

/// Parameters for Emulation.setDeviceMetricsOverride.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetDeviceMetricsOverrideParams {
    /// Overriding width value in pixels. 0 disables the override.
    pub width: i64,
    /// Overriding height value in pixels. 0 disables the override.
    pub height: i64,
    /// Overriding device scale factor value. 0 disables the override.
    pub device_scale_factor: f64,
    /// Whether a mobile device is emulated.
    pub mobile: bool,
    /// Screen orientation override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_orientation: Option<ScreenOrientation>,
}

/// Parameters for Emulation.clearDeviceMetricsOverride.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ClearDeviceMetricsOverrideParams {}

/// Parameters for Emulation.setGeolocationOverride.
///
/// Sending the params with every position field absent makes geolocation
/// queries fail as if the position were unavailable.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetGeolocationOverrideParams {
    /// Mock latitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Mock longitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Mock accuracy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Mock altitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Mock altitude accuracy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude_accuracy: Option<f64>,
    /// Mock heading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    /// Mock speed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

/// Parameters for Emulation.clearGeolocationOverride.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ClearGeolocationOverrideParams {}

/// Parameters for Emulation.setLocaleOverride.
#[derive(Debug, Clone, Serialize, Default)]
pub struct SetLocaleOverrideParams {
    /// ICU style C locale, e.g. "en_US". Restores default when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Parameters for Emulation.setTimezoneOverride.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTimezoneOverrideParams {
    /// The timezone identifier, e.g. "Europe/Berlin". Empty string restores
    /// the default.
    pub timezone_id: String,
}

/// Parameters for Emulation.setScreenOrientationOverride.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScreenOrientationOverrideParams {
    /// Orientation angle in degrees.
    pub angle: i64,
    /// Orientation type.
    #[serde(rename = "type")]
    pub orientation_type: ScreenOrientationType,
}

/// Parameters for Emulation.setUserAgentOverride.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetUserAgentOverrideParams {
    /// User agent to use.
    pub user_agent: String,
    /// Browser language to emulate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_language: Option<String>,
    /// The platform navigator.platform should return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}
