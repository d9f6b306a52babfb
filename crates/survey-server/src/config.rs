//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Altitude applied to planned waypoints when a request gives none
    pub default_altitude_m: f64,
    /// Largest waypoint set accepted for one mission
    pub max_waypoints: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_altitude_m: 50.0,
            max_waypoints: 10_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("SURVEY_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            default_altitude_m: env::var("SURVEY_DEFAULT_ALTITUDE_M")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|alt| alt.is_finite() && *alt > 0.0)
                .unwrap_or(defaults.default_altitude_m),
            max_waypoints: env::var("SURVEY_MAX_WAYPOINTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_waypoints),
        }
    }
}
