//! Constellation settings
//!
//! Never read from disk. The host page may pass a JSON object to the driver;
//! missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::graph::ProximityParams;
use crate::platform::DeviceClass;
use crate::renderer::vertex::colors;

/// Tunables for one constellation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Population ===
    /// Points on touch / constrained devices
    pub touch_population: usize,
    /// Points on desktop
    pub desktop_population: usize,

    // === Graph ===
    /// Proximity threshold in pixels
    pub max_distance: f32,
    /// Edges kept per vertex
    pub max_neighbors: usize,
    /// Vertex count above which the R-tree builder is used
    pub index_threshold: usize,

    // === Motion ===
    /// Width of the symmetric initial velocity range
    pub velocity_spread: f32,

    // === Look ===
    pub dot_radius: f32,
    pub line_width: f32,
    /// RGB, 0.0 - 1.0
    pub color: [f32; 3],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            touch_population: TOUCH_POPULATION,
            desktop_population: DESKTOP_POPULATION,

            max_distance: MAX_DISTANCE,
            max_neighbors: MAX_NEIGHBORS,
            index_threshold: INDEX_THRESHOLD,

            velocity_spread: VELOCITY_SPREAD,

            dot_radius: DOT_RADIUS,
            line_width: LINE_WIDTH,
            color: colors::STAR,
        }
    }
}

impl Settings {
    /// Population for a device class
    pub fn population_for(&self, class: DeviceClass) -> usize {
        match class {
            DeviceClass::Touch => self.touch_population,
            DeviceClass::Desktop => self.desktop_population,
        }
    }

    /// Graph parameters derived from these settings
    pub fn proximity_params(&self) -> ProximityParams {
        ProximityParams {
            max_distance: self.max_distance,
            max_neighbors: self.max_neighbors,
            index_threshold: self.index_threshold,
        }
    }

    /// Parse host-supplied JSON, defaults for anything missing
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse host-supplied JSON, falling back to defaults on error
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json {
            Some(json) => match Self::from_json(json) {
                Ok(settings) => {
                    log::info!("Loaded settings from host");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring invalid settings ({}), using defaults", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_consts() {
        let s = Settings::default();
        assert_eq!(s.population_for(DeviceClass::Touch), 30);
        assert_eq!(s.population_for(DeviceClass::Desktop), 70);
        assert_eq!(s.proximity_params(), ProximityParams::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{ "max_distance": 120.0, "desktop_population": 90 }"#)
            .expect("valid json");
        assert_eq!(s.max_distance, 120.0);
        assert_eq!(s.desktop_population, 90);
        assert_eq!(s.touch_population, TOUCH_POPULATION);
        assert_eq!(s.max_neighbors, MAX_NEIGHBORS);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let s = Settings::from_json(r#"{ "sparkles": true }"#).expect("valid json");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_huge_neighbor_cap_from_host_is_harmless() {
        use crate::{Constellation, Viewport};

        for json in [
            r#"{"max_neighbors":18446744073709551615}"#,
            r#"{"max_neighbors":100000000000}"#,
        ] {
            let s = Settings::from_json_or_default(Some(json));
            assert!(s.max_neighbors > MAX_NEIGHBORS, "{json}");

            let mut state = Constellation::new(Viewport::new(100.0, 100.0), 2);
            state.initialize(2);
            let graph = state.compute_proximity_graph(&s.proximity_params());
            // Every vertex links to both others inside a 100px viewport
            assert_eq!(graph.edges.len(), 3 * 2, "{json}");
        }
    }

    #[test]
    fn test_default_color_is_star_white() {
        assert_eq!(Settings::default().color, colors::STAR);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        assert!(Settings::from_json("{ nope").is_err());
        assert_eq!(Settings::from_json_or_default(Some("{ nope")), Settings::default());
        assert_eq!(Settings::from_json_or_default(None), Settings::default());
    }
}
