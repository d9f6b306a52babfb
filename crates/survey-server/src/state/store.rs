//! In-memory mission waypoint store using DashMap.

use chrono::Utc;
use dashmap::DashMap;
use survey_core::{MissionWaypoints, Pattern, Waypoint};

use crate::config::Config;

/// Application state - thread-safe store of waypoint sets keyed by mission.
pub struct AppState {
    missions: DashMap<String, MissionWaypoints>,
    config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            missions: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace every waypoint of a mission in one step.
    ///
    /// Readers see either the previous set or the new one, never a mix.
    pub fn replace_waypoints(
        &self,
        mission_id: &str,
        waypoints: Vec<Waypoint>,
        pattern: Option<Pattern>,
    ) -> MissionWaypoints {
        let record = MissionWaypoints {
            mission_id: mission_id.to_string(),
            waypoints,
            pattern,
            updated_at: Utc::now(),
        };
        self.missions.insert(mission_id.to_string(), record.clone());
        record
    }

    pub fn get_waypoints(&self, mission_id: &str) -> Option<MissionWaypoints> {
        self.missions.get(mission_id).map(|r| r.value().clone())
    }

    /// Drop a mission's waypoint set. Returns false if none was stored.
    pub fn remove_waypoints(&self, mission_id: &str) -> bool {
        self.missions.remove(mission_id).is_some()
    }

    pub fn mission_count(&self) -> usize {
        self.missions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waypoint(sequence_number: u32) -> Waypoint {
        Waypoint {
            sequence_number,
            latitude: 33.68,
            longitude: -117.82,
            altitude: 50.0,
        }
    }

    #[test]
    fn replace_overwrites_previous_set() {
        let state = AppState::new(Config::default());
        state.replace_waypoints("m1", vec![waypoint(1), waypoint(2), waypoint(3)], None);
        state.replace_waypoints("m1", vec![waypoint(1)], Some(Pattern::Perimeter));

        let stored = state.get_waypoints("m1").unwrap();
        assert_eq!(stored.waypoints.len(), 1);
        assert_eq!(stored.pattern, Some(Pattern::Perimeter));
        assert_eq!(state.mission_count(), 1);
    }

    #[test]
    fn remove_reports_missing_missions() {
        let state = AppState::new(Config::default());
        assert!(!state.remove_waypoints("nope"));
        state.replace_waypoints("m2", vec![waypoint(1)], None);
        assert!(state.remove_waypoints("m2"));
        assert!(state.get_waypoints("m2").is_none());
    }
}
