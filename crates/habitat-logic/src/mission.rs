//! Mission parameters: crew size, duration and destination.

use serde::{Deserialize, Serialize};

/// Locations offered by the designer. Any label is accepted.
pub const LOCATIONS: [&str; 3] = ["Moon", "Mars", "Outer Space"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionParams {
    pub crew_size: u32,
    /// Mission length in days.
    pub mission_duration_days: u32,
    /// Destination label. Not used by any calculation.
    pub location: String,
}

impl Default for MissionParams {
    fn default() -> Self {
        Self {
            crew_size: 6,
            mission_duration_days: 540,
            location: "Mars".to_string(),
        }
    }
}

impl MissionParams {
    /// Crew size with a floor of one, for per-crew divisions.
    pub fn crew_divisor(&self) -> f64 {
        self.crew_size.max(1) as f64
    }
}
