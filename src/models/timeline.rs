use serde::{Deserialize, Serialize};

/// One control point of the rainfall step function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RainfallPoint {
    /// Hours since simulation start
    pub time: i64,
    /// Millimetres
    pub rainfall: i64,
}

impl RainfallPoint {
    pub fn new(time: i64, rainfall: i64) -> Self {
        RainfallPoint { time, rainfall }
    }
}

impl Default for RainfallPoint {
    fn default() -> Self {
        RainfallPoint {
            time: 0,
            rainfall: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineField {
    Time,
    Rainfall,
}
