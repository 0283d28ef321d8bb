use serde::{Deserialize, Serialize};

/// A selectable place. The entry without coordinates stands for the current
/// device position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchLocation {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl SearchLocation {
    pub fn new(title: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            title: title.into(),
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    /// The coordinate-less "use my current location" entry.
    pub fn current_position(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lat: None,
            lng: None,
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lng)
    }
}

/// One hourly forecast entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    /// ISO-8601 local timestamp, e.g. `2024-06-01T14:00`.
    pub time: String,
    pub temperature: f64,
    pub precipitation: f64,
}

impl ForecastRow {
    /// Time-of-day part of the timestamp: everything after the first `T`.
    pub fn hour(&self) -> &str {
        self.time
            .split_once('T')
            .map_or(self.time.as_str(), |(_, time)| time)
    }
}

/// What the output container currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Results {
        location: SearchLocation,
        rows: Vec<ForecastRow>,
    },
    Error {
        message: String,
    },
}

impl ViewState {
    pub fn error(message: impl Into<String>) -> Self {
        ViewState::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ViewState::Error { .. })
    }
}
