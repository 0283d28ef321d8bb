//! Device position lookup.
//!
//! The platform capability sits behind [`Geolocator`]; failures come back as a
//! closed [`GeolocationError`] so callers switch on the kind.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::config::GeolocationConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("permission to read the device position was denied")]
    PermissionDenied,

    #[error("the device position is unavailable")]
    Unavailable,
}

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// Whether the platform offers a position at all.
    fn is_supported(&self) -> bool;

    async fn current_position(&self) -> Result<Position, GeolocationError>;
}

/// Geolocation driven by the `[geolocation]` config table.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredGeolocator {
    settings: Option<GeolocationConfig>,
}

impl ConfiguredGeolocator {
    pub fn new(settings: Option<GeolocationConfig>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Geolocator for ConfiguredGeolocator {
    fn is_supported(&self) -> bool {
        self.settings.is_some()
    }

    async fn current_position(&self) -> Result<Position, GeolocationError> {
        let settings = self
            .settings
            .as_ref()
            .ok_or(GeolocationError::Unavailable)?;

        if !settings.allow {
            return Err(GeolocationError::PermissionDenied);
        }

        match (settings.latitude, settings.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Position {
                latitude,
                longitude,
            }),
            _ => Err(GeolocationError::Unavailable),
        }
    }
}
