use crate::{Config, ForecastRow, provider::openmeteo::OpenMeteoProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod openmeteo;

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Weather service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not read forecast: {0}")]
    Parse(String),
}

/// Source of hourly forecasts for a coordinate pair.
///
/// `Ok(None)` means the service answered without a forecast block; callers
/// treat that the same as an empty forecast.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn search(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Vec<ForecastRow>>, WeatherError>;
}

/// Construct the forecast provider described by `config.weather`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let provider = OpenMeteoProvider::new(
        config.weather.base_url.clone(),
        Duration::from_secs(config.weather.timeout_secs),
    )?;

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_default_config_builds() {
        let cfg = Config::default();
        assert!(provider_from_config(&cfg).is_ok());
    }

    #[test]
    fn status_error_message_carries_body() {
        let err = WeatherError::Status {
            status: 400,
            body: "bad latitude".into(),
        };
        assert_eq!(
            err.to_string(),
            "Weather service responded with status 400: bad latitude"
        );
    }
}
