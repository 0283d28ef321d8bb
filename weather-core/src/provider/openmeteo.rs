use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::model::ForecastRow;

use super::{WeatherError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

/// Hourly forecast for the current day from the Open-Meteo API (no key needed).
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn forecast_url(&self) -> String {
        format!("{}/v1/forecast", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    precipitation: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    hourly: Option<OmHourly>,
}

impl OmHourly {
    /// Zips the parallel arrays; hours with a missing value are dropped.
    fn into_rows(self) -> Vec<ForecastRow> {
        self.time
            .into_iter()
            .zip(self.temperature_2m)
            .zip(self.precipitation)
            .filter_map(|((time, temperature), precipitation)| {
                match (temperature, precipitation) {
                    (Some(temperature), Some(precipitation)) => Some(ForecastRow {
                        time,
                        temperature,
                        precipitation,
                    }),
                    _ => {
                        tracing::debug!(%time, "skipping hour with missing values");
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn search(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Vec<ForecastRow>>, WeatherError> {
        tracing::debug!(latitude, longitude, "requesting hourly forecast");

        let res = self
            .http
            .get(self.forecast_url())
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", "temperature_2m,precipitation".to_string()),
                ("timezone", "GMT".to_string()),
                ("forecast_days", "1".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OmResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        Ok(parsed.hourly.map(OmHourly::into_rows))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
