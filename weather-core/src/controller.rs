//! Search flow: loading → fetch → results or error.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    geolocation::{GeolocationError, Geolocator},
    model::{SearchLocation, ViewState},
    provider::WeatherProvider,
    view::Renderer,
};

/// Drives the output container through one search at a time per call.
///
/// Calls are independent and may overlap. Every call takes a generation
/// number when it starts; with `discard_stale` on, a call that settles after
/// a newer one was issued does not render.
pub struct Controller {
    provider: Arc<dyn WeatherProvider>,
    geolocator: Arc<dyn Geolocator>,
    renderer: Renderer,
    generation: AtomicU64,
    discard_stale: bool,
}

impl Controller {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        geolocator: Arc<dyn Geolocator>,
        renderer: Renderer,
    ) -> Self {
        Self {
            provider,
            geolocator,
            renderer,
            generation: AtomicU64::new(0),
            discard_stale: true,
        }
    }

    /// With `false`, whichever call settles last wins the output container.
    pub fn with_discard_stale(mut self, discard_stale: bool) -> Self {
        self.discard_stale = discard_stale;
        self
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_stale(&self, token: u64) -> bool {
        self.discard_stale && self.generation.load(Ordering::SeqCst) != token
    }

    fn settle(&self, token: u64, state: ViewState) -> ViewState {
        if self.is_stale(token) {
            tracing::info!(token, "search was overtaken by a newer one, discarding result");
        } else {
            self.renderer.render(&state);
        }
        state
    }

    /// Search the forecast for `location` and render the outcome.
    pub async fn on_search(&self, location: &SearchLocation) -> ViewState {
        let token = self.begin();
        tracing::debug!(token, title = %location.title, "search started");
        self.renderer.render_loading();

        let Some((lat, lng)) = location.coordinates() else {
            let message = self.renderer.messages().missing_coordinates.clone();
            return self.settle(token, ViewState::error(message));
        };

        let state = match self.provider.search(lat, lng).await {
            Ok(rows) => ViewState::Results {
                location: location.clone(),
                rows: rows.unwrap_or_default(),
            },
            Err(error) => {
                tracing::warn!(token, title = %location.title, %error, "forecast request failed");
                ViewState::error(error.to_string())
            }
        };

        tracing::debug!(token, error = state.is_error(), "search settled");
        self.settle(token, state)
    }

    /// Ask the platform for the device position, then search there.
    pub async fn on_search_my_location(&self) -> ViewState {
        let messages = self.renderer.messages();

        if !self.geolocator.is_supported() {
            let token = self.begin();
            tracing::warn!("geolocation is not supported");
            return self.settle(token, ViewState::error(&messages.geolocation_unsupported));
        }

        let token = self.begin();
        self.renderer.render_loading();

        match self.geolocator.current_position().await {
            Ok(position) => {
                if self.is_stale(token) {
                    tracing::info!(token, "position arrived after a newer search, not searching");
                    return ViewState::Loading;
                }
                let location = SearchLocation::new(
                    &messages.current_location_title,
                    position.latitude,
                    position.longitude,
                );
                self.on_search(&location).await
            }
            Err(error) => {
                tracing::warn!(token, %error, "geolocation failed");
                let message = match error {
                    GeolocationError::PermissionDenied => &messages.geolocation_denied,
                    GeolocationError::Unavailable => &messages.geolocation_failed,
                };
                self.settle(token, ViewState::error(message))
            }
        }
    }
}
