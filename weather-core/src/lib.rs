//! Core library for the hourly forecast browser.
//!
//! This crate defines:
//! - A declarative element builder and an in-memory document
//! - Loading / results / error views rendered into a view sink
//! - The search flow driving those views, including device geolocation
//! - The page shell with its location menu
//! - Configuration & the Open-Meteo forecast provider
//!
//! It is used by `weather-cli`, but can also be reused by other hosts.

pub mod config;
pub mod controller;
pub mod document;
pub mod element;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod shell;
pub mod view;

pub use config::{Config, ConfigError, GeolocationConfig, Messages, WeatherConfig};
pub use controller::Controller;
pub use document::{Document, DocumentSink};
pub use element::{Element, Listener, Node, el, empty};
pub use geolocation::{ConfiguredGeolocator, GeolocationError, Geolocator, Position};
pub use model::{ForecastRow, SearchLocation, ViewState};
pub use provider::{WeatherError, WeatherProvider};
pub use shell::{Shell, render_shell};
pub use view::{Renderer, ViewSink};
