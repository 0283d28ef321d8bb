//! Static page shell: heading, intro, location menu and the output container.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::{
    Config,
    config::Messages,
    controller::Controller,
    document::{Document, DocumentSink, OUTPUT_CLASS},
    el,
    element::{Element, Listener},
    geolocation::{ConfiguredGeolocator, Geolocator},
    model::SearchLocation,
    provider::{WeatherProvider, provider_from_config},
    view::Renderer,
};

const BUTTON_CLASS: &str = "locations__button";

/// Searches started by button clicks that haven't been awaited yet.
type Pending = Arc<Mutex<Vec<JoinHandle<()>>>>;

/// Handle to a shell mounted into a [`Document`].
#[derive(Debug, Clone)]
pub struct Shell {
    document: Document,
    pending: Pending,
}

impl Shell {
    /// Wire a shell from configuration: Open-Meteo forecasts, configured
    /// geolocation, views rendered into `document`.
    pub fn from_config(config: &Config, document: &Document) -> anyhow::Result<Self> {
        config.validate()?;

        let provider = provider_from_config(config)?;
        let geolocator: Arc<dyn Geolocator> =
            Arc::new(ConfiguredGeolocator::new(config.geolocation.clone()));

        Ok(Self::with_collaborators(config, document, provider, geolocator))
    }

    pub fn with_collaborators(
        config: &Config,
        document: &Document,
        provider: Arc<dyn WeatherProvider>,
        geolocator: Arc<dyn Geolocator>,
    ) -> Self {
        let sink = Arc::new(DocumentSink::new(document.clone()));
        let renderer = Renderer::new(config.messages.clone(), sink);
        let controller = Controller::new(provider, geolocator, renderer)
            .with_discard_stale(config.discard_stale);

        render_shell(document, &config.locations, &config.messages, Arc::new(controller))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Titles of the location buttons, in menu order.
    pub fn titles(&self) -> Vec<String> {
        self.document.with_body(|body| {
            body.find_all_by_class(BUTTON_CLASS)
                .into_iter()
                .map(Element::text_content)
                .collect()
        })
    }

    /// Click the button titled `title`. Returns `false` if there is none.
    pub fn activate(&self, title: &str) -> bool {
        let listeners = self.document.with_body(|body| {
            body.find_all_by_class(BUTTON_CLASS)
                .into_iter()
                .find(|button| button.text_content() == title)
                .map(|button| button.listeners("click"))
        });

        match listeners {
            Some(listeners) => {
                tracing::debug!(title, "location activated");
                for listener in listeners {
                    listener.call();
                }
                true
            }
            None => {
                tracing::warn!(title, "no location button with that title");
                false
            }
        }
    }

    /// Wait for every search started by [`Shell::activate`] to settle.
    pub async fn settle(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.pending.lock());
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::error!(error = %e, "search task failed");
                }
            }
        }
    }

    /// Copy of the output container.
    pub fn output(&self) -> Option<Element> {
        self.document.query_class(OUTPUT_CLASS)
    }
}

fn render_location_button(title: &str, on_click: Listener) -> Element {
    el!(
        "li",
        { "class" => "locations__location" },
        el!("button", { "class" => BUTTON_CLASS, "click" => on_click }, title)
    )
}

/// Spawns `search` on the current runtime and tracks it in `pending`.
fn search_listener<F, Fut>(pending: &Pending, search: F) -> Listener
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let pending = pending.clone();
    Listener::new(move || match tokio::runtime::Handle::try_current() {
        Ok(runtime) => pending.lock().push(runtime.spawn(search())),
        Err(e) => tracing::error!(error = %e, "no async runtime to run the search on"),
    })
}

/// Build the page shell once and append it to the document body.
///
/// Every location gets a button; the entry titled like
/// `messages.current_location_entry` asks for the device position, the rest
/// search their own coordinates.
pub fn render_shell(
    document: &Document,
    locations: &[SearchLocation],
    messages: &Messages,
    controller: Arc<Controller>,
) -> Shell {
    let pending: Pending = Arc::default();

    let mut list = el!("ul", { "class" => "locations__list" });
    for location in locations {
        let controller = controller.clone();
        let on_click = if location.title == messages.current_location_entry {
            search_listener(&pending, move || {
                let controller = controller.clone();
                async move {
                    controller.on_search_my_location().await;
                }
            })
        } else {
            let location = location.clone();
            search_listener(&pending, move || {
                let controller = controller.clone();
                let location = location.clone();
                async move {
                    controller.on_search(&location).await;
                }
            })
        };
        list.append_child(render_location_button(&location.title, on_click));
    }

    let main = el!(
        "main",
        { "class" => "weather" },
        el!("header", {}, el!("h1", {}, &messages.page_title)),
        el!(
            "div",
            { "class" => "intro" },
            el!("p", {}, &messages.intro),
            el!("h2", {}, &messages.locations_heading)
        ),
        el!("div", { "class" => "locations" }, list),
        el!("div", { "class" => OUTPUT_CLASS })
    );

    document.with_body(|body| body.append_child(main));

    Shell {
        document: document.clone(),
        pending,
    }
}
