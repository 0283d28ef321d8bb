//! Loading, results and error views.
//!
//! The `*_view` functions are pure: they build an element tree. [`Renderer`]
//! mounts those trees into a [`ViewSink`], replacing whatever was shown.

use std::{fmt::Display, sync::Arc};

use crate::{
    config::Messages,
    el,
    element::Element,
    model::{ForecastRow, SearchLocation, ViewState},
};

/// Where rendered views end up.
pub trait ViewSink: Send + Sync {
    /// Replace the current contents with `tree`.
    fn mount(&self, tree: Element);

    fn clear(&self);
}

pub fn loading_view(messages: &Messages) -> Element {
    el!("p", {}, &messages.searching)
}

pub fn results_view(
    messages: &Messages,
    location: &SearchLocation,
    rows: &[ForecastRow],
) -> Element {
    let header = el!(
        "tr",
        {},
        el!("th", {}, &messages.hour_column),
        el!("th", {}, &messages.temperature_column),
        el!("th", {}, &messages.precipitation_column)
    );

    let mut tbody = el!("tbody");
    for row in rows {
        tbody.append_child(el!(
            "tr",
            {},
            el!("td", {}, row.hour()),
            el!("td", {}, row.temperature),
            el!("td", {}, row.precipitation)
        ));
    }

    let table = el!(
        "table",
        { "class" => "forecast" },
        el!("thead", {}, header),
        tbody
    );

    el!(
        "section",
        {},
        el!("h2", {}, &messages.results_heading),
        el!("h3", {}, &location.title),
        el!("p", {}, messages.coordinates_sentence(location.lat, location.lng)),
        table
    )
}

pub fn error_view(messages: &Messages, error: &dyn Display) -> Element {
    el!("p", {}, format!("{}{}", messages.error_prefix, error))
}

impl ViewState {
    pub fn view(&self, messages: &Messages) -> Element {
        match self {
            ViewState::Loading => loading_view(messages),
            ViewState::Results { location, rows } => results_view(messages, location, rows),
            ViewState::Error { message } => error_view(messages, message),
        }
    }
}

/// Mounts views into a sink using one set of messages.
#[derive(Clone)]
pub struct Renderer {
    messages: Messages,
    sink: Arc<dyn ViewSink>,
}

impl Renderer {
    pub fn new(messages: Messages, sink: Arc<dyn ViewSink>) -> Self {
        Self { messages, sink }
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn render(&self, state: &ViewState) {
        match state {
            ViewState::Loading => self.render_loading(),
            ViewState::Results { location, rows } => self.render_results(location, rows),
            ViewState::Error { message } => self.render_error(message),
        }
    }

    pub fn render_loading(&self) {
        self.sink.mount(loading_view(&self.messages));
    }

    pub fn render_results(&self, location: &SearchLocation, rows: &[ForecastRow]) {
        self.sink.mount(results_view(&self.messages, location, rows));
    }

    pub fn render_error(&self, error: &dyn Display) {
        tracing::debug!(%error, "rendering error view");
        self.sink.mount(error_view(&self.messages, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Node;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        mounted: Mutex<Vec<Element>>,
    }

    impl ViewSink for RecordingSink {
        fn mount(&self, tree: Element) {
            self.mounted.lock().push(tree);
        }

        fn clear(&self) {
            self.mounted.lock().clear();
        }
    }

    fn reykjavik() -> SearchLocation {
        SearchLocation::new("Reykjavík", 64.1355, -21.8954)
    }

    fn body_rows(table: &Element) -> Vec<&Element> {
        table
            .find_by_tag("tbody")
            .map(|tbody| tbody.elements().collect())
            .unwrap_or_default()
    }

    #[test]
    fn loading_is_single_paragraph() {
        let view = loading_view(&Messages::default());
        assert_eq!(view.tag(), "p");
        assert_eq!(view.text_content(), "Searching...");
    }

    #[test]
    fn results_table_has_row_per_entry() {
        let rows = vec![
            ForecastRow {
                time: "2024-06-01T14:30".into(),
                temperature: 11.2,
                precipitation: 0.4,
            },
            ForecastRow {
                time: "2024-06-01T15:30".into(),
                temperature: -0.5,
                precipitation: 0.0,
            },
        ];
        let view = results_view(&Messages::default(), &reykjavik(), &rows);

        assert_eq!(view.tag(), "section");
        let headings: Vec<String> = view.elements().take(3).map(Element::text_content).collect();
        assert_eq!(
            headings,
            vec![
                "Results".to_string(),
                "Reykjavík".to_string(),
                "Forecast for the day at latitude 64.1355 and longitude -21.8954.".to_string(),
            ]
        );

        let table = view.find_by_class("forecast").unwrap();
        let header = table.find_by_tag("thead").unwrap();
        assert_eq!(header.elements().count(), 1);
        assert_eq!(header.find_by_tag("tr").unwrap().elements().count(), 3);

        let body = body_rows(table);
        assert_eq!(body.len(), 2);
        let cells: Vec<String> = body[0].elements().map(Element::text_content).collect();
        assert_eq!(cells, vec!["14:30", "11.2", "0.4"]);
        let cells: Vec<String> = body[1].elements().map(Element::text_content).collect();
        assert_eq!(cells, vec!["15:30", "-0.5", "0"]);
    }

    #[test]
    fn empty_results_render_header_only_and_are_stable() {
        let messages = Messages::default();
        let first = results_view(&messages, &reykjavik(), &[]);
        let second = results_view(&messages, &reykjavik(), &[]);

        let table = first.find_by_class("forecast").unwrap();
        assert!(table.find_by_tag("thead").is_some());
        assert!(body_rows(table).is_empty());
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn error_view_is_prefix_plus_message() {
        let messages = Messages::default();
        for message in ["X", "Network error: connection refused", ""] {
            let view = error_view(&messages, &message);
            let text = view.text_content();
            assert!(text.starts_with(&messages.error_prefix));
            assert!(text.ends_with(message));
            assert_eq!(text.len(), messages.error_prefix.len() + message.len());
        }
    }

    #[test]
    fn each_render_replaces_previous_view() {
        let sink = Arc::new(RecordingSink::default());
        let renderer = Renderer::new(Messages::default(), sink.clone());

        renderer.render_loading();
        renderer.render_error(&"boom");

        let mounted = sink.mounted.lock();
        assert_eq!(mounted.len(), 2);
        assert_eq!(mounted[1].text_content(), "Error: boom");
        assert!(matches!(mounted[1].children()[0], Node::Text(_)));
    }

    #[test]
    fn render_routes_each_state_to_its_view() {
        let sink = Arc::new(RecordingSink::default());
        let messages = Messages::default();
        let renderer = Renderer::new(messages.clone(), sink.clone());
        let rows = vec![ForecastRow {
            time: "2024-06-01T09:00".into(),
            temperature: 4.0,
            precipitation: 0.1,
        }];

        renderer.render(&ViewState::Loading);
        renderer.render(&ViewState::Results {
            location: reykjavik(),
            rows: rows.clone(),
        });
        renderer.render(&ViewState::error("timed out"));

        let mounted = sink.mounted.lock();
        assert_eq!(mounted.len(), 3);
        assert_eq!(mounted[0].to_string(), loading_view(&messages).to_string());
        assert_eq!(
            mounted[1].to_string(),
            results_view(&messages, &reykjavik(), &rows).to_string()
        );
        assert_eq!(mounted[2].text_content(), "Error: timed out");
    }

    #[test]
    fn view_state_dispatches_to_matching_view() {
        let messages = Messages::default();
        assert_eq!(
            ViewState::Loading.view(&messages).to_string(),
            loading_view(&messages).to_string()
        );
        assert_eq!(
            ViewState::error("nope").view(&messages).text_content(),
            "Error: nope"
        );
    }
}
