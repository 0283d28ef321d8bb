//! In-memory document the shell is mounted into.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::{
    element::{self, Element},
    view::ViewSink,
};

/// Class of the single element views are rendered into.
pub const OUTPUT_CLASS: &str = "output";

/// Shared handle to a document body. Clones point at the same tree.
#[derive(Debug, Clone)]
pub struct Document {
    body: Arc<Mutex<Element>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            body: Arc::new(Mutex::new(Element::new("body"))),
        }
    }

    /// Runs `f` with exclusive access to the body. Don't dispatch events from
    /// inside `f`: listeners may render back into this document.
    pub fn with_body<R>(&self, f: impl FnOnce(&mut Element) -> R) -> R {
        f(&mut self.body.lock())
    }

    pub fn snapshot(&self) -> Element {
        self.body.lock().clone()
    }

    /// Copy of the first element carrying `class`.
    pub fn query_class(&self, class: &str) -> Option<Element> {
        self.body.lock().find_by_class(class).cloned()
    }
}

/// Renders views into the document's `.output` element.
#[derive(Debug, Clone)]
pub struct DocumentSink {
    document: Document,
}

impl DocumentSink {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl ViewSink for DocumentSink {
    fn mount(&self, tree: Element) {
        self.document.with_body(|body| match body.find_by_class_mut(OUTPUT_CLASS) {
            Some(output) => {
                element::empty(output);
                output.append_child(tree);
            }
            None => tracing::warn!("no .{OUTPUT_CLASS} element in document, dropping view"),
        });
    }

    fn clear(&self) {
        self.document.with_body(|body| match body.find_by_class_mut(OUTPUT_CLASS) {
            Some(output) => element::empty(output),
            None => tracing::warn!("no .{OUTPUT_CLASS} element in document"),
        });
    }
}
