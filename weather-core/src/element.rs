//! Declarative element trees.
//!
//! A small DOM-like model: elements carry a tag, a class list, attributes,
//! event listeners and child nodes. Trees are built with [`el`] (or the
//! [`el!`](crate::el) macro) and serialised to HTML through `Display`.

use std::{fmt, sync::Arc};

/// Attribute keys that register a listener instead of setting an attribute.
pub const KNOWN_EVENTS: &[&str] = &[
    "blur", "change", "click", "contextmenu", "dblclick", "focus", "input", "keydown", "keypress",
    "keyup", "mousedown", "mouseenter", "mouseleave", "mousemove", "mouseout", "mouseover",
    "mouseup", "reset", "submit",
];

pub fn is_known_event(name: &str) -> bool {
    KNOWN_EVENTS.contains(&name)
}

/// Event callback attached to an element.
#[derive(Clone)]
pub struct Listener(Arc<dyn Fn() + Send + Sync>);

impl Listener {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Listener(..)")
    }
}

/// Value side of an attribute pair passed to [`el`].
#[derive(Debug, Clone)]
pub enum AttrValue {
    Text(String),
    Listener(Listener),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<Listener> for AttrValue {
    fn from(value: Listener) -> Self {
        AttrValue::Listener(value)
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) => Some(t),
            Node::Element(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

/// A child argument to [`el`]; `Child(None)` is skipped.
#[derive(Debug, Clone)]
pub struct Child(Option<Node>);

impl Child {
    pub fn skip() -> Self {
        Child(None)
    }
}

impl From<Node> for Child {
    fn from(value: Node) -> Self {
        Child(Some(value))
    }
}

impl From<Element> for Child {
    fn from(value: Element) -> Self {
        Child(Some(Node::Element(value)))
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child(Some(Node::Text(value.to_string())))
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child(Some(Node::Text(value)))
    }
}

impl From<&String> for Child {
    fn from(value: &String) -> Self {
        Child(Some(Node::Text(value.clone())))
    }
}

macro_rules! child_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Child {
                fn from(value: $ty) -> Self {
                    Child(Some(Node::Text(value.to_string())))
                }
            }
        )*
    };
}

child_from_number!(f32, f64, i32, i64, u32, u64, usize);

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(value: Option<T>) -> Self {
        value.map_or(Child(None), Into::into)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    listeners: Vec<(String, Listener)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `name`, replacing an earlier value in place.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn add_event_listener(&mut self, event: &str, listener: Listener) {
        self.listeners.push((event.to_string(), listener));
    }

    /// Listeners registered for `event`, in registration order.
    pub fn listeners(&self, event: &str) -> Vec<Listener> {
        self.listeners
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, l)| l.clone())
            .collect()
    }

    /// Invokes every listener for `event` and returns how many ran.
    pub fn dispatch(&self, event: &str) -> usize {
        let listeners = self.listeners(event);
        for listener in &listeners {
            listener.call();
        }
        listeners.len()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn append_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    pub fn append_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Child elements, skipping text nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    /// First element in document order (self included) carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.elements().find_map(|e| e.find_by_class(class))
    }

    pub fn find_by_class_mut(&mut self, class: &str) -> Option<&mut Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            Node::Element(e) => e.find_by_class_mut(class),
            Node::Text(_) => None,
        })
    }

    pub fn find_all_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            found.push(self);
        }
        for e in self.elements() {
            e.collect_by_class(class, found);
        }
    }

    /// First element in document order (self included) with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Element> {
        if self.tag == tag {
            return Some(self);
        }
        self.elements().find_map(|e| e.find_by_tag(tag))
    }
}

/// Builds an element from a tag, attribute pairs and children.
///
/// An attribute whose key is a known event and whose value is a listener
/// registers that listener. `class` sets the class list. Anything else is a
/// plain attribute. Absent children are skipped.
pub fn el(tag: &str, attributes: Vec<(&str, AttrValue)>, children: Vec<Child>) -> Element {
    let mut element = Element::new(tag);

    for (key, value) in attributes {
        match value {
            AttrValue::Listener(listener) if is_known_event(key) => {
                element.add_event_listener(key, listener);
            }
            AttrValue::Listener(_) => {
                tracing::debug!(tag, key, "listener passed under a non-event key, ignoring");
            }
            AttrValue::Text(text) if key == "class" => {
                for class in text.split_whitespace() {
                    element.add_class(class);
                }
            }
            AttrValue::Text(text) => element.set_attribute(key, text),
        }
    }

    for node in children.into_iter().filter_map(|Child(node)| node) {
        element.append_child(node);
    }

    element
}

/// Removes every child node from `container`; everything else is kept.
pub fn empty(container: &mut Element) {
    container.children.clear();
}

/// `el!(tag)` or `el!(tag, { key => value, .. }, child, ..)`.
#[macro_export]
macro_rules! el {
    ($tag:expr, { $($key:expr => $val:expr),* $(,)? } $(, $child:expr)* $(,)?) => {
        $crate::element::el(
            $tag,
            vec![$(($key, $crate::element::AttrValue::from($val))),*],
            vec![$($crate::element::Child::from($child)),*],
        )
    };
    ($tag:expr) => {
        $crate::element::el($tag, vec![], vec![])
    };
}

fn escape_into(f: &mut fmt::Formatter<'_>, text: &str, attribute: bool) -> fmt::Result {
    for c in text.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' if attribute => f.write_str("&quot;")?,
            c => write!(f, "{c}")?,
        }
    }
    Ok(())
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(e) => e.fmt(f),
            Node::Text(t) => escape_into(f, t, false),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        if !self.classes.is_empty() {
            f.write_str(" class=\"")?;
            escape_into(f, &self.classes.join(" "), true)?;
            f.write_str("\"")?;
        }
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"")?;
            escape_into(f, value, true)?;
            f.write_str("\"")?;
        }
        f.write_str(">")?;
        for child in &self.children {
            child.fmt(f)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn text_child_round_trips_primitive() {
        let p = el!("p", {}, 21.5, "hello", 0);

        let texts: Vec<&str> = p.children().iter().filter_map(Node::as_text).collect();
        assert_eq!(texts, vec!["21.5", "hello", "0"]);
    }

    #[test]
    fn absent_children_are_skipped() {
        let missing: Option<&str> = None;
        let div = el!("div", {}, missing, Some("kept"), Child::skip());

        assert_eq!(div.children().len(), 1);
        assert_eq!(div.text_content(), "kept");
    }

    #[test]
    fn class_key_sets_class_list() {
        let li = el!("li", { "class" => "locations__location active", "id" => "x" });

        assert!(li.has_class("locations__location"));
        assert!(li.has_class("active"));
        assert_eq!(li.attribute("class"), None);
        assert_eq!(li.attribute("id"), Some("x"));
    }

    #[test]
    fn event_key_registers_listener() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let button = el!(
            "button",
            { "click" => Listener::new(move || { counter.fetch_add(1, Ordering::SeqCst); }) },
            "Go"
        );

        assert_eq!(button.attribute("click"), None);
        assert_eq!(button.dispatch("click"), 1);
        assert_eq!(button.dispatch("submit"), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let counter = hits.clone();
        let link = el!(
            "a",
            { "onward" => Listener::new(move || { counter.fetch_add(1, Ordering::SeqCst); }) },
            "Go"
        );

        assert_eq!(link.attribute("onward"), None);
        assert!(link.listeners("onward").is_empty());
        assert_eq!(link.dispatch("onward"), 0);
        assert_eq!(link.to_string(), "<a>Go</a>");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn later_attribute_overwrites_earlier() {
        let a = el!("a", { "href" => "/one", "href" => "/two" });
        assert_eq!(a.attribute("href"), Some("/two"));
        assert_eq!(a.to_string(), r#"<a href="/two"></a>"#);
    }

    #[test]
    fn empty_removes_children_only() {
        let mut out = el!("div", { "class" => "output", "role" => "status" }, el!("p", {}, "old"));
        empty(&mut out);

        assert!(out.children().is_empty());
        assert!(out.has_class("output"));
        assert_eq!(out.attribute("role"), Some("status"));
    }

    #[test]
    fn nested_lookup_by_class() {
        let mut tree = el!(
            "main",
            { "class" => "weather" },
            el!("div", { "class" => "locations" }),
            el!("div", { "class" => "output" })
        );

        assert_eq!(tree.find_by_class("output").map(Element::tag), Some("div"));
        tree.find_by_class_mut("output").unwrap().append_text("hi");
        assert_eq!(tree.text_content(), "hi");
        assert!(tree.find_by_class("missing").is_none());
    }

    #[test]
    fn html_escapes_text_and_attributes() {
        let p = el!("p", { "title" => "a \"b\"" }, "<x> & y");
        assert_eq!(p.to_string(), r#"<p title="a &quot;b&quot;">&lt;x&gt; &amp; y</p>"#);
    }
}
