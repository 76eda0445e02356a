//! Page model module
//!
//! This module provides a small element tree standing in for the document
//! the widget renders into. Containers are cleared and repopulated wholesale,
//! carry a visibility flag, and can be serialized to HTML markup.

use thiserror::Error;

/// Attribute carrying the identifier of the show a card belongs to
pub const SHOW_ID_ATTRIBUTE: &str = "data-show-id";

/// Errors that can occur while resolving elements on the page
#[derive(Debug, Error)]
pub enum PageError {
    /// No ancestor of the click target identifies a show
    #[error("No enclosing show card for element at path {0:?}")]
    NoEnclosingShow(Vec<usize>),

    /// The enclosing card's identifier is not a number
    #[error("Invalid show identifier '{0}'")]
    InvalidShowId(String),
}

/// A node in the element tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element
    Element(Element),
    /// Plain text, escaped on serialization
    Text(String),
    /// Trusted markup inserted as-is
    Markup(String),
}

/// An element with attributes, classes and child nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    hidden: bool,
}

impl Element {
    /// Creates an empty, visible element
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
            hidden: false,
        }
    }

    /// Sets the element id
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Adds one or more whitespace separated classes
    pub fn with_class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    /// Sets an attribute, replacing any previous value
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.retain(|(existing, _)| existing != name);
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Appends a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.append(child);
        self
    }

    /// Appends a text node
    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    /// Appends a raw markup node
    pub fn with_markup(mut self, markup: &str) -> Self {
        self.children.push(Node::Markup(markup.to_string()));
        self
    }

    /// Marks the element hidden
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Iterates over the child elements, skipping text and markup nodes
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Removes all children
    pub fn empty(&mut self) {
        self.children.clear();
    }

    /// Appends a child element
    pub fn append(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    /// Finds the first descendant element (or this element) with the given id
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.child_elements()
            .find_map(|child| child.find_by_id(id))
    }

    /// Mutable variant of [`Element::find_by_id`]
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(child) => child.find_by_id_mut(id),
            _ => None,
        })
    }

    /// Resolves a path of child element indices to an element
    ///
    /// An empty path resolves to this element. Indices count child elements
    /// only.
    pub fn element_at(&self, path: &[usize]) -> Option<&Element> {
        self.ancestors_along(path)
            .and_then(|chain| chain.last().copied())
    }

    /// Returns the value of `attribute` on the nearest element carrying it,
    /// starting from the element at `path` and walking up to this element
    pub fn closest_attribute(&self, path: &[usize], attribute: &str) -> Option<&str> {
        self.ancestors_along(path)?
            .into_iter()
            .rev()
            .find_map(|element| element.attribute(attribute))
    }

    /// Collects this element and each element visited along `path`
    fn ancestors_along(&self, path: &[usize]) -> Option<Vec<&Element>> {
        let mut chain = vec![self];
        let mut current = self;
        for &index in path {
            current = current.child_elements().nth(index)?;
            chain.push(current);
        }
        Some(chain)
    }

    /// Concatenated text content of this element and its descendants
    ///
    /// Markup nodes contribute their text with tags stripped.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Element(child) => text.push_str(&child.text()),
                Node::Text(t) => text.push_str(t),
                Node::Markup(m) => text.push_str(nanohtml2text::html2text(m).trim()),
            }
        }
        text
    }

    /// Serializes the element tree to HTML markup
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        self.write_html(&mut html);
        html
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.id {
            push_attribute(out, "id", id);
        }
        if !self.classes.is_empty() {
            push_attribute(out, "class", &self.classes.join(" "));
        }
        for (name, value) in &self.attributes {
            push_attribute(out, name, value);
        }
        if self.hidden {
            push_attribute(out, "style", "display: none;");
        }
        out.push('>');

        if is_void_element(&self.tag) {
            return;
        }

        for node in &self.children {
            match node {
                Node::Element(child) => child.write_html(out),
                Node::Text(text) => out.push_str(&escape_html(text)),
                Node::Markup(markup) => out.push_str(markup),
            }
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_html(value));
    out.push('"');
}

fn is_void_element(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "input" | "meta" | "link")
}

/// Escapes text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// The document surface the widget renders into
///
/// Holds the shows list container and the episodes area, which nests the
/// episodes list and starts out hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Container for show cards (`#showsList`)
    pub shows_list: Element,
    /// Panel revealed once episodes are rendered (`#episodesArea`)
    pub episodes_area: Element,
}

impl Page {
    pub fn new() -> Self {
        Self {
            shows_list: Element::new("div").with_id("showsList").with_class("row"),
            episodes_area: Element::new("section")
                .with_id("episodesArea")
                .hidden()
                .with_child(Element::new("h2").with_text("Episodes"))
                .with_child(Element::new("ul").with_id("episodesList")),
        }
    }

    /// The list inside the episodes area (`#episodesList`)
    pub fn episodes_list(&self) -> Option<&Element> {
        self.episodes_area.find_by_id("episodesList")
    }

    /// Mutable access to the episodes list
    pub fn episodes_list_mut(&mut self) -> Option<&mut Element> {
        self.episodes_area.find_by_id_mut("episodesList")
    }

    /// Resolves the show identifier for a click inside the shows list
    ///
    /// `target` is a path of child element indices starting at the shows
    /// list container.
    pub fn show_id_for(&self, target: &[usize]) -> Result<u64, PageError> {
        let value = self
            .shows_list
            .closest_attribute(target, SHOW_ID_ATTRIBUTE)
            .ok_or_else(|| PageError::NoEnclosingShow(target.to_vec()))?;

        value
            .parse()
            .map_err(|_| PageError::InvalidShowId(value.to_string()))
    }

    /// Serializes the whole page body
    pub fn to_html(&self) -> String {
        format!(
            "{}\n{}\n",
            self.shows_list.to_html(),
            self.episodes_area.to_html()
        )
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
