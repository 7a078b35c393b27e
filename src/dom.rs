//! Thin helpers over the `kuchikiki` document tree.
//!
//! Every transform works on the same mutable tree: find elements, read their
//! attributes, build replacement markup with Maud, and splice it in. The
//! helpers here keep those operations in one place so the transforms read as
//! plain DOM manipulation:
//!
//! ```text
//! parse_document ─→ elements_named / find_by_id ─→ fragment(markup) ─→ replace_with
//! ```
//!
//! Class and inline-style handling mirror the browser's `classList` and
//! `style.*` semantics closely enough for the page's state hooks (`active`,
//! `overflow`).

use kuchikiki::NodeRef;
use kuchikiki::traits::*;
use maud::Markup;

/// Parse a full HTML document (or a bare fragment, which html5ever wraps in
/// `html`/`head`/`body`).
pub fn parse_document(html: &str) -> NodeRef {
    kuchikiki::parse_html().one(html)
}

/// Serialize a document back to HTML, doctype included.
pub fn serialize(document: &NodeRef) -> String {
    document.to_string()
}

/// Parse Maud output into detached top-level nodes ready to be inserted.
///
/// The markup is parsed inside a wrapper `div` so that elements html5ever
/// would otherwise hoist into `<head>` (such as `<script>`) stay in place.
pub fn fragment(markup: Markup) -> Vec<NodeRef> {
    let wrapped = format!("<div>{}</div>", markup.into_string());
    let document = parse_document(&wrapped);
    let Some(container) = elements_named(&document, "div").into_iter().next() else {
        return Vec::new();
    };
    let nodes: Vec<NodeRef> = container.children().collect();
    for node in &nodes {
        node.detach();
    }
    nodes
}

/// All elements with the given local name under `root`, in document order.
///
/// The result is collected up front so callers can mutate the tree while
/// walking it.
pub fn elements_named(root: &NodeRef, name: &str) -> Vec<NodeRef> {
    root.descendants()
        .filter(|node| is_element(node, name))
        .collect()
}

/// Whether `node` is an element with the given local name.
pub fn is_element(node: &NodeRef, name: &str) -> bool {
    node.as_element()
        .is_some_and(|element| &*element.name.local == name)
}

/// First element under `root` whose `id` attribute equals `id`.
pub fn find_by_id(root: &NodeRef, id: &str) -> Option<NodeRef> {
    root.descendants()
        .find(|node| attr(node, "id").as_deref() == Some(id))
}

/// The document's `<body>` element.
pub fn body(document: &NodeRef) -> Option<NodeRef> {
    elements_named(document, "body").into_iter().next()
}

pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    let element = node.as_element()?;
    let attributes = element.attributes.borrow();
    attributes.get(name).map(str::to_string)
}

pub fn has_attr(node: &NodeRef, name: &str) -> bool {
    node.as_element()
        .is_some_and(|element| element.attributes.borrow().contains(name))
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(element) = node.as_element() {
        element
            .attributes
            .borrow_mut()
            .insert(name, value.to_string());
    }
}

pub fn remove_attr(node: &NodeRef, name: &str) {
    if let Some(element) = node.as_element() {
        element.attributes.borrow_mut().remove(name);
    }
}

// ============================================================================
// Tree surgery
// ============================================================================

/// Replace `old` with `new_nodes`, keeping its position among its siblings.
pub fn replace_with(old: &NodeRef, new_nodes: Vec<NodeRef>) {
    for node in new_nodes {
        old.insert_before(node);
    }
    old.detach();
}

/// Move every child of `from` to the end of `to`, preserving order.
pub fn move_children(from: &NodeRef, to: &NodeRef) {
    let children: Vec<NodeRef> = from.children().collect();
    for child in children {
        to.append(child);
    }
}

/// Replace all children of `parent` (the equivalent of assigning `innerHTML`).
pub fn set_children(parent: &NodeRef, nodes: Vec<NodeRef>) {
    let old: Vec<NodeRef> = parent.children().collect();
    for child in old {
        child.detach();
    }
    for node in nodes {
        parent.append(node);
    }
}

/// Serialized markup of the node's children.
pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}

/// `ancestor.contains(node)` in DOM terms: true when `node` is `ancestor` or
/// one of its descendants.
pub fn contains(ancestor: &NodeRef, node: &NodeRef) -> bool {
    node.inclusive_ancestors().any(|candidate| candidate == *ancestor)
}

// ============================================================================
// Class list
// ============================================================================

pub fn classes(node: &NodeRef) -> Vec<String> {
    attr(node, "class")
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn has_class(node: &NodeRef, class: &str) -> bool {
    classes(node).iter().any(|c| c == class)
}

pub fn add_class(node: &NodeRef, class: &str) {
    let mut list = classes(node);
    if !list.iter().any(|c| c == class) {
        list.push(class.to_string());
        set_attr(node, "class", &list.join(" "));
    }
}

pub fn remove_class(node: &NodeRef, class: &str) {
    let list = classes(node);
    if list.iter().any(|c| c == class) {
        let kept: Vec<String> = list.into_iter().filter(|c| c != class).collect();
        set_attr(node, "class", &kept.join(" "));
    }
}

/// Flip `class` on `node`; returns whether the class is now present.
pub fn toggle_class(node: &NodeRef, class: &str) -> bool {
    if has_class(node, class) {
        remove_class(node, class);
        false
    } else {
        add_class(node, class);
        true
    }
}

// ============================================================================
// Inline style
// ============================================================================

fn style_declarations(node: &NodeRef) -> Vec<(String, String)> {
    attr(node, "style")
        .map(|style| {
            style
                .split(';')
                .filter_map(|decl| {
                    let (property, value) = decl.split_once(':')?;
                    let property = property.trim();
                    (!property.is_empty())
                        .then(|| (property.to_ascii_lowercase(), value.trim().to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Value of one inline style property, if declared.
pub fn style_property(node: &NodeRef, property: &str) -> Option<String> {
    style_declarations(node)
        .into_iter()
        .find(|(name, _)| name == property)
        .map(|(_, value)| value)
}

/// Set (`Some`) or clear (`None`) one inline style property, leaving the
/// other declarations untouched. An emptied `style` attribute is removed.
pub fn set_style_property(node: &NodeRef, property: &str, value: Option<&str>) {
    let mut declarations: Vec<(String, String)> = style_declarations(node)
        .into_iter()
        .filter(|(name, _)| name != property)
        .collect();
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        declarations.push((property.to_string(), value.to_string()));
    }
    if declarations.is_empty() {
        remove_attr(node, "style");
    } else {
        let style: Vec<String> = declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect();
        set_attr(node, "style", &style.join(" "));
    }
}
