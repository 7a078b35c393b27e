//! `<accordion>` directive expansion.
//!
//! ```html
//! <accordion title="History" active><p>…</p></accordion>
//! ```
//!
//! becomes a disclosure widget:
//!
//! ```html
//! <div class="accordion active">
//!   <div class="accordion-header">History</div>
//!   <div class="underline"></div>
//!   <div class="accordion-content"><p>…</p></div>
//! </div>
//! ```
//!
//! The directive's child nodes are moved into the content region as they
//! are, so nested markup (including other directives) is neither re-parsed
//! nor sanitised. The `active` class is the expanded state; toggling it is
//! the runtime's job (see [`crate::interact`]).

use crate::dom;
use kuchikiki::NodeRef;
use maud::{Markup, html};

pub const ACCORDION_TAG: &str = "accordion";
pub const ACCORDION_CLASS: &str = "accordion";
pub const HEADER_CLASS: &str = "accordion-header";
pub const UNDERLINE_CLASS: &str = "underline";
pub const CONTENT_CLASS: &str = "accordion-content";
/// Expanded-state class, shared with the dropdown menu and the overlay.
pub const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccordionDirective {
    pub title: String,
    /// Presence of the `active` attribute: start expanded.
    pub active: bool,
}

impl AccordionDirective {
    pub fn from_element(node: &NodeRef) -> Self {
        Self {
            title: dom::attr(node, "title").unwrap_or_default(),
            active: dom::has_attr(node, "active"),
        }
    }
}

/// Widget shell with an empty content region.
pub fn render_accordion(directive: &AccordionDirective) -> Markup {
    let class = if directive.active {
        format!("{ACCORDION_CLASS} {ACTIVE_CLASS}")
    } else {
        ACCORDION_CLASS.to_string()
    };
    html! {
        div class=(class) {
            div class=(HEADER_CLASS) { (directive.title) }
            div class=(UNDERLINE_CLASS) {}
            div class=(CONTENT_CLASS) {}
        }
    }
}

/// Replace every accordion directive in `document` with its widget.
///
/// Directives are handled in document order. Because children are moved
/// rather than copied, a directive nested inside another one stays in the
/// tree and is expanded in its new position.
pub fn transform_accordions(document: &NodeRef) -> usize {
    let directives = dom::elements_named(document, ACCORDION_TAG);
    for node in &directives {
        let directive = AccordionDirective::from_element(node);
        let widget = dom::fragment(render_accordion(&directive));
        if let Some(content) = widget
            .iter()
            .flat_map(|root| root.inclusive_descendants())
            .find(|n| dom::has_class(n, CONTENT_CLASS))
        {
            dom::move_children(node, &content);
        }
        dom::replace_with(node, widget);
    }
    directives.len()
}

/// The accordion widget a header belongs to.
pub fn accordion_of(header: &NodeRef) -> Option<NodeRef> {
    header
        .parent()
        .filter(|parent| dom::has_class(parent, ACCORDION_CLASS))
}
