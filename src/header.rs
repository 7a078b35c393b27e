//! Site header injection.
//!
//! Every page carries an empty mount point (`<div id="header-placeholder">`)
//! and its title in `<body data-page-title="…">`. The header is built from
//! those two inputs plus the configured navigation:
//!
//! ```html
//! <div class="menu-container">
//!   <button class="menu-button" id="menuBtn">Меню</button>
//!   <div class="dropdown-menu" id="dropdownMenu">
//!     <a href="index.html">Главная</a>
//!     …
//!   </div>
//! </div>
//! <a class="logo-button">Page title</a>
//! ```
//!
//! Injection replaces the mount point's content, so running it twice leaves
//! a single header. Pages without a mount point are left alone.

use crate::config::{HeaderConfig, NavLink};
use crate::dom;
use kuchikiki::NodeRef;
use maud::{Markup, html};

pub const MENU_BUTTON_ID: &str = "menuBtn";
pub const DROPDOWN_ID: &str = "dropdownMenu";
/// Body attribute carrying the page title.
pub const PAGE_TITLE_ATTR: &str = "data-page-title";

/// Input to the header builder.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderSpec {
    pub title: String,
}

impl HeaderSpec {
    /// Title from the body's `data-page-title`, or `default_title` when the
    /// attribute is missing or empty.
    pub fn from_document(document: &NodeRef, default_title: &str) -> Self {
        let title = dom::body(document)
            .and_then(|body| dom::attr(&body, PAGE_TITLE_ATTR))
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| default_title.to_string());
        Self { title }
    }
}

pub fn render_header(spec: &HeaderSpec, config: &HeaderConfig) -> Markup {
    html! {
        div.menu-container {
            button.menu-button id=(MENU_BUTTON_ID) { (config.menu_label) }
            div.dropdown-menu id=(DROPDOWN_ID) {
                @for link in &config.links {
                    (render_link(link))
                }
            }
        }
        a.logo-button { (spec.title) }
    }
}

fn render_link(link: &NavLink) -> Markup {
    html! {
        a href=(link.href) { (link.label) }
    }
}

/// Build the header and mount it. Returns the mount point, or `None` when
/// the page has none.
pub fn inject_header(
    document: &NodeRef,
    config: &HeaderConfig,
    default_title: &str,
) -> Option<NodeRef> {
    let mount = dom::find_by_id(document, &config.mount_id)?;
    let spec = HeaderSpec::from_document(document, default_title);
    dom::set_children(&mount, dom::fragment(render_header(&spec, config)));
    Some(mount)
}
