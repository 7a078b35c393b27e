//! Full-page image preview.
//!
//! One surface per page, appended to `<body>`:
//!
//! ```html
//! <div id="image-overlay">
//!   <span id="close-overlay">×</span>
//!   <img id="overlay-image" src="" alt="Full size image">
//! </div>
//! ```
//!
//! [`OverlayController`] owns the three nodes and the open/closed state:
//!
//! ```text
//! Closed ──open(url)──→ Open(url) ──close()──→ Closed
//! ```
//!
//! Opening shows the surface (`active` class) and stops page scrolling
//! (`overflow: hidden` on the body); closing undoes both. Which clicks open
//! or close it is decided by [`crate::interact`], using [`is_gallery_image`]
//! for the delegated open.

use crate::accordion::ACTIVE_CLASS;
use crate::dom;
use crate::gallery::GRID_CLASS;
use kuchikiki::NodeRef;
use maud::{Markup, html};

pub const OVERLAY_ID: &str = "image-overlay";
pub const OVERLAY_IMAGE_ID: &str = "overlay-image";
pub const CLOSE_CONTROL_ID: &str = "close-overlay";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayState {
    Closed,
    Open(String),
}

pub fn render_overlay() -> Markup {
    html! {
        div id=(OVERLAY_ID) {
            span id=(CLOSE_CONTROL_ID) { "×" }
            img id=(OVERLAY_IMAGE_ID) src="" alt="Full size image";
        }
    }
}

/// True for an `img` element inside a gallery grid.
pub fn is_gallery_image(node: &NodeRef) -> bool {
    dom::is_element(node, "img") && node.ancestors().any(|a| dom::has_class(&a, GRID_CLASS))
}

/// The page's single image preview surface.
pub struct OverlayController {
    state: OverlayState,
    body: NodeRef,
    surface: NodeRef,
    image: NodeRef,
    close_control: NodeRef,
}

impl OverlayController {
    /// Append the surface to `<body>` and take ownership of it.
    ///
    /// A surface left by an earlier pass is adopted and reset to closed
    /// instead of being appended a second time. Returns `None` only when the
    /// document has no body.
    pub fn mount(document: &NodeRef) -> Option<Self> {
        let body = dom::body(document)?;
        if let Some(existing) = dom::find_by_id(document, OVERLAY_ID) {
            let image = dom::find_by_id(&existing, OVERLAY_IMAGE_ID);
            let close_control = dom::find_by_id(&existing, CLOSE_CONTROL_ID);
            if let (Some(image), Some(close_control)) = (image, close_control) {
                let mut controller = Self {
                    state: OverlayState::Closed,
                    body,
                    surface: existing,
                    image,
                    close_control,
                };
                controller.close();
                return Some(controller);
            }
            // Incomplete surface: rebuild it.
            existing.detach();
        }

        for node in dom::fragment(render_overlay()) {
            body.append(node);
        }
        let surface = dom::find_by_id(&body, OVERLAY_ID)?;
        let image = dom::find_by_id(&surface, OVERLAY_IMAGE_ID)?;
        let close_control = dom::find_by_id(&surface, CLOSE_CONTROL_ID)?;
        Some(Self {
            state: OverlayState::Closed,
            body,
            surface,
            image,
            close_control,
        })
    }

    /// Show `url` full size and stop page scrolling.
    pub fn open(&mut self, url: &str) {
        dom::set_attr(&self.image, "src", url);
        dom::add_class(&self.surface, ACTIVE_CLASS);
        dom::set_style_property(&self.body, "overflow", Some("hidden"));
        self.state = OverlayState::Open(url.to_string());
    }

    /// Hide the surface and restore page scrolling.
    pub fn close(&mut self) {
        dom::remove_class(&self.surface, ACTIVE_CLASS);
        dom::set_style_property(&self.body, "overflow", None);
        self.state = OverlayState::Closed;
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, OverlayState::Open(_))
    }

    pub fn surface(&self) -> &NodeRef {
        &self.surface
    }

    pub fn image(&self) -> &NodeRef {
        &self.image
    }

    pub fn close_control(&self) -> &NodeRef {
        &self.close_control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted(html: &str) -> (NodeRef, OverlayController) {
        let doc = dom::parse_document(html);
        let overlay = OverlayController::mount(&doc).expect("document has a body");
        (doc, overlay)
    }

    fn overlay_count(doc: &NodeRef) -> usize {
        doc.descendants()
            .filter(|n| dom::attr(n, "id").as_deref() == Some(OVERLAY_ID))
            .count()
    }

    #[test]
    fn mount_appends_hidden_surface_to_body() {
        let (doc, overlay) = mounted("<body><p>x</p></body>");
        assert_eq!(overlay_count(&doc), 1);
        assert_eq!(overlay.state(), &OverlayState::Closed);
        assert!(!dom::has_class(overlay.surface(), ACTIVE_CLASS));

        let body = dom::body(&doc).unwrap();
        assert!(body.last_child() == Some(overlay.surface().clone()));
        assert_eq!(dom::attr(overlay.image(), "src").as_deref(), Some(""));
    }

    #[test]
    fn open_sets_source_and_locks_scrolling() {
        let (doc, mut overlay) = mounted("<body></body>");
        overlay.open("img/p1.jpg");

        assert_eq!(overlay.state(), &OverlayState::Open("img/p1.jpg".to_string()));
        assert_eq!(dom::attr(overlay.image(), "src").as_deref(), Some("img/p1.jpg"));
        assert!(dom::has_class(overlay.surface(), ACTIVE_CLASS));
        let body = dom::body(&doc).unwrap();
        assert_eq!(dom::style_property(&body, "overflow").as_deref(), Some("hidden"));
    }

    #[test]
    fn close_restores_scrolling() {
        let (doc, mut overlay) = mounted(r#"<body style="color: red"></body>"#);
        overlay.open("a.jpg");
        overlay.close();

        assert!(!overlay.is_open());
        assert!(!dom::has_class(overlay.surface(), ACTIVE_CLASS));
        let body = dom::body(&doc).unwrap();
        assert_eq!(dom::style_property(&body, "overflow"), None);
        assert_eq!(dom::style_property(&body, "color").as_deref(), Some("red"));
    }

    #[test]
    fn second_mount_adopts_existing_surface() {
        let (doc, mut first) = mounted("<body></body>");
        first.open("a.jpg");

        let second = OverlayController::mount(&doc).unwrap();
        assert_eq!(overlay_count(&doc), 1);
        assert!(second.surface() == first.surface());
        assert!(!second.is_open());
    }

    #[test]
    fn incomplete_surface_is_rebuilt() {
        let (doc, overlay) = mounted(r#"<body><div id="image-overlay"></div></body>"#);
        assert_eq!(overlay_count(&doc), 1);
        assert!(dom::find_by_id(overlay.surface(), OVERLAY_IMAGE_ID).is_some());
    }

    #[test]
    fn gallery_image_check() {
        let doc = dom::parse_document(
            r#"<div class="gallery-grid"><a><img id="deep"></a><img id="direct"></div><img id="loose"><p id="para"></p>"#,
        );
        let find = |id: &str| dom::find_by_id(&doc, id).unwrap();
        assert!(is_gallery_image(&find("direct")));
        assert!(is_gallery_image(&find("deep")));
        assert!(!is_gallery_image(&find("loose")));
        assert!(!is_gallery_image(&find("para")));
    }
}
