//! The enhanced page reacting to user input.
//!
//! [`Page`] is the load pass plus the listeners the page installs
//! afterwards, driven by explicit events instead of a browser:
//!
//! | Listener | Registered on | Effect |
//! |----------|---------------|--------|
//! | accordion toggle | each `.accordion-header` | flip `active` on its accordion |
//! | menu toggle | `#menuBtn` inside the header mount | flip `active` on `#dropdownMenu` |
//! | menu dismiss | the document | close the dropdown when the click landed outside button and dropdown |
//! | overlay open | `<body>` (delegated) | open the overlay when the target is a gallery image |
//! | overlay close | `#close-overlay` | close the overlay |
//! | backdrop close | `#image-overlay` | close when the surface itself was clicked |
//!
//! A click travels from its target up through every ancestor to the document
//! root, and each node's listeners run once, in registration order. A click
//! on the menu button therefore toggles the dropdown and then reaches the
//! dismiss listener, which sees the target inside the button and leaves the
//! dropdown alone.

use crate::accordion::{ACTIVE_CLASS, HEADER_CLASS, accordion_of};
use crate::bootstrap::{BootstrapReport, bootstrap};
use crate::config::SiteConfig;
use crate::dom;
use crate::header::{DROPDOWN_ID, MENU_BUTTON_ID};
use crate::overlay::{OverlayController, is_gallery_image};
use kuchikiki::NodeRef;

/// A key press delivered to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

#[derive(Clone)]
enum Listener {
    ToggleAccordion { accordion: NodeRef },
    ToggleMenu { dropdown: NodeRef },
    DismissMenu { button: NodeRef, dropdown: NodeRef },
    OpenOverlay,
    CloseOverlay,
    CloseOnBackdrop { surface: NodeRef },
}

struct Registration {
    node: NodeRef,
    listener: Listener,
}

/// A loaded page: its document, overlay and installed listeners.
pub struct Page {
    document: NodeRef,
    report: BootstrapReport,
    overlay: Option<OverlayController>,
    dropdown: Option<NodeRef>,
    listeners: Vec<Registration>,
}

impl Page {
    /// Parse `html`, run the load pass and install the listeners.
    pub fn load(html: &str, config: &SiteConfig) -> Self {
        Self::from_document(dom::parse_document(html), config)
    }

    pub fn from_document(document: NodeRef, config: &SiteConfig) -> Self {
        let (report, overlay) = bootstrap(&document, config);
        let mut page = Self {
            document,
            report,
            overlay,
            dropdown: None,
            listeners: Vec::new(),
        };
        page.install_listeners(&config.header.mount_id);
        page
    }

    fn install_listeners(&mut self, mount_id: &str) {
        let headers: Vec<NodeRef> = self
            .document
            .descendants()
            .filter(|node| dom::has_class(node, HEADER_CLASS))
            .collect();
        for header in headers {
            if let Some(accordion) = accordion_of(&header) {
                self.register(header, Listener::ToggleAccordion { accordion });
            }
        }

        if let Some(mount) = dom::find_by_id(&self.document, mount_id)
            .filter(|_| self.report.header_injected)
        {
            let button = dom::find_by_id(&mount, MENU_BUTTON_ID);
            let dropdown = dom::find_by_id(&mount, DROPDOWN_ID);
            if let (Some(button), Some(dropdown)) = (button, dropdown) {
                self.register(
                    button.clone(),
                    Listener::ToggleMenu {
                        dropdown: dropdown.clone(),
                    },
                );
                self.register(
                    self.document.clone(),
                    Listener::DismissMenu {
                        button,
                        dropdown: dropdown.clone(),
                    },
                );
                self.dropdown = Some(dropdown);
            }
        }

        let overlay_nodes = self.overlay.as_ref().map(|overlay| {
            (
                overlay.close_control().clone(),
                overlay.surface().clone(),
            )
        });
        if let (Some((close_control, surface)), Some(body)) =
            (overlay_nodes, dom::body(&self.document))
        {
            self.register(body, Listener::OpenOverlay);
            self.register(close_control, Listener::CloseOverlay);
            self.register(
                surface.clone(),
                Listener::CloseOnBackdrop { surface },
            );
        }
    }

    fn register(&mut self, node: NodeRef, listener: Listener) {
        self.listeners.push(Registration { node, listener });
    }

    /// Deliver a click on `target`, bubbling to the document root.
    pub fn click(&mut self, target: &NodeRef) {
        let path: Vec<NodeRef> = target.inclusive_ancestors().collect();
        for current in &path {
            let listeners: Vec<Listener> = self
                .listeners
                .iter()
                .filter(|registration| registration.node == *current)
                .map(|registration| registration.listener.clone())
                .collect();
            for listener in &listeners {
                self.run(listener, target);
            }
        }
    }

    /// Deliver a key press to the document.
    pub fn key_down(&mut self, key: Key) {
        if key != Key::Escape {
            return;
        }
        if let Some(overlay) = self.overlay.as_mut().filter(|o| o.is_open()) {
            overlay.close();
        }
    }

    fn run(&mut self, listener: &Listener, target: &NodeRef) {
        match listener {
            Listener::ToggleAccordion { accordion } => {
                dom::toggle_class(accordion, ACTIVE_CLASS);
            }
            Listener::ToggleMenu { dropdown } => {
                dom::toggle_class(dropdown, ACTIVE_CLASS);
            }
            Listener::DismissMenu { button, dropdown } => {
                if !dom::contains(button, target) && !dom::contains(dropdown, target) {
                    dom::remove_class(dropdown, ACTIVE_CLASS);
                }
            }
            Listener::OpenOverlay => {
                if is_gallery_image(target) {
                    let src = dom::attr(target, "src").unwrap_or_default();
                    if let Some(overlay) = self.overlay.as_mut() {
                        overlay.open(&src);
                    }
                }
            }
            Listener::CloseOverlay => {
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.close();
                }
            }
            Listener::CloseOnBackdrop { surface } => {
                if let Some(overlay) = self.overlay.as_mut().filter(|_| target == surface) {
                    overlay.close();
                }
            }
        }
    }

    pub fn document(&self) -> &NodeRef {
        &self.document
    }

    pub fn report(&self) -> &BootstrapReport {
        &self.report
    }

    pub fn overlay(&self) -> Option<&OverlayController> {
        self.overlay.as_ref()
    }

    /// Whether an accordion widget is in its expanded state.
    pub fn is_expanded(&self, accordion: &NodeRef) -> bool {
        dom::has_class(accordion, ACTIVE_CLASS)
    }

    pub fn menu_open(&self) -> bool {
        self.dropdown
            .as_ref()
            .is_some_and(|dropdown| dom::has_class(dropdown, ACTIVE_CLASS))
    }

    /// The body's inline `overflow` value, if set.
    pub fn body_overflow(&self) -> Option<String> {
        dom::body(&self.document).and_then(|body| dom::style_property(&body, "overflow"))
    }

    pub fn to_html(&self) -> String {
        dom::serialize(&self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayState;
    use crate::test_helpers::*;

    fn sample() -> Page {
        Page::load(SAMPLE_PAGE, &SiteConfig::default())
    }

    fn gallery_images(page: &Page) -> Vec<NodeRef> {
        let grid = elements_with_class(page.document(), "gallery-grid").remove(0);
        dom::elements_named(&grid, "img")
    }

    // =========================================================================
    // Accordion
    // =========================================================================

    #[test]
    fn accordion_toggles_on_header_click() {
        let mut page = sample();
        let accordion = elements_with_class(page.document(), "accordion").remove(0);
        let header = elements_with_class(&accordion, "accordion-header").remove(0);

        assert!(!page.is_expanded(&accordion));
        page.click(&header);
        assert!(page.is_expanded(&accordion));
        page.click(&header);
        assert!(!page.is_expanded(&accordion));
    }

    #[test]
    fn active_accordion_starts_expanded() {
        let page = sample();
        let second = elements_with_class(page.document(), "accordion").remove(1);
        assert!(page.is_expanded(&second));
    }

    #[test]
    fn accordions_toggle_independently() {
        let mut page = sample();
        let accordions = elements_with_class(page.document(), "accordion");
        let first_header = elements_with_class(&accordions[0], "accordion-header").remove(0);

        page.click(&first_header);
        assert!(page.is_expanded(&accordions[0]));
        assert!(page.is_expanded(&accordions[1]));

        let second_header = elements_with_class(&accordions[1], "accordion-header").remove(0);
        page.click(&second_header);
        assert!(page.is_expanded(&accordions[0]));
        assert!(!page.is_expanded(&accordions[1]));
    }

    #[test]
    fn content_click_does_not_toggle() {
        let mut page = sample();
        let accordion = elements_with_class(page.document(), "accordion").remove(0);
        let content = elements_with_class(&accordion, "accordion-content").remove(0);
        page.click(&content);
        assert!(!page.is_expanded(&accordion));
    }

    // =========================================================================
    // Menu
    // =========================================================================

    #[test]
    fn menu_button_toggles_dropdown() {
        let mut page = sample();
        let button = by_id(page.document(), MENU_BUTTON_ID);

        page.click(&button);
        assert!(page.menu_open());
        page.click(&button);
        assert!(!page.menu_open());
    }

    #[test]
    fn click_inside_dropdown_keeps_it_open() {
        let mut page = sample();
        let button = by_id(page.document(), MENU_BUTTON_ID);
        let dropdown = by_id(page.document(), DROPDOWN_ID);
        let link = dom::elements_named(&dropdown, "a").remove(0);

        page.click(&button);
        page.click(&link);
        assert!(page.menu_open());
    }

    #[test]
    fn click_outside_closes_dropdown() {
        let mut page = sample();
        let button = by_id(page.document(), MENU_BUTTON_ID);
        let header = elements_with_class(page.document(), "accordion-header").remove(0);

        page.click(&button);
        page.click(&header);
        assert!(!page.menu_open());
    }

    #[test]
    fn stray_menu_markup_outside_mount_is_not_wired() {
        let mut page = Page::load(
            r#"<body><button id="menuBtn">m</button><div id="dropdownMenu"></div></body>"#,
            &SiteConfig::default(),
        );
        let button = by_id(page.document(), "menuBtn");
        page.click(&button);
        assert!(!page.menu_open());
        let dropdown = by_id(page.document(), "dropdownMenu");
        assert!(!dom::has_class(&dropdown, ACTIVE_CLASS));
    }

    #[test]
    fn page_without_mount_has_no_menu() {
        let mut page = Page::load("<body><p id=p>x</p></body>", &SiteConfig::default());
        let p = by_id(page.document(), "p");
        page.click(&p);
        assert!(!page.menu_open());
        assert!(!page.report().header_injected);
    }

    // =========================================================================
    // Overlay
    // =========================================================================

    #[test]
    fn gallery_click_opens_overlay_and_locks_scroll() {
        let mut page = sample();
        let image = gallery_images(&page).remove(1);

        page.click(&image);
        let overlay = page.overlay().unwrap();
        assert_eq!(overlay.state(), &OverlayState::Open("img/p2.jpg".to_string()));
        assert_eq!(dom::attr(overlay.image(), "src").as_deref(), Some("img/p2.jpg"));
        assert_eq!(page.body_overflow().as_deref(), Some("hidden"));
    }

    #[test]
    fn escape_closes_overlay_and_restores_scroll() {
        let mut page = sample();
        let image = gallery_images(&page).remove(0);

        page.click(&image);
        page.key_down(Key::from_name("Escape"));
        assert!(!page.overlay().unwrap().is_open());
        assert_eq!(page.body_overflow(), None);
    }

    #[test]
    fn other_keys_leave_overlay_open() {
        let mut page = sample();
        let image = gallery_images(&page).remove(0);
        page.click(&image);
        page.key_down(Key::from_name("Enter"));
        assert!(page.overlay().unwrap().is_open());
    }

    #[test]
    fn clicking_displayed_image_keeps_overlay_open() {
        let mut page = sample();
        let image = gallery_images(&page).remove(0);
        page.click(&image);

        let displayed = page.overlay().unwrap().image().clone();
        page.click(&displayed);
        assert!(page.overlay().unwrap().is_open());
    }

    #[test]
    fn backdrop_click_closes_overlay() {
        let mut page = sample();
        let image = gallery_images(&page).remove(0);
        page.click(&image);

        let surface = page.overlay().unwrap().surface().clone();
        page.click(&surface);
        assert!(!page.overlay().unwrap().is_open());
        assert_eq!(page.body_overflow(), None);
    }

    #[test]
    fn close_control_closes_overlay() {
        let mut page = sample();
        let image = gallery_images(&page).remove(2);
        page.click(&image);

        let close = page.overlay().unwrap().close_control().clone();
        page.click(&close);
        assert!(!page.overlay().unwrap().is_open());
    }

    #[test]
    fn images_outside_galleries_do_not_open_overlay() {
        let mut page = Page::load(
            r#"<body><img id="logo" src="logo.png"></body>"#,
            &SiteConfig::default(),
        );
        let logo = by_id(page.document(), "logo");
        page.click(&logo);
        assert!(!page.overlay().unwrap().is_open());
    }

    #[test]
    fn disabled_overlay_ignores_gallery_clicks() {
        let mut config = SiteConfig::default();
        config.overlay.enabled = false;
        let mut page = Page::load(SAMPLE_PAGE, &config);
        let image = gallery_images(&page).remove(0);
        page.click(&image);
        assert!(page.overlay().is_none());
        assert_eq!(page.body_overflow(), None);
    }

    // =========================================================================
    // Reload
    // =========================================================================

    #[test]
    fn reloading_enhanced_output_behaves_the_same() {
        let config = SiteConfig::default();
        let html = sample().to_html();
        let mut page = Page::load(&html, &config);

        assert_eq!(elements_with_class(page.document(), "gallery-grid").len(), 1);
        assert_eq!(elements_with_class(page.document(), "menu-container").len(), 1);

        let accordion = elements_with_class(page.document(), "accordion").remove(0);
        let header = elements_with_class(&accordion, "accordion-header").remove(0);
        page.click(&header);
        assert!(page.is_expanded(&accordion));

        let image = gallery_images(&page).remove(0);
        page.click(&image);
        assert!(page.overlay().unwrap().is_open());
    }
}
