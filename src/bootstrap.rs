//! The page load pass.
//!
//! Runs every transform once over a parsed document, in a fixed order:
//!
//! ```text
//! galleries → accordions → header (if mounted) → overlay (if enabled)
//! ```
//!
//! Galleries go first so that a gallery nested in an accordion is already a
//! grid when the accordion's content is moved. The overlay only needs to
//! exist; its open handler is delegated, so it matches grids whenever they
//! appear.
//!
//! The pass consumes its directives, so running it again over its own
//! output changes nothing: no directives are left, the header replaces the
//! mount point's content, and the overlay surface is adopted.

use crate::accordion::transform_accordions;
use crate::config::SiteConfig;
use crate::gallery::transform_galleries;
use crate::header::inject_header;
use crate::overlay::OverlayController;
use kuchikiki::NodeRef;
use serde::Serialize;

/// What one pass did to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub galleries: usize,
    pub accordions: usize,
    pub header_injected: bool,
    pub overlay_mounted: bool,
}

impl BootstrapReport {
    /// True when the pass left the page untouched apart from the overlay.
    pub fn is_passive(&self) -> bool {
        self.galleries == 0 && self.accordions == 0 && !self.header_injected
    }
}

/// Run the load pass. Returns the report and the overlay controller, when
/// one was mounted.
pub fn bootstrap(
    document: &NodeRef,
    config: &SiteConfig,
) -> (BootstrapReport, Option<OverlayController>) {
    let galleries = transform_galleries(document);
    let accordions = transform_accordions(document);
    let header_injected = inject_header(document, &config.header, &config.default_title).is_some();
    let overlay = if config.overlay.enabled {
        OverlayController::mount(document)
    } else {
        None
    };

    let report = BootstrapReport {
        galleries,
        accordions,
        header_injected,
        overlay_mounted: overlay.is_some(),
    };
    (report, overlay)
}
