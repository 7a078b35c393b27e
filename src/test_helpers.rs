//! Shared test utilities for the page-enhance test suite.
//!
//! Provides a representative sample page, a fixture site on disk, and
//! lookup helpers over the document tree.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let doc = dom::parse_document(SAMPLE_PAGE);
//! bootstrap(&doc, &SiteConfig::default());
//! assert_eq!(elements_with_class(&doc, "gallery-grid").len(), 1);
//! ```

use kuchikiki::NodeRef;
use std::path::Path;
use tempfile::TempDir;

use crate::dom;

/// A page using every directive once or more: one gallery, two accordions
/// (the second starts expanded) and the header mount point.
pub const SAMPLE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="ru">
<head><meta charset="UTF-8"><title>Sample</title></head>
<body data-page-title="Фотоотчёт">
<div id="header-placeholder"></div>
<main>
<image-gallery prefix="img/p" suffix=".jpg">1-3</image-gallery>
<accordion title="First"><p>first body</p></accordion>
<accordion title="Second" active><p>second body</p></accordion>
</main>
</body>
</html>
"#;

// =========================================================================
// Fixture setup
// =========================================================================

/// Write a small site to a temp directory and return it.
///
/// ```text
/// index.html             # sample page
/// about.html             # no header mount
/// style.css              # asset, copied verbatim
/// reports/config.toml    # overrides default_title
/// reports/trip.html      # gallery, no data-page-title
/// ```
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_site(tmp.path());
    tmp
}

fn write_site(root: &Path) {
    std::fs::write(root.join("index.html"), SAMPLE_PAGE).unwrap();
    std::fs::write(
        root.join("about.html"),
        "<!DOCTYPE html><html><body><p>About</p></body></html>",
    )
    .unwrap();
    std::fs::write(root.join("style.css"), "body { margin: 0; }").unwrap();

    let reports = root.join("reports");
    std::fs::create_dir_all(&reports).unwrap();
    std::fs::write(reports.join("config.toml"), "default_title = \"Отчёты\"\n").unwrap();
    std::fs::write(
        reports.join("trip.html"),
        r#"<!DOCTYPE html><html><body><div id="header-placeholder"></div><image-gallery prefix="trip/">2, 4</image-gallery></body></html>"#,
    )
    .unwrap();
}

// =========================================================================
// Document lookups
// =========================================================================

/// All elements under `root` carrying `class`, in document order.
pub fn elements_with_class(root: &NodeRef, class: &str) -> Vec<NodeRef> {
    root.descendants()
        .filter(|node| dom::has_class(node, class))
        .collect()
}

/// Element children of `<body>`, skipping whitespace text nodes.
pub fn body_children(document: &NodeRef) -> Vec<NodeRef> {
    dom::body(document)
        .expect("document has a body")
        .children()
        .filter(|node| node.as_element().is_some())
        .collect()
}

/// Find an element by id. Panics with a clear message on miss.
pub fn by_id(root: &NodeRef, id: &str) -> NodeRef {
    dom::find_by_id(root, id).unwrap_or_else(|| panic!("no element with id '{id}'"))
}
