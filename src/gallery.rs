//! `<image-gallery>` directive expansion.
//!
//! ```html
//! <image-gallery prefix="img/p" suffix=".jpg">1-2, 5</image-gallery>
//! ```
//!
//! becomes
//!
//! ```html
//! <div class="gallery-grid">
//!   <img src="img/p1.jpg" alt="Image 1">
//!   <img src="img/p2.jpg" alt="Image 2">
//!   <img src="img/p5.jpg" alt="Image 5">
//! </div>
//! ```
//!
//! The directive is consumed: once replaced, a second pass finds nothing to do.

use crate::dom;
use crate::range::{GalleryIndex, parse_ranges};
use kuchikiki::NodeRef;
use maud::{Markup, html};

/// Tag name of the gallery directive.
pub const GALLERY_TAG: &str = "image-gallery";
/// Class of the generated grid container. The overlay targets images inside it.
pub const GRID_CLASS: &str = "gallery-grid";

/// A gallery directive as read from the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalleryDirective {
    pub prefix: String,
    pub suffix: String,
    /// Range list text, already trimmed.
    pub body: String,
}

/// One generated image entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    pub index: GalleryIndex,
    pub url: String,
    pub alt: String,
}

impl GalleryDirective {
    /// Read a directive from its element. Missing attributes are empty.
    pub fn from_element(node: &NodeRef) -> Self {
        Self {
            prefix: dom::attr(node, "prefix").unwrap_or_default(),
            suffix: dom::attr(node, "suffix").unwrap_or_default(),
            body: node.text_contents().trim().to_string(),
        }
    }

    /// Image entries in directive order.
    pub fn images(&self) -> Vec<ImageDescriptor> {
        parse_ranges(&self.body)
            .into_iter()
            .map(|index| ImageDescriptor {
                index,
                url: format!("{}{}{}", self.prefix, index, self.suffix),
                alt: format!("Image {index}"),
            })
            .collect()
    }
}

/// Grid container holding one `img` per descriptor.
pub fn render_grid(images: &[ImageDescriptor]) -> Markup {
    html! {
        div class=(GRID_CLASS) {
            @for image in images {
                img src=(image.url) alt=(image.alt);
            }
        }
    }
}

/// Replace every gallery directive in `document` with its grid.
///
/// Returns the number of directives replaced.
pub fn transform_galleries(document: &NodeRef) -> usize {
    let directives = dom::elements_named(document, GALLERY_TAG);
    for node in &directives {
        let directive = GalleryDirective::from_element(node);
        let grid = render_grid(&directive.images());
        dom::replace_with(node, dom::fragment(grid));
    }
    directives.len()
}
