//! # Page Enhance
//!
//! A build-time enhancer for small static content sites. Pages are written as
//! plain HTML with two custom directives; the enhancer expands them, injects
//! the shared navigation header and the image overlay, and appends a tiny
//! runtime script that wires the interactive parts in the browser.
//!
//! ```html
//! <body data-page-title="Фотоотчёт">
//!   <div id="header-placeholder"></div>
//!   <image-gallery prefix="img/p" suffix=".jpg">1-10, 12</image-gallery>
//!   <accordion title="История" active> … </accordion>
//! </body>
//! ```
//!
//! # Architecture: Load Pass + Build Pipeline
//!
//! The heart of the crate is the load pass in [`bootstrap`]: one in-memory
//! document, four transformations, in a fixed order:
//!
//! ```text
//! galleries  →  accordions  →  header  →  overlay
//! ```
//!
//! Around it sits a two-stage pipeline for whole sites:
//!
//! ```text
//! 1. Scan      site/  →  Manifest     (pages, assets, cascaded config)
//! 2. Enhance   Manifest  →  dist/     (load pass per page, assets copied)
//! ```
//!
//! [`interact`] replays the browser-side behaviour (accordion toggling, the
//! dropdown menu, the overlay) against an enhanced document, so the
//! interactive contract is covered by unit tests rather than a browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`range`] | Range-list parsing: `"1-3, 7"` → gallery indices |
//! | [`gallery`] | `<image-gallery>` → `div.gallery-grid` of images |
//! | [`accordion`] | `<accordion>` → collapsible header/content block |
//! | [`header`] | Navigation header injected into the mount point |
//! | [`overlay`] | Full-screen image viewer surface and its open/closed state |
//! | [`bootstrap`] | The load pass: runs every transformation once, in order |
//! | [`interact`] | Event model over an enhanced page: clicks and key presses |
//! | [`dom`] | Thin helpers over the `kuchikiki` tree |
//! | [`charset`] | Page encoding detection; pages are written back in their own encoding |
//! | [`config`] | Hierarchical `config.toml` loading, validation and merging |
//! | [`scan`] | Stage 1: walks the site directory, produces the manifest |
//! | [`enhance`] | Stage 2: runs the load pass over every page in parallel |
//! | [`output`] | CLI output formatting for both stages |
//!
//! # Design Decisions
//!
//! ## Directives Are Consumed
//!
//! Every transformation replaces the element it matched, the header replaces
//! the mount's content and the overlay adopts an existing surface. Running the
//! pass over an already-enhanced page therefore changes nothing, which makes
//! `build` safe to point at its own output.
//!
//! ## Maud For Generated Markup
//!
//! All injected markup (grids, accordions, the header, the overlay) is built
//! with [Maud](https://maud.lambda.xyz/) and then parsed into the document.
//! Titles, labels and URLs are interpolated, so they are escaped by default.

pub mod accordion;
pub mod bootstrap;
pub mod charset;
pub mod config;
pub mod dom;
pub mod enhance;
pub mod gallery;
pub mod header;
pub mod interact;
pub mod output;
pub mod overlay;
pub mod range;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
