//! Page enhancement.
//!
//! Stage 2 of the build. Runs the load pass over every scanned page and
//! writes the result to the output directory, mirroring the site layout:
//!
//! ```text
//! site/index.html          →  dist/index.html          (enhanced)
//! site/reports/trip.html   →  dist/reports/trip.html   (enhanced)
//! site/img/p1.jpg          →  dist/img/p1.jpg          (copied)
//! ```
//!
//! Enhanced pages end with the embedded runtime script (`static/runtime.js`),
//! which wires the accordion, menu and overlay listeners in the browser. The
//! script is added once; an already-enhanced page keeps its copy.
//!
//! Pages are read and written in their own character encoding (see
//! [`crate::charset`]). A page that does not decode stops the build with an
//! error naming it.
//!
//! ## Parallel Processing
//!
//! Pages are independent, so they are processed in parallel with
//! [rayon](https://docs.rs/rayon). Progress is reported per page over an
//! optional channel so the CLI can print while workers run.

use crate::bootstrap::{BootstrapReport, bootstrap};
use crate::charset::{DecodeError, DecodedPage, decode_page};
use crate::config::SiteConfig;
use crate::dom;
use crate::scan::{Manifest, PageSource};
use kuchikiki::NodeRef;
use maud::{Markup, PreEscaped, html};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

const RUNTIME_JS: &str = include_str!("../static/runtime.js");
pub const RUNTIME_SCRIPT_ID: &str = "page-enhance-runtime";

#[derive(Error, Debug)]
pub enum EnhanceError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Cannot decode {path}: {source}")]
    Decode { path: String, source: DecodeError },
}

/// Progress report for one processed file.
#[derive(Debug, Clone)]
pub enum PageEvent {
    Enhanced {
        path: String,
        report: BootstrapReport,
    },
    AssetCopied {
        path: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    pub path: String,
    #[serde(flatten)]
    pub report: BootstrapReport,
}

/// Totals for a whole build; serialized by `build --report`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildSummary {
    pub pages: Vec<PageResult>,
    pub assets: usize,
}

impl BuildSummary {
    pub fn galleries(&self) -> usize {
        self.pages.iter().map(|p| p.report.galleries).sum()
    }

    pub fn accordions(&self) -> usize {
        self.pages.iter().map(|p| p.report.accordions).sum()
    }

    pub fn headers(&self) -> usize {
        self.pages.iter().filter(|p| p.report.header_injected).count()
    }
}

fn render_runtime_script(mount_id: &str) -> Markup {
    html! {
        script id=(RUNTIME_SCRIPT_ID) data-header-mount=(mount_id) { (PreEscaped(RUNTIME_JS)) }
    }
}

/// Append the runtime script to `<body>` unless it is already there.
///
/// The script only wires a menu found inside `mount_id`. Returns whether a
/// script was added.
pub fn inject_runtime(document: &NodeRef, mount_id: &str) -> bool {
    if dom::find_by_id(document, RUNTIME_SCRIPT_ID).is_some() {
        return false;
    }
    let Some(body) = dom::body(document) else {
        return false;
    };
    for node in dom::fragment(render_runtime_script(mount_id)) {
        body.append(node);
    }
    true
}

/// Enhance a single HTML document.
pub fn enhance_html(html: &str, config: &SiteConfig) -> (String, BootstrapReport) {
    let document = dom::parse_document(html);
    let (report, _overlay) = bootstrap(&document, config);
    if config.runtime.inject_script {
        inject_runtime(&document, &config.header.mount_id);
    }
    (dom::serialize(&document), report)
}

/// Read and decode one page. `path` is relative to `root` and names the page
/// in errors.
pub fn read_page(root: &Path, path: &str) -> Result<DecodedPage, EnhanceError> {
    let bytes = fs::read(root.join(path)).map_err(|source| EnhanceError::Io {
        path: path.to_string(),
        source,
    })?;
    decode_page(&bytes).map_err(|source| EnhanceError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Enhance a decoded page, encoding the result like the source.
pub fn enhance_decoded(page: &DecodedPage, config: &SiteConfig) -> (Vec<u8>, BootstrapReport) {
    let (html, report) = enhance_html(&page.html, config);
    (page.encode(&html), report)
}

/// Enhance every page of `manifest` and copy its assets into `output_dir`.
pub fn enhance_site(
    manifest: &Manifest,
    source_root: &Path,
    output_dir: &Path,
    events: Option<Sender<PageEvent>>,
) -> Result<BuildSummary, EnhanceError> {
    create_dir(output_dir)?;

    let pages = manifest
        .pages
        .par_iter()
        .map(|page| {
            let result = enhance_page(page, source_root, output_dir)?;
            if let Some(tx) = &events {
                tx.send(PageEvent::Enhanced {
                    path: result.path.clone(),
                    report: result.report.clone(),
                })
                .ok();
            }
            Ok(result)
        })
        .collect::<Result<Vec<_>, EnhanceError>>()?;

    manifest.assets.par_iter().try_for_each(|asset| {
        let target = output_dir.join(asset);
        if let Some(parent) = target.parent() {
            create_dir(parent)?;
        }
        fs::copy(source_root.join(asset), &target).map_err(|source| EnhanceError::Io {
            path: asset.clone(),
            source,
        })?;
        if let Some(tx) = &events {
            tx.send(PageEvent::AssetCopied {
                path: asset.clone(),
            })
            .ok();
        }
        Ok::<(), EnhanceError>(())
    })?;

    Ok(BuildSummary {
        pages,
        assets: manifest.assets.len(),
    })
}

fn enhance_page(
    page: &PageSource,
    source_root: &Path,
    output_dir: &Path,
) -> Result<PageResult, EnhanceError> {
    let io_error = |source| EnhanceError::Io {
        path: page.path.clone(),
        source,
    };

    let decoded = read_page(source_root, &page.path)?;
    let (html, report) = enhance_decoded(&decoded, &page.config);

    let target = output_dir.join(&page.path);
    if let Some(parent) = target.parent() {
        create_dir(parent)?;
    }
    fs::write(&target, html).map_err(io_error)?;

    Ok(PageResult {
        path: page.path.clone(),
        report,
    })
}

fn create_dir(dir: &Path) -> Result<(), EnhanceError> {
    fs::create_dir_all(dir).map_err(|source| EnhanceError::Io {
        path: dir.display().to_string(),
        source,
    })
}
