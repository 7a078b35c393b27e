//! Site scanning.
//!
//! Stage 1 of the build. Walks the site directory and sorts every file into
//! one of three buckets:
//!
//! ```text
//! site/
//! ├── config.toml          # config: cascades to everything below it
//! ├── index.html           # page: enhanced
//! ├── img/p1.jpg           # asset: copied verbatim
//! └── reports/
//!     ├── config.toml      # overrides the root config for reports/
//!     └── trip.html
//! ```
//!
//! Each page carries the fully merged config of its directory, so the
//! enhance stage needs no further lookups. Hidden entries (names starting
//! with `.`) are skipped.
//!
//! [`census`] counts what the load pass would do to one page without
//! changing it; `check` prints it.

use crate::accordion::ACCORDION_TAG;
use crate::config::{self, CONFIG_FILE, ConfigError, SiteConfig};
use crate::dom;
use crate::gallery::{GALLERY_TAG, GalleryDirective};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error in {0}: {1}")]
    Config(PathBuf, ConfigError),
    #[error("Site directory not found: {0}")]
    MissingSource(PathBuf),
}

/// Everything found under the site root.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub pages: Vec<PageSource>,
    /// Non-page files, relative to the root.
    pub assets: Vec<String>,
    /// `config.toml` files that took part in the cascade, relative to the root.
    pub config_files: Vec<String>,
}

/// One HTML page and the config that applies to it.
#[derive(Debug, Clone, Serialize)]
pub struct PageSource {
    /// Path relative to the site root, `/`-separated.
    pub path: String,
    pub config: SiteConfig,
}

/// What the load pass would find in a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectiveCensus {
    pub galleries: usize,
    /// Images the galleries expand to.
    pub images: usize,
    pub accordions: usize,
    pub header_mount: bool,
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingSource(root.to_path_buf()));
    }

    let mut dir_configs: HashMap<PathBuf, (toml::Value, SiteConfig)> = HashMap::new();
    let mut pages = Vec::new();
    let mut assets = Vec::new();
    let mut config_files = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            // Parents are visited before their children.
            let parent_value = path
                .parent()
                .and_then(|parent| dir_configs.get(parent))
                .map(|(value, _)| value.clone())
                .filter(|_| entry.depth() > 0)
                .unwrap_or_else(config::stock_defaults_value);
            let resolved = resolve_dir_config(path, parent_value)?;
            dir_configs.insert(path.to_path_buf(), resolved);
            continue;
        }

        let relative = relative_path(root, path);
        let file_name = entry.file_name().to_string_lossy();
        if file_name == CONFIG_FILE {
            config_files.push(relative);
        } else if is_page(path) {
            let config = path
                .parent()
                .and_then(|parent| dir_configs.get(parent))
                .map(|(_, config)| config.clone())
                .unwrap_or_default();
            pages.push(PageSource {
                path: relative,
                config,
            });
        } else {
            assets.push(relative);
        }
    }

    Ok(Manifest {
        pages,
        assets,
        config_files,
    })
}

fn resolve_dir_config(
    dir: &Path,
    parent_value: toml::Value,
) -> Result<(toml::Value, SiteConfig), ScanError> {
    let to_scan_error = |err: ConfigError| ScanError::Config(dir.join(CONFIG_FILE), err);

    let merged = match config::load_raw_config(dir).map_err(to_scan_error)? {
        Some(raw) => config::merge_toml(parent_value, raw),
        None => parent_value,
    };
    let site_config: SiteConfig = merged
        .clone()
        .try_into()
        .map_err(|err: toml::de::Error| to_scan_error(err.into()))?;
    site_config.validate().map_err(to_scan_error)?;
    Ok((merged, site_config))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_page(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_ascii_lowercase();
            ext == "html" || ext == "htm"
        })
        .unwrap_or(false)
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Count the directives in `html` without transforming it.
pub fn census(html: &str, config: &SiteConfig) -> DirectiveCensus {
    let document = dom::parse_document(html);
    let galleries = dom::elements_named(&document, GALLERY_TAG);
    let images = galleries
        .iter()
        .map(|node| GalleryDirective::from_element(node).images().len())
        .sum();
    DirectiveCensus {
        galleries: galleries.len(),
        images,
        accordions: dom::elements_named(&document, ACCORDION_TAG).len(),
        header_mount: dom::find_by_id(&document, &config.header.mount_id).is_some(),
    }
}
