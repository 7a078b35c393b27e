use clap::{Parser, Subcommand};
use page_enhance::{config, enhance, output, scan};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "page-enhance")]
#[command(about = "Expand gallery and accordion directives in a static site")]
#[command(long_about = "\
Expand gallery and accordion directives in a static site

Pages are plain HTML. The enhancer rewrites two custom tags and injects the
shared header and the image overlay, so the published site needs no
transformation script at load time.

Directives:

  <image-gallery prefix=\"img/p\" suffix=\".jpg\">1-10, 12</image-gallery>
      → div.gallery-grid with img/p1.jpg … img/p10.jpg, img/p12.jpg

  <accordion title=\"History\" active> … </accordion>
      → div.accordion (expanded when `active` is present)

  <body data-page-title=\"Title\"> + <div id=\"header-placeholder\"></div>
      → menu button, dropdown navigation and the page title

Site structure:

  site/
  ├── config.toml          # Site config (optional, cascades to children)
  ├── index.html           # Enhanced
  ├── img/                 # Everything else is copied as-is
  └── reports/
      ├── config.toml      # Overrides the root config for reports/
      └── trip.html

Run 'page-enhance gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site directory
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enhance every page of the site into the output directory
    Build {
        /// Also write a JSON build summary to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List pages and the directives they contain, without writing anything
    Check,
    /// Enhance a single HTML file and print it to stdout
    Render {
        /// The page to enhance
        file: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { report } => {
            if cli.output.starts_with(&cli.source) {
                eprintln!(
                    "warning: output {} is inside the site directory; it will be scanned on the next build",
                    cli.output.display()
                );
            }

            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &[]);

            println!("==> Stage 2: Enhancing pages \u{2192} {}", cli.output.display());
            init_thread_pool(&cli.source)?;
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_page_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = enhance::enhance_site(&manifest, &cli.source, &cli.output, Some(tx));
            printer.join().ok();
            let summary = result?;
            output::print_build_summary(&summary);

            if let Some(report_path) = report {
                let json = serde_json::to_string_pretty(&summary)?;
                std::fs::write(&report_path, json)?;
                println!("Report written to {}", report_path.display());
            }
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let mut censuses = Vec::with_capacity(manifest.pages.len());
            for page in &manifest.pages {
                let decoded = enhance::read_page(&cli.source, &page.path)?;
                censuses.push(scan::census(&decoded.html, &page.config));
            }
            output::print_scan_output(&manifest, &censuses);
            println!("==> Site is valid");
        }
        Command::Render { file } => {
            let site_config = config_for_file(&file)?;
            let decoded = enhance::read_page(Path::new(""), &file.to_string_lossy())?;
            let (bytes, _) = enhance::enhance_decoded(&decoded, &site_config);
            std::io::stdout().write_all(&bytes)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool from the root `[processing]` config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(source: &Path) -> Result<(), config::ConfigError> {
    let root_config = config::load_config(source)?;
    rayon::ThreadPoolBuilder::new()
        .num_threads(config::effective_threads(&root_config.processing))
        .build_global()
        .ok();
    Ok(())
}

/// Config for a standalone file: the `config.toml` next to it, if any.
fn config_for_file(file: &Path) -> Result<config::SiteConfig, config::ConfigError> {
    match file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        Some(dir) => config::load_config(dir),
        None => config::load_config(Path::new(".")),
    }
}
