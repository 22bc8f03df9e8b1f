use clap::{Parser, Subcommand};
use folio::catalog::{self, Catalog};
use folio::config::{self, FolioConfig};
use folio::context::PageContext;
use folio::i18n::Labels;
use folio::logging::{LogConfig, init_logging};
use folio::output;
use folio::render::{self, Skin};
use folio::replay::{self, Replay, SnapshotTarget};
use folio::types::{Language, Theme};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::info;

fn version_string() -> &'static str {
    let hash = env!("FOLIO_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        let version = format!("{}@{hash}", env!("CARGO_PKG_VERSION"));
        // Leaked once at startup
        Box::leak(version.into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Headless portfolio gallery: catalog, viewer replay, and HTML snapshots")]
#[command(long_about = "\
Headless portfolio gallery: catalog, viewer replay, and HTML snapshots

The catalog is a JSON file of projects with English and Finnish text. The
gallery viewer and page context run as state machines over virtual time, so
an interaction script replays identically every run.

Replay script steps:
  open, close, next, prev, go_to, click_slide, click_backdrop,
  close_fullscreen, key, touch_start, touch_move, touch_end, share,
  image_loaded, image_failed, advance, toggle_menu, menu_link,
  toggle_theme, set_language, insert, intersect, unmount_reveal

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project catalog (JSON)
    #[arg(long, default_value = "catalog.json", global = true)]
    catalog: PathBuf,

    /// Config file; stock defaults apply when it does not exist
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Label overrides (TOML with [en] and [fi] tables)
    #[arg(long, global = true)]
    labels: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog projects
    Projects {
        /// Display language (defaults to site.default_language)
        #[arg(long)]
        lang: Option<Language>,
        /// Only projects of this type
        #[arg(long = "type")]
        project_type: Option<String>,
    },
    /// Render the gallery modal for one project as an HTML page
    Render {
        /// Project id
        id: String,
        #[arg(long)]
        lang: Option<Language>,
        /// Carousel skin: dots or thumbnails
        #[arg(long, default_value = "dots")]
        skin: Skin,
        /// Slide to show (0-based)
        #[arg(long, default_value_t = 0)]
        slide: usize,
        /// Render the fullscreen overlay
        #[arg(long)]
        fullscreen: bool,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replay an interaction script and print the state after each step
    Replay {
        /// Script file (JSON array of steps)
        script: PathBuf,
        #[arg(long)]
        lang: Option<Language>,
        /// Make every clipboard write fail
        #[arg(long)]
        clipboard_fails: bool,
    },
    /// Validate the catalog, config, and labels without doing anything else
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let ansi = std::io::stderr().is_terminal();
    init_logging(&LogConfig::from_verbosity(cli.verbose).with_ansi(ansi))?;

    match cli.command {
        Command::Projects { lang, project_type } => {
            let (config, catalog) = load_inputs(&cli.config, &cli.catalog)?;
            let lang = lang.unwrap_or(config.site.default_language);
            let labels = load_labels(cli.labels.as_deref(), lang)?;
            let projects = catalog.projects(lang);
            let filter = project_type.as_deref();
            let shown = catalog::filter_by_type(&projects, filter);
            output::print_projects(&shown, lang, filter, &labels);
        }
        Command::Render {
            id,
            lang,
            skin,
            slide,
            fullscreen,
            out,
        } => {
            let (config, catalog) = load_inputs(&cli.config, &cli.catalog)?;
            let lang = lang.unwrap_or(config.site.default_language);
            let labels = load_labels(cli.labels.as_deref(), lang)?;
            let target = SnapshotTarget {
                project: id,
                slide,
                fullscreen,
            };
            let html = render_snapshot(&catalog, &config, &labels, lang, skin, &target)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, html)?;
                    println!("==> Wrote {}", path.display());
                }
                None => println!("{}", html),
            }
        }
        Command::Replay {
            script,
            lang,
            clipboard_fails,
        } => {
            let (mut config, catalog) = load_inputs(&cli.config, &cli.catalog)?;
            let steps = replay::load_script(&script)?;
            if let Some(lang) = lang {
                config.site.default_language = lang;
            }
            let theme = Theme::resolve(config.site.default_theme, false);
            let mut replay = Replay::new(&catalog, &config, theme);
            replay.host.clipboard_fails = clipboard_fails;
            let trace = replay.run(&steps)?;
            output::print_trace(&trace);
        }
        Command::Check => {
            println!("==> Checking {}", cli.catalog.display());
            let (config, catalog) = load_inputs(&cli.config, &cli.catalog)?;
            for lang in [Language::En, Language::Fi] {
                load_labels(cli.labels.as_deref(), lang)?;
            }
            let config_path = cli.config.exists().then_some(cli.config.as_path());
            output::print_check(&catalog, config.site.default_language, config_path);
            println!("==> Catalog is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_inputs(
    config_path: &Path,
    catalog_path: &Path,
) -> Result<(FolioConfig, Catalog), Box<dyn std::error::Error>> {
    let config = config::load_config(config_path)?;
    let catalog = catalog::load_catalog(catalog_path)?;
    info!(
        projects = catalog.projects.len(),
        catalog = %catalog_path.display(),
        "catalog loaded"
    );
    Ok((config, catalog))
}

fn load_labels(path: Option<&Path>, lang: Language) -> Result<Labels, folio::i18n::LabelsError> {
    match path {
        Some(path) => Labels::load_overrides(path, lang),
        None => Ok(Labels::builtin(lang)),
    }
}

/// Settle `target` in a fresh replay and render the resulting page.
fn render_snapshot(
    catalog: &Catalog,
    config: &FolioConfig,
    labels: &Labels,
    lang: Language,
    skin: Skin,
    target: &SnapshotTarget,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut replay_config = config.clone();
    replay_config.site.default_language = lang;
    let theme = Theme::resolve(config.site.default_theme, false);
    let mut replay = Replay::new(catalog, &replay_config, theme);
    replay.settle(target)?;

    let ctx: &PageContext = &replay.context;
    let page = render::render_page(ctx, replay.session(), labels, skin);
    Ok(page.into_string())
}
