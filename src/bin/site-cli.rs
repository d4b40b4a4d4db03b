use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use site_engine::config::{load_config, SiteConfig};
use site_engine::content::ContentStore;
use site_engine::http::server::site_backends;
use site_engine::render::node::parse_document;
use site_engine::site::{Resolution, SitePipeline, SiteResponse};

#[derive(Parser)]
#[command(name = "site-cli")]
#[command(about = "Offline tools for the multilingual site engine", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration file
    CheckConfig,
    /// Show how a request path resolves
    Resolve { path: String },
    /// Render a request path as the server would
    Render {
        path: String,
        #[arg(long)]
        editor: bool,
    },
    /// Render the isolated preview of one component
    Component {
        name: String,
        #[arg(long)]
        lang: Option<String>,
    },
    /// List translation keys referenced by a page template
    Keys { identity: String },
}

fn load(path: &Path) -> anyhow::Result<SiteConfig> {
    load_config(path).with_context(|| format!("loading {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load(&cli.config)?;
    let (store, translator) = site_backends(&config);
    let pipeline = SitePipeline::new(&config, &store, &translator);

    match cli.command {
        Commands::CheckConfig => println!(
            "OK: {} (project {}, languages {})",
            cli.config.display(),
            config.site.project_path.display(),
            config.languages.supported.join(",")
        ),
        Commands::Resolve { path } => match pipeline.resolve(&path) {
            Resolution::Redirect { location } => println!("redirect 301 → {location}"),
            Resolution::Route {
                language,
                route,
                current_path,
            } => {
                println!("language:  {}{}", language.code, if language.is_default { " (default)" } else { "" });
                println!("path:      /{current_path}");
                println!("found:     {}", route.found);
                println!("identity:  {}", route.identity);
                println!("segments:  {}", route.segments.join(" / "));
                if !route.params.is_empty() {
                    println!("params:    {}", route.params.join(" / "));
                }
            }
        },
        Commands::Render { path, editor } => match pipeline.handle(&path, editor) {
            SiteResponse::Html { status, body } => {
                eprintln!("status {status}");
                println!("{body}");
            }
            SiteResponse::Redirect { location } => println!("redirect 301 → {location}"),
        },
        Commands::Component { name, lang } => {
            println!("{}", pipeline.component_preview(&name, lang.as_deref()));
        }
        Commands::Keys { identity } => {
            let json = store.load_page(&identity)?;
            let nodes = parse_document(&json).with_context(|| format!("parsing {identity}"))?;
            let mut keys = std::collections::BTreeSet::new();
            for node in &nodes {
                keys.extend(node.all_translation_keys());
            }
            for key in keys {
                println!("{key}");
            }
        }
    }

    Ok(())
}
