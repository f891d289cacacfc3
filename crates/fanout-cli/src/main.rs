mod config;
mod generate_cmd;
mod resolve_cmd;
mod spec_cmds;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fanout", about = "Production matrix generator and job consolidator")]
struct Cli {
    /// Path to a spec library TOML file (overrides FANOUT_SPEC_CATALOG)
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a fanout config file
    Init {
        /// Path to a spec library TOML file to use by default
        #[arg(long)]
        catalog_path: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate a production batch from a strategy/concept pairing
    Generate {
        /// Audience segment name (e.g. "The Gamer")
        #[arg(long)]
        segment: String,
        /// Primary message pillar for the segment
        #[arg(long)]
        pillar: String,
        /// Target environment label, repeatable (free text or spec ID)
        #[arg(long = "env")]
        environments: Vec<String>,
        /// Creative concept name (e.g. "Level Up")
        #[arg(long)]
        concept: String,
        /// Master headline for the concept
        #[arg(long)]
        headline: String,
        /// Visual description or reference path
        #[arg(long)]
        visual: Option<String>,
        /// Batch name (defaults to "<segment> – <concept>")
        #[arg(long)]
        batch_name: Option<String>,
        /// Emit the batch and tickets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how raw environment labels resolve to canonical spec IDs
    Resolve {
        /// Raw labels to resolve
        labels: Vec<String>,
    },
    /// Spec catalog browsing and editing
    Specs {
        #[command(subcommand)]
        command: SpecCommands,
    },
}

#[derive(Subcommand)]
enum SpecCommands {
    /// List all specs in the active catalog
    List {
        /// Include safe-zone guidance
        #[arg(long)]
        verbose: bool,
    },
    /// Show the full definition of one spec
    Show {
        /// Canonical spec ID (e.g. META_STORY)
        spec_id: String,
    },
    /// Add a spec to a file-backed catalog; the ID is derived from
    /// platform and placement
    Add {
        /// Platform name (e.g. "TikTok")
        #[arg(long)]
        platform: String,
        /// Placement within the platform (e.g. "In-Feed")
        #[arg(long)]
        placement: String,
        /// Human-readable format name (defaults to the placement)
        #[arg(long)]
        format_name: Option<String>,
        /// Pixel dimensions as "WxH" (e.g. "1080x1920")
        #[arg(long)]
        dimensions: String,
        /// Aspect ratio label (e.g. "9:16")
        #[arg(long)]
        aspect_ratio: String,
        /// Maximum duration in seconds (0 = no limit)
        #[arg(long, default_value_t = 0)]
        max_duration: u32,
        /// Delivery file type (e.g. "mp4", "html5/jpg")
        #[arg(long)]
        file_type: String,
        /// Allowed media type, repeatable (video, static, html5)
        #[arg(long = "media")]
        media: Vec<String>,
        /// Placement can run HTML5 creative
        #[arg(long)]
        html5: bool,
        /// Safe-zone guidance for designers
        #[arg(long)]
        safe_zone: Option<String>,
    },
}

/// Execute the `fanout init` command: write the config file.
fn cmd_init(catalog_path: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        catalog: config::CatalogSection {
            path: catalog_path.clone(),
        },
    };
    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    match catalog_path {
        Some(p) => println!("  catalog.path = {p}"),
        None => println!("  catalog.path unset (using the embedded spec library)"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            catalog_path,
            force,
        } => {
            cmd_init(catalog_path, force)?;
        }
        Commands::Generate {
            segment,
            pillar,
            environments,
            concept,
            headline,
            visual,
            batch_name,
            json,
        } => {
            let catalog = config::resolve_catalog(cli.catalog.as_deref())?;
            generate_cmd::run_generate(
                catalog,
                generate_cmd::GenerateArgs {
                    segment,
                    pillar,
                    environments,
                    concept,
                    headline,
                    visual,
                    batch_name,
                    json,
                },
            )
            .await?;
        }
        Commands::Resolve { labels } => {
            let catalog = config::resolve_catalog(cli.catalog.as_deref())?;
            resolve_cmd::run_resolve(catalog, &labels)?;
        }
        Commands::Specs { command } => {
            let catalog = config::resolve_catalog(cli.catalog.as_deref())?;
            match command {
                SpecCommands::List { verbose } => spec_cmds::run_list(&catalog, verbose)?,
                SpecCommands::Show { spec_id } => spec_cmds::run_show(&catalog, &spec_id)?,
                SpecCommands::Add {
                    platform,
                    placement,
                    format_name,
                    dimensions,
                    aspect_ratio,
                    max_duration,
                    file_type,
                    media,
                    html5,
                    safe_zone,
                } => {
                    let Some(path) = config::resolve_catalog_path(cli.catalog.as_deref()) else {
                        anyhow::bail!(
                            "specs add needs a file-backed catalog; pass --catalog or \
                             configure one with `fanout init --catalog-path <path>`"
                        );
                    };
                    spec_cmds::run_add(
                        &catalog,
                        &path,
                        spec_cmds::AddSpecArgs {
                            platform,
                            placement,
                            format_name,
                            dimensions,
                            aspect_ratio,
                            max_duration_secs: max_duration,
                            file_type,
                            media,
                            html5,
                            safe_zone,
                        },
                    )?;
                }
            }
        }
    }

    Ok(())
}
