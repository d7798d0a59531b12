use clap::{Parser, Subcommand};
use folio_content::cache::CachingTransport;
use folio_content::client::ContentClient;
use folio_content::config::{self, Settings};
use folio_content::image::{Fit, ImageFormat, ImageUrlBuilder};
use folio_content::transport::{HttpTransport, Transport};
use folio_content::types::ImageRef;
use folio_content::{generate, output, queries, sitemap, snapshot};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that query the content store.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the query cache; every query goes to the content store
    #[arg(long, global = true)]
    no_cache: bool,
}

#[derive(Parser)]
#[command(name = "folio-content")]
#[command(about = "Content layer for a portfolio site backed by Sanity")]
#[command(long_about = "\
Content layer for a portfolio site backed by Sanity

Reads blog posts and projects from a Sanity dataset, builds image CDN URLs,
and renders the blog and projects sections as static HTML.

Configuration comes from the environment:

  SANITY_PROJECT_ID    SANITY_DATASET       SANITY_API_TOKEN
  SANITY_API_VERSION   SANITY_USE_CDN       SANITY_TIMEOUT_SECS
  SITE_URL             FOLIO_ENV            RUST_LOG

Without SANITY_PROJECT_ID and SANITY_DATASET every query returns nothing and
pages render their empty states; only image URLs refuse to build.

Run 'folio-content gen-env' to print a documented .env template.")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    cache: CacheArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the resolved settings and probe the content store
    Check,
    /// List all posts, newest first
    Posts,
    /// Show one post by slug
    Post { slug: String },
    /// List all projects in display order
    Projects,
    /// List the featured projects shown on the home page
    Featured,
    /// Show one project by slug
    Project { slug: String },
    /// Print the CDN URL for an image asset id (image-<hash>-<w>x<h>-<ext>)
    ImageUrl {
        asset: String,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long)]
        format: Option<ImageFormat>,
        #[arg(long)]
        fit: Option<Fit>,
        #[arg(long)]
        quality: Option<u32>,
    },
    /// Print sitemap.xml for the current content
    Sitemap,
    /// Render the blog and projects pages as static HTML
    Build {
        /// Output directory
        #[arg(long, default_value = "dist", env = "FOLIO_OUTPUT_DIR")]
        output: PathBuf,
    },
    /// Print a stock .env file with all variables documented
    GenEnv,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    if let Command::GenEnv = cli.command {
        print!("{}", config::stock_env());
        return Ok(());
    }

    let settings = Arc::new(Settings::from_env()?);
    let http = HttpTransport::new(Arc::clone(&settings))?;

    if cli.cache.no_cache {
        let client = ContentClient::new(settings, http);
        run(&cli.command, &client)?;
    } else {
        let client = ContentClient::new(settings, CachingTransport::new(http));
        run(&cli.command, &client)?;
        tracing::info!("query cache: {}", client.transport().stats());
    }

    Ok(())
}

fn run<T: Transport>(
    command: &Command,
    client: &ContentClient<T>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Check => {
            let probe = client.is_configured().then(|| snapshot::load(client));
            output::print_check(client.settings(), probe.as_ref());
        }
        Command::Posts => {
            output::print_posts(&client.fetch_or_default(&queries::all_posts()));
        }
        Command::Post { slug } => {
            let post = client.fetch_or_default(&queries::post_by_slug(slug));
            output::print_post(slug, post.as_ref());
        }
        Command::Projects => {
            output::print_projects("Projects", &client.fetch_or_default(&queries::all_projects()));
        }
        Command::Featured => {
            output::print_projects(
                "Featured",
                &client.fetch_or_default(&queries::featured_projects()),
            );
        }
        Command::Project { slug } => {
            let project = client.fetch_or_default(&queries::project_by_slug(slug));
            output::print_project(slug, project.as_ref());
        }
        Command::ImageUrl {
            asset,
            width,
            height,
            format,
            fit,
            quality,
        } => {
            let image = ImageRef::from_asset_id(asset.as_str());
            let Some(mut builder) =
                ImageUrlBuilder::for_image(client.settings(), &image).into_result()?
            else {
                println!("(no image asset)");
                return Ok(());
            };
            if let Some(w) = width {
                builder = builder.width(*w);
            }
            if let Some(h) = height {
                builder = builder.height(*h);
            }
            if let Some(fm) = format {
                builder = builder.format(*fm);
            }
            if let Some(fit) = fit {
                builder = builder.fit(*fit);
            }
            if let Some(q) = quality {
                builder = builder.quality(*q);
            }
            println!("{}", builder.url());
        }
        Command::Sitemap => {
            let (posts, projects) = rayon::join(
                || client.fetch_or_default(&queries::post_slugs()),
                || client.fetch_or_default(&queries::project_slugs()),
            );
            let map = sitemap::build(client.settings().site_url(), &posts, &projects);
            print!("{}", map.into_xml());
        }
        Command::Build { output: out } => {
            println!("==> Loading content");
            let content = snapshot::load(client);
            println!("==> Generating HTML → {}", out.display());
            let report = generate::generate(&content, client.settings(), out)?;
            output::print_generate_report(&report);
            println!("==> Build complete: {}", out.display());
        }
        Command::GenEnv => print!("{}", config::stock_env()),
    }
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default: this crate at info).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("folio_content=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
