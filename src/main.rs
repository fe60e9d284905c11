mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{CatalogCommand, Cli, Commands};
use pixeldex::client::{CatalogClient, MangaQuery};
use pixeldex::config::Config;
use pixeldex::proxy;
use pixeldex_interface::model::{Chapter, Manga};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "pixeldex=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config.client.base_url = base_url.clone();
    }
    if let Commands::Serve { port: Some(port) } = &cli.command {
        config.proxy.port = *port;
    }
    config.validate()?;

    match cli.command {
        Commands::Serve { .. } => proxy::serve(&config.proxy).await,
        Commands::Catalog(command) => run_catalog(command, &config).await,
    }
}

async fn run_catalog(command: CatalogCommand, config: &Config) -> Result<()> {
    let client = CatalogClient::new(config.client.clone())
        .with_context(|| format!("invalid catalog base url {}", config.client.base_url))?;

    match command {
        CatalogCommand::Search { title, tags, limit, offset, order } => {
            let query = MangaQuery { limit, offset, title, included_tags: tags, order };
            let page = client.fetch_manga_list(&query).await?;
            for manga in &page.data {
                print_manga_line(manga);
            }
            println!("{} of {} results", page.data.len(), page.total);
        }
        CatalogCommand::Trending { limit } => {
            for manga in client.fetch_trending_manga(limit).await? {
                print_manga_line(&manga);
            }
        }
        CatalogCommand::Manga { id } => {
            let manga = client.fetch_manga_details(&id).await?;
            println!("{}", serde_json::to_string_pretty(&manga)?);
        }
        CatalogCommand::Chapters { manga_id, lang } => {
            let lang = lang.unwrap_or_else(|| config.client.preferred_language.clone());
            let feed = client.fetch_manga_chapters(&manga_id, Some(&lang)).await?;
            for chapter in &feed.chapters {
                print_chapter_line(chapter);
            }
            println!("{} readable chapters ({} listed upstream)", feed.total, feed.upstream_total);
        }
        CatalogCommand::Pages { chapter_id } => {
            let pages = client.fetch_chapter_pages(&chapter_id).await?;
            for url in pages.page_urls() {
                println!("{}", url);
            }
        }
    }

    Ok(())
}

fn print_manga_line(manga: &Manga) {
    println!("{} (ID: {}) [{}]", manga.title, manga.id, manga.status);
}

fn print_chapter_line(chapter: &Chapter) {
    let volume = chapter.volume.as_deref().map(|v| format!("Vol. {} ", v)).unwrap_or_default();
    match (&chapter.external_url, chapter.should_redirect_to_external()) {
        (Some(url), true) => println!("{}{} -> {} ({})", volume, chapter.title, url, chapter.id),
        _ => println!("{}{} [{} pages] ({})", volume, chapter.title, chapter.pages, chapter.id),
    }
}
