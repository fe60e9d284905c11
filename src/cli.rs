use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pixeldex::client::SortDirection;

/// MangaDex reverse proxy and catalog client
#[derive(Parser)]
#[command(name = "pixeldex", version)]
#[command(about = "Run the MangaDex CORS proxy or query the catalog through it", long_about = None)]
pub struct Cli {
    /// Config file (TOML). Defaults to the per-user config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the proxy's /api mount
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the reverse proxy
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    #[command(flatten)]
    Catalog(CatalogCommand),
}

/// Commands that query the catalog through the proxy.
#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Search the catalog
    Search {
        #[arg(short, long)]
        title: Option<String>,
        /// Tag id to require; repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(short, long)]
        limit: Option<u32>,
        #[arg(short, long)]
        offset: Option<u32>,
        /// Sort as field=asc|desc; repeatable, first wins
        #[arg(long, value_parser = parse_order)]
        order: Vec<(String, SortDirection)>,
    },
    /// Most-followed manga
    Trending {
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show one manga as JSON
    Manga { id: String },
    /// List readable chapters of a manga
    Chapters {
        manga_id: String,
        /// Translation language; defaults to the configured preferred language
        #[arg(long)]
        lang: Option<String>,
    },
    /// Print page image URLs of a chapter
    Pages { chapter_id: String },
}

fn parse_order(s: &str) -> Result<(String, SortDirection), String> {
    let (field, dir) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=asc|desc, got `{}`", s))?;
    if field.is_empty() {
        return Err(format!("missing sort field in `{}`", s));
    }
    Ok((field.to_string(), dir.parse()?))
}
