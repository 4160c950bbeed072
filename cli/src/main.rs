use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use webhelp_search_cli::{open_engine, render_json, render_text, run_query, Overrides};

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Parser)]
#[command(about = "Search a WebHelp search index")]
struct Args {
    /// Index directory path
    #[arg(long, default_value = "./index")]
    index: PathBuf,
    /// Indexer language, overrides webhelp.language
    #[arg(long)]
    language: Option<String>,
    /// Force stemming on or off
    #[arg(long)]
    stemming: Option<bool>,
    /// Force the rating display on or off
    #[arg(long)]
    ranking: Option<bool>,
    /// Paginate with this many items per page
    #[arg(long)]
    per_page: Option<usize>,
    /// 1-based result page
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    query: String,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let args = Args::parse();

    let overrides = Overrides { language: args.language, stemming: args.stemming, ranking: args.ranking, items_per_page: args.per_page };
    let engine = open_engine(&args.index, &overrides)?;
    let response = run_query(&engine, &args.query, args.page);
    match args.format {
        Format::Json => println!("{}", render_json(&response)?),
        Format::Text => print!("{}", render_text(&response)),
    }
    Ok(())
}
