use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::{
    Article, KeyValueStore, MemoryStore, SearchEngine, SearchFilters, SearchQuery, SledStore,
    SortDirection, SortField, SortSpec,
};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "newsearch")]
#[command(about = "Query a news corpus with the in-memory search engine", long_about = None)]
struct Cli {
    /// Directory for persisted search history/analytics; in-memory when absent
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load articles from JSON/JSONL files and run one query
    Search {
        /// Input path (file or directory of .json/.jsonl article files)
        #[arg(long)]
        input: PathBuf,
        /// Query text; omit for filters-only browsing
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        category: Vec<String>,
        #[arg(long)]
        author: Vec<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Sort field: relevance, date, popularity, read_time, author
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, default_value_t = false)]
        ascending: bool,
        #[arg(long, default_value_t = false)]
        highlight: bool,
        #[arg(long, default_value_t = false)]
        facets: bool,
    },
    /// Load articles and print engine statistics
    Stats {
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let storage = open_storage(cli.state_dir.as_deref())?;

    match cli.command {
        Commands::Search {
            input,
            query,
            category,
            author,
            page,
            limit,
            sort,
            ascending,
            highlight,
            facets,
        } => {
            let mut engine = SearchEngine::new(storage);
            engine.initialize(load_articles(&input)?);

            let search = SearchQuery {
                text: query,
                filters: SearchFilters {
                    categories: category,
                    authors: author,
                    ..Default::default()
                },
                sort: sort.as_deref().map(|field| parse_sort(field, ascending)).transpose()?,
                page,
                limit,
                highlight,
                facets,
            };
            let response = engine.search(&search);
            tracing::info!(total = response.total, took_ms = response.took_ms, "search complete");
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Stats { input } => {
            let mut engine = SearchEngine::new(storage);
            engine.initialize(load_articles(&input)?);
            println!("{}", serde_json::to_string_pretty(&engine.statistics())?);
        }
    }
    Ok(())
}

fn open_storage(state_dir: Option<&Path>) -> Result<Box<dyn KeyValueStore>> {
    Ok(match state_dir {
        Some(dir) => Box::new(SledStore::open(dir).context("opening state dir")?),
        None => Box::new(MemoryStore::new()),
    })
}

fn parse_sort(field: &str, ascending: bool) -> Result<SortSpec> {
    let field = match field {
        "relevance" => SortField::Relevance,
        "date" => SortField::Date,
        "popularity" => SortField::Popularity,
        "read_time" => SortField::ReadTime,
        "author" => SortField::Author,
        other => anyhow::bail!("unknown sort field: {other}"),
    };
    let direction = if ascending { SortDirection::Ascending } else { SortDirection::Descending };
    Ok(SortSpec { field, direction })
}

fn load_articles(input: &Path) -> Result<Vec<Article>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file()
                && p.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| matches!(ext, "json" | "jsonl"))
            {
                files.push(p.to_path_buf());
            }
        }
    } else {
        files.push(input.to_path_buf());
    }

    let mut articles = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut articles)?;
        } else {
            read_json(&file, &mut articles)?;
        }
    }
    tracing::info!(articles = articles.len(), "corpus loaded");
    Ok(articles)
}

fn read_jsonl(file: &Path, out: &mut Vec<Article>) -> Result<()> {
    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {file:?}"))?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(serde_json::from_str(&line).with_context(|| format!("parsing {file:?}"))?);
    }
    Ok(())
}

fn read_json(file: &Path, out: &mut Vec<Article>) -> Result<()> {
    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {file:?}"))?);
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    match value {
        serde_json::Value::Array(items) => {
            for item in items {
                out.push(serde_json::from_value(item).with_context(|| format!("parsing {file:?}"))?);
            }
        }
        other => out.push(serde_json::from_value(other).with_context(|| format!("parsing {file:?}"))?),
    }
    Ok(())
}
