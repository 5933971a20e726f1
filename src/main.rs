use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use unichar::config::{Config, load_config, load_config_from};
use unichar::executor::copy_to_clipboard;
use unichar::refresh::UcdRefresher;
use unichar::sources::ucd::{UcdSource, write_table};
use unichar::state::{QueryService, RefreshStatus};
use unichar::ui::icons::IconCache;
use unichar::ui::render::{ResultItem, render_results};

const REFRESH_WAIT: Duration = Duration::from_secs(120);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the default location
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Character table to search
    #[arg(short, long, global = true)]
    table: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Search once and print the results
    Search {
        query: Vec<String>,
        #[arg(short, long)]
        limit: Option<i64>,
        #[arg(short, long, allow_hyphen_values = true)]
        min_score: Option<i64>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read one query per line; `:copy N` / `:code N` copy a result
    Interactive,
    /// Build the character table from the Unicode Character Database
    Generate {
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// UCD base URL or local directory
        #[arg(short, long)]
        source: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(table) = &args.table {
        config.data.table = Some(table.clone());
    }

    match args.command {
        Cmd::Search { query, limit, min_score, json } => {
            if let Some(limit) = limit {
                config.search.result_limit = limit;
            }
            if let Some(min_score) = min_score {
                config.search.min_score = min_score;
            }
            run_search(&config, &query.join(" "), json)
        }
        Cmd::Interactive => run_interactive(&config),
        Cmd::Generate { out, source } => {
            let out = out.unwrap_or_else(|| config.data.table_path());
            let source = UcdSource::parse(source.as_deref().unwrap_or(&config.data.ucd_source));
            let table = source.build_table()?;
            write_table(&out, &table)?;
            Ok(())
        }
    }
}

fn open_service(config: &Config) -> Result<QueryService> {
    let table = config.data.table_path();
    let refresher = UcdRefresher::new(UcdSource::parse(&config.data.ucd_source));
    let service = QueryService::open(&table)
        .with_context(|| format!("loading {:?} (run `unichar generate` to create it)", table))?
        .with_refresher(Arc::new(refresher));
    Ok(service)
}

fn run_search(config: &Config, query: &str, json: bool) -> Result<()> {
    let mut service = open_service(config)?;
    let mut icons = IconCache::new(config.general.icon_dir(), config.general.icon_font.clone());

    let results = service.query(query, &config.search);
    let items = render_results(&results, Some(&mut icons));

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print_items(&items);
    }

    // Let a regeneration started by this query land on disk
    if service.is_refreshing() && service.wait_for_refresh(REFRESH_WAIT) == RefreshStatus::Running {
        log::warn!("Table refresh still running, giving up on it");
    }
    Ok(())
}

fn run_interactive(config: &Config) -> Result<()> {
    let mut service = open_service(config)?;
    let mut icons = IconCache::new(config.general.icon_dir(), config.general.icon_font.clone());
    let mut items: Vec<ResultItem> = Vec::new();

    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed == ":q" {
            break;
        } else if let Some(rest) = trimmed.strip_prefix(":copy") {
            if let Err(e) = copy_selected(&items, rest, config, |item| &item.copy_text) {
                eprintln!("{:#}", e);
            }
        } else if let Some(rest) = trimmed.strip_prefix(":code") {
            if let Err(e) = copy_selected(&items, rest, config, |item| &item.copy_code) {
                eprintln!("{:#}", e);
            }
        } else {
            let results = service.query(&line, &config.search);
            items = render_results(&results, Some(&mut icons));
            print_items(&items);
        }
        prompt()?;
    }

    service.wait_for_refresh(REFRESH_WAIT);
    Ok(())
}

fn copy_selected(
    items: &[ResultItem],
    index: &str,
    config: &Config,
    payload: impl Fn(&ResultItem) -> &String,
) -> Result<()> {
    let n: usize = index.trim().parse().context("expected a result number")?;
    let Some(item) = n.checked_sub(1).and_then(|i| items.get(i)) else {
        bail!("no result number {}", n);
    };
    copy_to_clipboard(payload(item), &config.general)?;
    Ok(())
}

fn print_items(items: &[ResultItem]) {
    if items.is_empty() {
        println!("No results");
        return;
    }
    for (i, item) in items.iter().enumerate() {
        println!("{:>2}. {}", i + 1, item.title);
        println!("    {}", item.description);
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}
