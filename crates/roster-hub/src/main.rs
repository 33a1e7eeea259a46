//! Command line browser for the grouped user directory

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use roster_core::{Category, Record};
use roster_hub::{HubConfig, UserHub};
use roster_source::HttpPageSource;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Command::new("roster-hub")
        .version(roster_hub::VERSION)
        .about("Browse the user directory grouped by category")
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("User API endpoint"),
        )
        .arg(
            Arg::new("page")
                .long("page")
                .default_value("1")
                .value_parser(value_parser!(u32))
                .help("Page to load, starting at 1"),
        )
        .arg(
            Arg::new("page-size")
                .long("page-size")
                .value_parser(value_parser!(u32))
                .help("Users per page"),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .help("Grouping category: firstname, dob.age, gender or nat"),
        )
        .arg(
            Arg::new("search")
                .long("search")
                .help("Only show users whose name contains this term"),
        )
        .arg(
            Arg::new("steps")
                .long("steps")
                .default_value("0")
                .value_parser(value_parser!(usize))
                .help("Extra reveal steps, as if scrolled to the bottom"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        );

    let matches = cli.get_matches();

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => HubConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => HubConfig::default(),
    };
    if let Some(api_url) = matches.get_one::<String>("api-url") {
        config = config.with_api_url(api_url.clone());
    }
    if let Some(page_size) = matches.get_one::<u32>("page-size") {
        config = config.with_page_size(*page_size);
    }
    if let Some(category) = matches.get_one::<String>("category") {
        config = config.with_category(category.parse::<Category>()?);
    }

    let page = matches.get_one::<u32>("page").copied().unwrap_or(1);
    let steps = matches.get_one::<usize>("steps").copied().unwrap_or(0);

    let source = HttpPageSource::new(config.api_url.clone()).with_seed(config.seed.clone());
    let mut hub = UserHub::new(source, config)?;
    tracing::debug!(engine = %hub.engine_kind(), "hub ready");

    hub.load_page(page)
        .await
        .with_context(|| format!("loading page {page}"))?;
    if let Some(term) = matches.get_one::<String>("search") {
        hub.search(term);
    }
    hub.settle().await;

    for _ in 0..steps {
        if hub.reveal_more() == 0 {
            break;
        }
    }

    if matches.get_flag("json") {
        print_json(&hub)?;
    } else {
        print_text(&hub);
    }
    Ok(())
}

/// Install the subscriber; `ROSTER_LOG` sets the filter and
/// `ROSTER_LOG_FORMAT=json` switches to JSON lines on stderr
fn init_tracing() {
    let filter = EnvFilter::try_from_env("ROSTER_LOG").unwrap_or_else(|_| EnvFilter::new("roster=info"));
    let format = env::var("ROSTER_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn print_json<S>(hub: &UserHub<S>) -> anyhow::Result<()>
where
    S: roster_source::PageSource,
{
    let groups = hub
        .visible_groups()
        .map(|(key, users)| serde_json::to_value(users).map(|value| (key.to_string(), value)))
        .collect::<serde_json::Result<serde_json::Map<String, serde_json::Value>>>()?;

    let output = serde_json::json!({
        "page": hub.current_page(),
        "pages": hub.displayed_pages(),
        "category": hub.category().value(),
        "search": hub.search_term(),
        "revealed": hub.window().revealed_count(),
        "total": hub.snapshot().map_or(0, |snapshot| snapshot.record_count()),
        "groups": groups,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text<S>(hub: &UserHub<S>)
where
    S: roster_source::PageSource,
{
    let total = hub.snapshot().map_or(0, |snapshot| snapshot.record_count());
    println!(
        "Page {} | {} | {}/{} users shown",
        hub.current_page(),
        hub.category().label(),
        hub.window().revealed_count(),
        total
    );

    for (key, users) in hub.visible_groups() {
        let group_total = hub
            .snapshot()
            .and_then(|snapshot| snapshot.get(key.as_str()))
            .map_or(users.len(), <[Record]>::len);
        println!();
        println!("{key} ({}/{group_total})", users.len());
        for user in users {
            println!(
                "  {} {} [{}]",
                user.get_str("firstname").unwrap_or_default(),
                user.get_str("lastname").unwrap_or_default(),
                user.get_str("nat").unwrap_or("?")
            );
        }
    }

    println!();
    let pages: Vec<String> = hub.displayed_pages().iter().map(u32::to_string).collect();
    println!("Pages: {}", pages.join(" "));
}
