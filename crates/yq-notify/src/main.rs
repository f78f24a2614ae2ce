use anyhow::Context;
use chrono::Utc;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use yq_notify::{
    seed_notifications, FeedTab, FeedView, NotificationStore, StoreConfig, TracingToaster,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Command::new("yq-notify")
        .version(yq_notify::VERSION)
        .about("YieldQuip notification feed")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(std::path::PathBuf))
                .help("TOML file with store settings"),
        )
        .subcommand(
            Command::new("feed")
                .about("Print the seeded notification feed")
                .arg(
                    Arg::new("tab")
                        .long("tab")
                        .default_value("all")
                        .value_parser(value_parser!(FeedTab))
                        .help("all, market or farm"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run the simulated feed for a few ticks")
                .arg(
                    Arg::new("interval-secs")
                        .long("interval-secs")
                        .default_value("1")
                        .value_parser(value_parser!(u64))
                        .help("Seconds between generated notifications"),
                )
                .arg(
                    Arg::new("ticks")
                        .long("ticks")
                        .default_value("3")
                        .value_parser(value_parser!(u32))
                        .help("Number of notifications to wait for"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducible content"),
                ),
        );

    let matches = cli.get_matches();
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("feed", args)) => {
            let tab = args.get_one::<FeedTab>("tab").copied().unwrap_or_default();
            let store = NotificationStore::create(
                &config.with_generator(false),
                seed_notifications(Utc::now()),
                Arc::new(TracingToaster),
            )?;

            let view = FeedView::build(&store, tab)?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_feed(&view);
            }
            store.shutdown().await;
        }
        Some(("simulate", args)) => {
            let interval = *args.get_one::<u64>("interval-secs").unwrap_or(&1);
            let ticks = *args.get_one::<u32>("ticks").unwrap_or(&3);
            let mut config = config
                .with_generator(true)
                .with_interval(Duration::from_secs(interval));
            if let Some(seed) = args.get_one::<u64>("seed") {
                config = config.with_seed(*seed);
            }

            let store = NotificationStore::create(
                &config,
                seed_notifications(Utc::now()),
                Arc::new(TracingToaster),
            )?;
            let mut events = store.subscribe()?;

            let mut seen = 0;
            while seen < ticks {
                match events.recv().await {
                    Ok(yq_notify::StoreEvent::Added(_)) => seen += 1,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("event stream interrupted: {}", e);
                        break;
                    }
                }
            }

            print_feed(&FeedView::build(&store, FeedTab::All)?);
            store.shutdown().await;
        }
        _ => {
            println!("Use `yq-notify feed` or `yq-notify simulate` (see --help)");
        }
    }

    Ok(())
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<StoreConfig> {
    let Some(path) = matches.get_one::<std::path::PathBuf>("config") else {
        return Ok(StoreConfig::new());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    StoreConfig::from_toml_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn print_feed(view: &FeedView) {
    let badge = view.badge.as_deref().unwrap_or("0");
    println!("Notifications [{}] ({} unread)", view.tab, badge);
    if view.show_mark_all() {
        println!("  > Mark all as read");
    }
    if let Some(empty) = view.empty_message() {
        println!("  {empty}");
        return;
    }
    for item in &view.items {
        println!(
            "  {} [{}] {} - {}",
            if item.unread { "*" } else { " " },
            item.label,
            item.when,
            item.notification.message()
        );
        if let Some(action) = item.notification.action() {
            println!("      {} -> {}", action.label, action.url);
        }
    }
}
