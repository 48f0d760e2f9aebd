use clap::{Arg, ArgAction, ArgMatches, Command};
use dotenv::dotenv;
use fxconv::convert::{convert_many, Converted};
use fxconv::models::RateSnapshot;
use fxconv::store::SnapshotStore;
use fxconv::{config, FetchError};
use rust_decimal::Decimal;
use std::error::Error;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

fn cli() -> Command {
    Command::new("fxconv")
        .about("Convert amounts between currencies using cached exchange rates")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("refresh")
                .long("refresh")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Fetch fresh rates even if the cached snapshot is not stale"),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert an amount from one currency to one or more targets")
                .arg(Arg::new("from").required(true).help("Origin currency code"))
                .arg(Arg::new("amount").required(true).help("Amount to convert, as a decimal"))
                .arg(
                    Arg::new("to")
                        .required(true)
                        .num_args(1..)
                        .help("Target currency codes"),
                ),
        )
        .subcommand(Command::new("list").about("List every rate in the current snapshot"))
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}

async fn current_snapshot(
    store: &SnapshotStore,
    refresh: bool,
) -> Result<RateSnapshot, FetchError> {
    if refresh {
        store.fetch().await?;
    }
    let snapshot = store.load_or_fetch().await?;
    store.ensure_fresh(snapshot, unix_now()).await
}

fn run_convert(snapshot: &RateSnapshot, matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let origin = matches.get_one::<String>("from").expect("required");
    let raw_amount = matches.get_one::<String>("amount").expect("required");
    let targets: Vec<&str> = matches
        .get_many::<String>("to")
        .expect("required")
        .map(String::as_str)
        .collect();

    let amount = Decimal::from_str(raw_amount)?;
    let results = convert_many(snapshot, origin, &targets, amount)?;

    println!("{amount} {origin} converts to:");
    for (code, outcome) in results {
        match outcome {
            Converted::Amount(value) => println!("  {code}: {value:.2}"),
            Converted::Unavailable => println!("  {code}: not available"),
        }
    }
    Ok(())
}

fn run_list(snapshot: &RateSnapshot) {
    let mut entries: Vec<_> = snapshot.rates.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    println!("Exchange rates for {}:", snapshot.base);
    for (code, rate) in entries {
        println!("{code}: {rate}");
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let matches = cli().get_matches();
    let store = SnapshotStore::new(
        config::rates_url(),
        config::snapshot_file(),
        config::FETCH_TIMEOUT,
    )?;

    match matches.subcommand() {
        Some(("convert", sub)) => {
            let snapshot = current_snapshot(&store, sub.get_flag("refresh")).await?;
            run_convert(&snapshot, sub)
        }
        Some(("list", sub)) => {
            let snapshot = current_snapshot(&store, sub.get_flag("refresh")).await?;
            run_list(&snapshot);
            Ok(())
        }
        _ => unreachable!("subcommand is required"),
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
