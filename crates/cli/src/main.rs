use clap::{Parser, Subcommand};
use medtrack_api_client::HttpInventoryApi;
use medtrack_core::{
    interpret, transcript, CoreConfig, Dashboard, IntakeController, IntakeError, Notice,
    SuggestionResolver,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "medtrack")]
#[command(about = "Medicine Tracker command line client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dashboard counters
    Stats,
    /// Show stock levels with severity and depletion date
    Stock,
    /// Show forecast alerts
    Forecast,
    /// Show the purchase list
    BuyList,
    /// Show usage and restock history
    History,
    /// List medicines that can be restocked
    Medicines,
    /// Parse a usage line without sending it
    Parse {
        /// Usage text, e.g. "betadine 5"
        text: Vec<String>,
    },
    /// Look up close matches for a medicine name
    Suggest {
        /// Medicine name as heard or typed
        name: String,
    },
    /// Read a forecast sentence
    Interpret {
        /// Forecast text, e.g. "needed in 3 days"
        text: Vec<String>,
    },
    /// Log usage
    Log {
        /// Usage text, e.g. "betadine 5"
        text: Vec<String>,
    },
    /// Restock a medicine
    Restock {
        /// Medicine name
        medicine: String,
        /// Quantity in ml
        quantity: String,
    },
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        if notice.is_error() {
            eprintln!("{notice}");
        } else {
            println!("{notice}");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medtrack=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'medtrack --help' for commands");
        return Ok(());
    };

    // Offline commands need no configuration.
    match &command {
        Commands::Parse { text } => {
            let candidate = transcript::parse(&text.join(" "));
            println!("name: {:?}", candidate.name);
            match candidate.quantity {
                Some(q) => println!("quantity: {q}"),
                None => println!("quantity: (none)"),
            }
            return Ok(());
        }
        Commands::Interpret { text } => {
            let reading = interpret(&text.join(" "));
            println!("{} ({:?})", reading.label, reading.tier);
            return Ok(());
        }
        _ => {}
    }

    let cfg = CoreConfig::from_lookup(|key| std::env::var(key).ok())?;
    let api = HttpInventoryApi::new(&cfg)?;
    let dashboard = Dashboard::new(&api, cfg.thresholds());

    match command {
        Commands::Stats => match dashboard.stats().await {
            Ok(stats) => {
                println!("Total medicines: {}", stats.total_medicines);
                println!("Critical stock:  {}", stats.critical_stock);
                println!("Low stock:       {}", stats.low_stock);
                println!("Good stock:      {}", stats.good_stock);
            }
            Err(e) => report("fetch stats", &e),
        },
        Commands::Stock => match dashboard.stock_cards().await {
            Ok(cards) if cards.is_empty() => println!("No stock data available."),
            Ok(cards) => cards.iter().for_each(|card| println!("{card}")),
            Err(e) => report("fetch stock data", &e),
        },
        Commands::Forecast => match dashboard.forecast().await {
            Ok(rows) if rows.is_empty() => println!("No forecast data available."),
            Ok(rows) => rows.iter().for_each(|row| println!("{row}")),
            Err(e) => report("fetch forecast", &e),
        },
        Commands::BuyList => match dashboard.buy_list().await {
            Ok(rows) if rows.is_empty() => println!("Nothing to buy. All stock levels are good."),
            Ok(rows) => rows.iter().for_each(|row| println!("{row}")),
            Err(e) => report("fetch buy list", &e),
        },
        Commands::History => match dashboard.history().await {
            Ok(rows) if rows.is_empty() => println!("No usage recorded yet."),
            Ok(rows) => rows.iter().for_each(|row| println!("{row}")),
            Err(e) => report("fetch usage logs", &e),
        },
        Commands::Medicines => match dashboard.restockable_medicines().await {
            Ok(names) => names.iter().for_each(|name| println!("{name}")),
            Err(e) => report("fetch medicines", &e),
        },
        Commands::Suggest { name } => {
            let query = transcript::parse(&name).name;
            match SuggestionResolver::new(&api).resolve(&query).await {
                Ok(items) if items.is_empty() => {
                    println!("No close matches found for \"{query}\".")
                }
                Ok(items) => items.iter().for_each(|item| println!("{}", item.name)),
                Err(e) => eprintln!("Error: {e}"),
            }
        }
        Commands::Log { text } => {
            let mut intake = IntakeController::from_config(&cfg);
            intake.set_draft(text.join(" "));
            let result = intake.submit(&api).await;
            print_notices(intake.take_notices());
            if let Ok(outcome) = result {
                println!("{}", outcome.message);
            }
        }
        Commands::Restock { medicine, quantity } => {
            match dashboard.restock(&medicine, &quantity).await {
                Ok(message) => println!("{message}"),
                Err(e) => report("restock", &e),
            }
        }
        Commands::Parse { .. } | Commands::Interpret { .. } => {}
    }

    Ok(())
}

fn report(action: &str, err: &IntakeError) {
    eprintln!("{}", Notice::from_error(action, err));
}
