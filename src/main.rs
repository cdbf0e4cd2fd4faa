use async_trait::async_trait;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medtrack_api_client::HttpInventoryApi;
use medtrack_core::{
    CoreConfig, Dashboard, DashboardStats, IntakeController, IntakeError, IntakeState, Notice,
    RecognitionError, SpeechInput, SpeechRecogniser, SuggestionOutcome, UnavailableRecogniser,
};

type SharedLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

const HELP: &str = "\
Commands:
  stats | stock | forecast | buy | history | medicines
  restock <medicine> <quantity>    add stock in ml
  listen                           capture one spoken line (typed on stdin)
  <n> | keep | dismiss             answer an open \"did you mean\" list
  draft <text>                     type the usage line instead
  log [text]                       submit the usage line
  clear                            empty the usage line
  help | quit";

/// Speech source that reads one line from the console per capture.
///
/// Stands in for a microphone on hosts without a speech engine.
struct ConsoleRecogniser {
    lines: SharedLines,
}

#[async_trait]
impl SpeechRecogniser for ConsoleRecogniser {
    fn is_available(&self) -> bool {
        true
    }

    async fn recognise(&self) -> Result<String, RecognitionError> {
        prompt("(speak) > ");
        match self.lines.lock().await.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => Err(RecognitionError::NoSpeech),
            Ok(Some(line)) => Ok(line),
            Ok(None) => Err(RecognitionError::Engine("aborted".into())),
            Err(e) => Err(RecognitionError::Engine(e.to_string())),
        }
    }
}

fn prompt(text: &str) {
    print!("{text}");
    std::io::stdout().flush().ok();
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        println!("{notice}");
    }
}

fn print_stats(stats: &DashboardStats) {
    println!(
        "Total: {}  Critical: {}  Low: {}  Good: {}",
        stats.total_medicines, stats.critical_stock, stats.low_stock, stats.good_stock
    );
}

fn print_rows<T: std::fmt::Display>(rows: &[T], empty: &str) {
    if rows.is_empty() {
        println!("{empty}");
    }
    for row in rows {
        println!("{row}");
    }
}

/// Split `restock` arguments: the last word is the quantity, the rest the medicine name.
fn split_restock_args(args: &str) -> (&str, &str) {
    let args = args.trim();
    match args.rsplit_once(char::is_whitespace) {
        Some((medicine, quantity)) => (medicine.trim(), quantity),
        None => (args, ""),
    }
}

fn report(action: &str, err: &IntakeError) {
    println!("{}", Notice::from_error(action, err));
}

fn show_choices(intake: &IntakeController) {
    let Some(session) = intake.disambiguation() else {
        return;
    };
    println!(
        "Did you mean? We heard \"{}\". Please select the correct item:",
        session.original_name()
    );
    for (i, choice) in session.choices().iter().enumerate() {
        println!("  {}. {}", i + 1, choice.label());
    }
}

/// Main entry point for the interactive dashboard console
///
/// Loads the dashboard counters, then reads commands from stdin until `quit` or end of
/// input. Every failure is printed as a notice; only configuration errors abort startup.
///
/// # Environment Variables
/// - `MEDTRACK_API_BASE_URL`: backend base URL (default: "http://localhost:5000")
/// - `MEDTRACK_RED_THRESHOLD`, `MEDTRACK_ORANGE_THRESHOLD`, `MEDTRACK_YELLOW_THRESHOLD`
/// - `MEDTRACK_SPEECH_INPUT`: "stdin" or "none"
/// - `MEDTRACK_SUGGESTION_FAILURE`: "log" or "notify"
/// - `MEDTRACK_HTTP_TIMEOUT_SECS`: per-request timeout (default: 10)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medtrack=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = CoreConfig::from_lookup(|key| std::env::var(key).ok())?;
    tracing::info!("++ Medicine Tracker console against {}", cfg.api_base_url());

    let api = HttpInventoryApi::new(&cfg)?;
    let dashboard = Dashboard::new(&api, cfg.thresholds());
    let lines: SharedLines = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let recogniser: Box<dyn SpeechRecogniser> = match cfg.speech_input() {
        SpeechInput::Console => Box::new(ConsoleRecogniser {
            lines: Arc::clone(&lines),
        }),
        SpeechInput::Disabled => Box::new(UnavailableRecogniser),
    };
    let mut intake = IntakeController::from_config(&cfg);

    match dashboard.stats().await {
        Ok(stats) => print_stats(&stats),
        Err(e) => report("fetch stats", &e),
    }
    println!("Type 'help' for commands.");

    loop {
        let line_prompt = if intake.draft().is_empty() {
            "> ".to_owned()
        } else {
            format!("[{}] > ", intake.draft())
        };
        prompt(&line_prompt);

        let line = match lines.lock().await.next_line().await? {
            Some(line) => line,
            None => break,
        };
        let line = line.trim();
        let (command, args) = line.split_once(' ').unwrap_or((line, ""));
        let args = args.trim();

        match command {
            "" => {}
            "help" => println!("{HELP}"),
            "quit" | "exit" => break,
            "stats" => match dashboard.stats().await {
                Ok(stats) => print_stats(&stats),
                Err(e) => report("fetch stats", &e),
            },
            "stock" => match dashboard.stock_cards().await {
                Ok(cards) => print_rows(&cards, "No stock data available."),
                Err(e) => report("fetch stock data", &e),
            },
            "forecast" => match dashboard.forecast().await {
                Ok(rows) => print_rows(&rows, "No forecast data available."),
                Err(e) => report("fetch forecast", &e),
            },
            "buy" => match dashboard.buy_list().await {
                Ok(rows) => print_rows(&rows, "Nothing to buy. All stock levels are good."),
                Err(e) => report("fetch buy list", &e),
            },
            "history" => match dashboard.history().await {
                Ok(rows) => print_rows(&rows, "No usage recorded yet."),
                Err(e) => report("fetch usage logs", &e),
            },
            "medicines" => match dashboard.restockable_medicines().await {
                Ok(names) => print_rows(&names, "No medicines found."),
                Err(e) => report("fetch medicines", &e),
            },
            "restock" => {
                let (medicine, quantity) = split_restock_args(args);
                match dashboard.restock(medicine, quantity).await {
                    Ok(message) => println!("{}", Notice::success("Success", message)),
                    Err(e) => report("restock", &e),
                }
            }
            "listen" => {
                let result = intake.listen(recogniser.as_ref(), &api).await;
                print_notices(intake.take_notices());
                match result {
                    Ok(SuggestionOutcome::Disambiguate) => show_choices(&intake),
                    Ok(_) => {}
                    Err(e) => tracing::debug!("listen stopped: {e}"),
                }
            }
            "keep" => {
                if let Some(last) = intake.disambiguation().map(|s| s.choice_count() - 1) {
                    choose(&mut intake, last);
                } else {
                    println!("No suggestions are open.");
                }
            }
            "dismiss" => intake.dismiss(),
            "draft" => intake.set_draft(args),
            "clear" => intake.set_draft(""),
            "log" => {
                if !args.is_empty() {
                    intake.set_draft(args);
                }
                let result = intake.submit(&api).await;
                print_notices(intake.take_notices());
                if let Ok(outcome) = result {
                    println!("{}", outcome.message);
                    if let Some(stats) = outcome.stats {
                        print_stats(&stats);
                    }
                }
            }
            n if intake.state() == &IntakeState::AwaitingDisambiguation => match n.parse::<usize>() {
                Ok(index) if index >= 1 => choose(&mut intake, index - 1),
                _ => println!("Pick a number from the list, 'keep' or 'dismiss'."),
            },
            other => println!("Unknown command '{other}'. Type 'help' for commands."),
        }
    }

    Ok(())
}

fn choose(intake: &mut IntakeController, index: usize) {
    if let Err(e) = intake.choose(index) {
        println!("{}", Notice::from_error("choose", &e));
    }
    print_notices(intake.take_notices());
}
