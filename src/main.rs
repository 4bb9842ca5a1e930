use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use validator::Validate;

use twin_client::config::Settings;
use twin_client::core::{render_item, Resource, Suggestion, ViewState};
use twin_client::{HttpTwinApi, PreferenceController, SaveOutcome};

const HELP: &str = "\
commands:
  list              show the whole roster
  search <text>     filter the roster by name
  pick <n>          choose result <n> from the last list/search
  clear             clear the selection (same as emptying the search box)
  save              store the selection on the server
  status            show current and pending preference
  retry             reload whatever failed to load
  quit";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }

    if let Err(e) = settings.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    info!("Connecting to TWIN at {}", settings.api.base_url);

    let api = Arc::new(HttpTwinApi::from_settings(&settings.api)?);
    let controller = PreferenceController::new(api);

    spawn_status_watcher(&controller);

    let report = controller.load().await;
    if !report.is_complete() {
        println!("could not load: {:?} (type `retry`)", report.failed);
    }
    print_status(&controller.snapshot());
    println!("{}", HELP);

    let mut results: Vec<Suggestion> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "list" | "search" => {
                let suggestions = controller.suggestions();
                results = suggestions.filter(arg).into_iter().cloned().collect();
                print_results(&results);
            }
            "pick" => match arg.trim().parse::<usize>() {
                Ok(n) if n >= 1 && n <= results.len() => {
                    controller.on_item_chosen(&results[n - 1]);
                    print_status(&controller.snapshot());
                }
                _ => println!("pick a number between 1 and {}", results.len()),
            },
            "clear" => {
                controller.on_input_changed("");
                print_status(&controller.snapshot());
            }
            "save" => match controller.save().await {
                Ok(SaveOutcome::Saved(_)) => print_status(&controller.snapshot()),
                Ok(SaveOutcome::Unchanged) => println!("nothing to save"),
                Ok(SaveOutcome::InFlight) => println!("a save is already running"),
                Err(e) => println!("save failed: {}", e),
            },
            "status" => print_status(&controller.snapshot()),
            "retry" => {
                let report = controller.retry_failed().await;
                if report.is_complete() {
                    print_status(&controller.snapshot());
                } else {
                    println!("still failing: {:?}", report.failed);
                }
            }
            #[cfg(feature = "debug-quickswitch")]
            "debug" => debug_switch(&settings, &controller, arg).await,
            "quit" | "exit" => break,
            _ => println!("{}", HELP),
        }
    }

    info!("Bye");
    Ok(())
}

/// Log every state change at debug level
fn spawn_status_watcher(controller: &PreferenceController) {
    let mut rx = controller.subscribe();

    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update();
            tracing::debug!(
                saving = state.is_saving(),
                dirty = state.is_dirty(),
                ready = state.is_ready(),
                "State changed"
            );
        }
    });
}

fn print_results(results: &[Suggestion]) {
    if results.is_empty() {
        println!("no students found");
        return;
    }

    for (i, suggestion) in results.iter().enumerate() {
        let item = render_item(suggestion);
        match item.class {
            Some(class) => println!("{:>3}. {} [{}]", i + 1, item.label, class),
            None => println!("{:>3}. {}", i + 1, item.label),
        }
    }
}

fn print_status(state: &ViewState) {
    if let Some(user) = state.user() {
        println!("logged in as {}", user.username);
    }

    match state.preference_resource() {
        Resource::Loading => println!("preference: loading..."),
        Resource::Failed(e) => println!("preference: failed to load ({})", e),
        Resource::Loaded(None) => println!("preference: none"),
        Resource::Loaded(Some(p)) => println!("preference: {} ({})", p.name, p.student_number),
    }

    if state.is_dirty() {
        match state.pending() {
            Some(p) => println!("selected:   {} ({}) - not saved", p.name, p.student_number),
            None => println!("selected:   none - not saved"),
        }
    }

    if state.is_saving() {
        println!("saving...");
    }

    if let Some(e) = state.last_error() {
        println!("last save failed: {}", e);
    }
}

#[cfg(feature = "debug-quickswitch")]
async fn debug_switch(settings: &Settings, controller: &PreferenceController, arg: &str) {
    use twin_client::debug::{DebugSwitcher, QuickSwitchKey};

    let Ok(number) = arg.trim().parse::<u32>() else {
        println!("usage: debug <student_number>");
        return;
    };

    let target = controller
        .snapshot()
        .roster()
        .iter()
        .find(|s| s.student_number == number)
        .cloned();

    let mut switcher = DebugSwitcher::new(settings.api.base_url.clone());
    let Some(url) = switcher.set_target(target) else {
        println!("student {} is not in the roster", number);
        return;
    };
    println!("quick-switch: {}", url);

    match HttpTwinApi::from_settings(&settings.api) {
        Ok(api) => match api.quickswitch(&QuickSwitchKey::StudentNumber(number)).await {
            Ok(landed) => println!("switched, landed on {}", landed),
            Err(e) => println!("quick-switch failed: {}", e),
        },
        Err(e) => println!("quick-switch failed: {}", e),
    }
}
