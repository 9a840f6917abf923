use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::api::ApiClient;
use crate::config::{AddArgs, Cli, Command, Config, ListArgs, RmArgs, ToggleArgs};
use crate::connectivity::ConnectivityProbe;
use crate::reporter::ErrorReporter;
use crate::sync::{CreateOutcome, DeleteOutcome, LoadOutcome, SyncController, ToggleOutcome};
use crate::tui;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

pub async fn run() -> i32 {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, None | Some(Command::Tui)));

    let controller = build_controller(&cli.config);

    let res: Result<(), ExitError> = match cli.command {
        Some(Command::List(args)) => cmd_list(controller, args).await,
        Some(Command::Add(args)) => cmd_add(controller, args).await,
        Some(Command::Toggle(args)) => cmd_toggle(controller, args).await,
        Some(Command::Rm(args)) => cmd_rm(controller, args).await,
        Some(Command::Tui) | None => tui::cmd_tui(controller).await,
    };

    match res {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", e.message);
            e.code
        }
    }
}

/// The TUI owns the screen, so logs default off there unless `RUST_LOG`
/// says otherwise. One-shot commands default to `info` on stderr.
fn init_tracing(interactive: bool) {
    let fallback = if interactive { "off" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn build_controller(config: &Config) -> SyncController {
    let api = ApiClient::new(
        config.api_base_url.clone(),
        config.connect_timeout(),
        config.request_timeout(),
    );
    let probe = ConnectivityProbe::new(config.api_base_url.clone(), config.probe_timeout());
    SyncController::new(api, probe, ErrorReporter::new())
}

async fn load_initial_or_exit(controller: &SyncController) -> Result<(), ExitError> {
    match controller.load_initial().await {
        LoadOutcome::Loaded { .. } => Ok(()),
        LoadOutcome::Failed { alert } => Err(api_exit("could not load tasks", alert)),
    }
}

fn api_exit(what: &str, alert: Option<&'static str>) -> ExitError {
    let message = match alert {
        Some(text) => format!("api_error: {what}\n{text}"),
        None => format!("api_error: {what}"),
    };
    ExitError::new(4, message)
}

async fn cmd_list(controller: SyncController, args: ListArgs) -> Result<(), ExitError> {
    load_initial_or_exit(&controller).await?;
    let snapshot = controller.snapshot();

    if args.json {
        let s = serde_json::to_string_pretty(snapshot.todos())
            .map_err(|e| ExitError::new(2, format!("invalid_args: {e}")))?;
        println!("{s}");
        return Ok(());
    }

    for todo in snapshot.todos() {
        let marker = if todo.completed { "[x]" } else { "[ ]" };
        println!(
            "{:>4} {} {} by {}",
            todo.id,
            marker,
            todo.title,
            snapshot.user_name(todo.user_id)
        );
    }
    Ok(())
}

async fn cmd_add(controller: SyncController, args: AddArgs) -> Result<(), ExitError> {
    load_initial_or_exit(&controller).await?;
    match controller.create_todo(&args.user, &args.title).await {
        CreateOutcome::Created(todo) => {
            println!("created todo {} for {}", todo.id, args.user);
            Ok(())
        }
        CreateOutcome::EmptyTitle => Err(ExitError::new(2, "invalid_args: title is empty")),
        CreateOutcome::UnknownUser => Err(ExitError::new(
            2,
            format!("invalid_args: user not found: {}", args.user),
        )),
        CreateOutcome::Failed { alert } => Err(api_exit("could not create the task", alert)),
    }
}

async fn cmd_toggle(controller: SyncController, args: ToggleArgs) -> Result<(), ExitError> {
    load_initial_or_exit(&controller).await?;
    match controller.toggle_todo(args.id).await {
        ToggleOutcome::Toggled { id, completed } => {
            println!(
                "todo {id} is now {}",
                if completed { "done" } else { "open" }
            );
            Ok(())
        }
        ToggleOutcome::SyncFailed { alert, .. } => Err(api_exit("status change not synced", alert)),
        ToggleOutcome::Offline => Err(ExitError::new(3, "offline: cannot change the task status")),
        ToggleOutcome::NotFound(id) => Err(ExitError::new(5, format!("not_found: todo {id}"))),
    }
}

async fn cmd_rm(controller: SyncController, args: RmArgs) -> Result<(), ExitError> {
    // Deletes go straight to the API; there is no local pre-check.
    match controller.delete_todo(args.id).await {
        DeleteOutcome::Deleted(id) => {
            println!("deleted todo {id}");
            Ok(())
        }
        DeleteOutcome::Offline => Err(ExitError::new(3, "offline: cannot delete the task")),
        DeleteOutcome::Failed { alert } => Err(api_exit("could not delete the task", alert)),
    }
}
