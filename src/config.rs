use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::domain::TodoId;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "td",
    about = "To-do list over a remote task API",
    version = crate::version::VERSION,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: Config,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Open the interactive task list (default).
    Tui,

    /// Print the task list and exit.
    List(ListArgs),

    /// Create a task for a user.
    Add(AddArgs),

    /// Flip a task between open and done.
    Toggle(ToggleArgs),

    /// Delete a task.
    Rm(RmArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Print the raw task list as JSON instead of rendered rows.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Name of the user the task belongs to, as listed by the API.
    #[arg(long, value_name = "NAME")]
    pub user: String,

    /// Task text.
    #[arg(long, value_name = "TEXT")]
    pub title: String,
}

#[derive(Args, Debug, Clone)]
pub struct ToggleArgs {
    #[arg(value_name = "ID")]
    pub id: TodoId,
}

#[derive(Args, Debug, Clone)]
pub struct RmArgs {
    #[arg(value_name = "ID")]
    pub id: TodoId,
}

#[derive(Args, Debug, Clone)]
pub struct Config {
    #[arg(
        long,
        global = true,
        env = "TD_API_BASE_URL",
        value_name = "ORIGIN",
        default_value = "https://jsonplaceholder.typicode.com"
    )]
    pub api_base_url: String,

    #[arg(
        long = "connect-timeout-secs",
        global = true,
        env = "TD_CONNECT_TIMEOUT_SECS",
        value_name = "SECS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..=60)
    )]
    pub connect_timeout_secs: u64,

    #[arg(
        long = "request-timeout-secs",
        global = true,
        env = "TD_REQUEST_TIMEOUT_SECS",
        value_name = "SECS",
        default_value_t = 15,
        value_parser = clap::value_parser!(u64).range(1..=120)
    )]
    pub request_timeout_secs: u64,

    #[arg(
        long = "probe-timeout-millis",
        global = true,
        env = "TD_PROBE_TIMEOUT_MILLIS",
        value_name = "MILLIS",
        default_value_t = 1500,
        value_parser = clap::value_parser!(u64).range(100..=10_000)
    )]
    pub probe_timeout_millis: u64,
}

impl Config {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_millis)
    }
}
