use clap::{Parser, Subcommand, ValueEnum};
use carrot_core::Tab;

#[derive(Parser)]
#[command(name = "carrot")]
#[command(about = "CarrotQuant data dashboard", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API prefix
    #[arg(long, env = "CARROT_API_BASE_URL")]
    pub api_url: Option<String>,

    /// Poll interval in seconds
    #[arg(long, env = "CARROT_POLL_INTERVAL_SECS")]
    pub interval: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show registered tables and whether data is stored for them
    Audit,

    /// List download tasks, most recently updated first
    Tasks,

    /// Show a single task
    Status {
        /// Task ID
        task_id: String,
    },

    /// Start a download task with optional symbol and month filters
    Download {
        /// Table name from the registry
        table: String,

        /// Comma-separated symbols (empty = all)
        #[arg(long, default_value = "")]
        symbols: String,

        /// Comma-separated months, e.g. "202501, 202502" (empty = default)
        #[arg(long, default_value = "")]
        months: String,
    },

    /// Start a download task for a whole table
    Quick {
        /// Table name from the registry
        table: String,

        /// Comma-separated months (empty = default)
        #[arg(long, default_value = "")]
        months: String,
    },

    /// Stop a running task
    Stop {
        /// Task ID
        task_id: String,
    },

    /// Check backend health
    Health,

    /// Poll and re-print the dashboard until Ctrl-C
    Watch {
        /// Section to watch
        #[arg(long, value_enum, default_value = "tasks")]
        tab: TabArg,
    },

    /// Serve the web dashboard
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TabArg {
    Audit,
    Tasks,
}

impl From<TabArg> for Tab {
    fn from(arg: TabArg) -> Self {
        match arg {
            TabArg::Audit => Tab::Audit,
            TabArg::Tasks => Tab::Tasks,
        }
    }
}
