use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "jejak")]
#[command(about = "Expedition bookings for Jejak Langkah from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a new booking
    #[command(alias = "new")]
    Register {
        /// Participant full name (as on the identity card)
        #[arg(long)]
        name: String,
        /// WhatsApp number
        #[arg(long)]
        whatsapp: String,
        /// Contact email
        #[arg(long, default_value = "")]
        email: String,
        /// Logistics shipping address
        #[arg(long, default_value = "")]
        address: String,
        /// Destination mountain
        #[arg(long)]
        mountain: String,
        /// Service category
        #[arg(long, default_value = "OPEN TRIP")]
        category: String,
        /// Trip package
        #[arg(long, default_value = "REGULER")]
        package: String,
        /// Expedition start date (YYYY-MM-DD, defaults to today)
        #[arg(long, value_name = "DATE")]
        start_date: Option<String>,
        /// Destination-specific permit code
        #[arg(long, value_name = "CODE")]
        climber_code: Option<String>,
        /// Path to an identity image (JPG/PNG), embedded as a data URL
        #[arg(long, value_name = "PATH")]
        identity: Option<PathBuf>,
    },
    /// Look up a booking by id, id suffix, or WhatsApp number
    Ticket {
        /// Booking id or WhatsApp number
        query: String,
    },
    /// List local registrations
    List {
        /// Number of registrations to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search the merged remote + local view
    Search {
        /// Search query (matched against name, phone, email, destination)
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a booking's verification status
    Status {
        #[command(subcommand)]
        command: StatusCommands,
    },
    /// Fetch the remote record set once and show the merged view
    Sync,
    /// Poll the remote record set until interrupted, reporting arrivals
    Watch {
        /// Polling period in seconds
        #[arg(
            long,
            value_name = "SECS",
            default_value_t = jejak_core::reconciler::POLL_INTERVAL.as_secs()
        )]
        interval: u64,
    },
    /// Export the merged, unfiltered view
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Optional output path (a suggested file name when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Write to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },
    /// Show or update operator settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum StatusCommands {
    /// Set a booking to an explicit status (Pending, Verified, Canceled)
    Set {
        /// Booking id
        id: String,
        /// New status
        status: String,
    },
    /// Toggle a booking between Verified and Pending
    Toggle {
        /// Booking id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current settings
    Show,
    /// Update settings; omitted flags keep their current values
    Set {
        /// Apps Script endpoint fronting the spreadsheet
        #[arg(long, value_name = "URL")]
        script_url: Option<String>,
        /// Target spreadsheet identifier
        #[arg(long, value_name = "ID")]
        spreadsheet_id: Option<String>,
        /// Official WhatsApp contact
        #[arg(long, value_name = "PHONE")]
        admin_phone: Option<String>,
        /// Official email contact
        #[arg(long, value_name = "EMAIL")]
        admin_email: Option<String>,
        /// Clear the sync endpoint (disables polling)
        #[arg(long, conflicts_with_all = ["script_url", "spreadsheet_id"])]
        clear_endpoint: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
