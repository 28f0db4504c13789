use crate::core::overlay::OverlayKind;
use crate::export::ExportFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line interface definition for labtally
/// CLI application to track computer-lab workstation usage with SQLite
#[derive(Parser)]
#[command(
    name = "labtally",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track computer-lab workstation sessions and application usage using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Session window shared by the reporting commands.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Location slug (default location when omitted, where one is needed)
    #[arg(long = "location")]
    pub location: Option<String>,

    /// Sessions starting on or after this date (YYYY-MM-DD)
    #[arg(long = "from")]
    pub from: Option<String>,

    /// Sessions ending on or before this date (YYYY-MM-DD)
    #[arg(long = "to")]
    pub to: Option<String>,

    /// Sessions starting at or after this time of day (HH:MM)
    #[arg(long = "after")]
    pub after: Option<String>,

    /// Sessions ending at or before this time of day (HH:MM)
    #[arg(long = "before")]
    pub before: Option<String>,

    /// ISO weekday of the session start, 1=Monday .. 7=Sunday (repeatable)
    #[arg(long = "weekday")]
    pub weekday: Vec<u32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Add missing keys to the configuration file")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal operations log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "op", help = "Only rows of this operation (start, end, add, ...)")]
        op: Option<String>,

        #[arg(long = "last", help = "Only the most recent N rows")]
        last: Option<usize>,
    },

    /// Manage locations
    Location {
        #[command(subcommand)]
        action: LocationCmd,
    },

    /// Manage workstations and their network cards
    Workstation {
        #[command(subcommand)]
        action: WorkstationCmd,
    },

    /// Arrange workstations into the location's grid
    Layout {
        #[command(subcommand)]
        action: LayoutCmd,
    },

    /// Manage canonical applications and their reported names
    App {
        #[command(subcommand)]
        action: AppCmd,
    },

    /// Open, close and list sessions
    Session {
        #[command(subcommand)]
        action: SessionCmd,
    },

    /// Current usage of a location's workstations (JSON)
    Usage {
        #[arg(long = "location")]
        location: Option<String>,
    },

    /// Name and occupancy of a location (JSON)
    Info {
        #[arg(long = "location")]
        location: Option<String>,
    },

    /// Number of sessions at a location (JSON)
    Activity {
        #[arg(long = "location")]
        location: Option<String>,

        #[arg(long = "start", help = "ISO 8601 lower bound (compared by date)")]
        start: Option<String>,

        #[arg(long = "end", help = "ISO 8601 upper bound (compared by date)")]
        end: Option<String>,
    },

    /// Usage totals per application
    Apps {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long = "json", help = "Print JSON instead of a table")]
        json: bool,
    },

    /// Export sessions
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum LocationCmd {
    /// Create a location
    Add {
        name: String,

        #[arg(long = "opens", help = "Earliest opening time (HH:MM)")]
        opens: Option<String>,

        #[arg(long = "closes", help = "Latest closing time (HH:MM)")]
        closes: Option<String>,

        #[arg(long = "tz", help = "IANA time zone, e.g. Europe/Rome")]
        tz: Option<String>,
    },

    /// List locations
    List,

    /// Show the default location, or make SLUG the default
    Default { slug: Option<String> },
}

#[derive(Subcommand)]
pub enum WorkstationCmd {
    /// Add a workstation to a location
    Add {
        name: String,

        #[arg(long = "location")]
        location: Option<String>,

        /// MAC address, optionally followed by `=ethernet|wireless|other` (repeatable)
        #[arg(long = "mac")]
        mac: Vec<String>,

        #[arg(long = "no-track", help = "Register without tracking usage")]
        no_track: bool,
    },

    /// List the workstations of a location
    List {
        #[arg(long = "location")]
        location: Option<String>,

        #[arg(long = "all", help = "Include untracked workstations")]
        all: bool,
    },
}

#[derive(Subcommand)]
pub enum LayoutCmd {
    /// Append a row to the layout
    AddRow {
        #[arg(long = "location")]
        location: Option<String>,
    },

    /// Append a cell to a row (a spacer without --workstation)
    AddCell {
        #[arg(long = "location")]
        location: Option<String>,

        #[arg(long = "row", help = "Row number, starting at 1")]
        row: u32,

        #[arg(long = "workstation")]
        workstation: Option<String>,
    },

    /// Print the layout, optionally with an overlay
    Show {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long = "overlay", value_enum)]
        overlay: Option<OverlayArg>,

        #[arg(long = "json", help = "Print JSON instead of a grid")]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OverlayArg {
    Sessions,
    Time,
}

impl From<OverlayArg> for OverlayKind {
    fn from(value: OverlayArg) -> Self {
        match value {
            OverlayArg::Sessions => OverlayKind::Sessions,
            OverlayArg::Time => OverlayKind::Time,
        }
    }
}

#[derive(Subcommand)]
pub enum AppCmd {
    /// Map reported names onto a canonical application
    Add {
        name: String,

        #[arg(long = "location")]
        location: Option<String>,

        #[arg(long = "reported", help = "Name as reported by clients (repeatable)")]
        reported: Vec<String>,
    },

    /// List applications with their reported names
    List {
        #[arg(long = "location")]
        location: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SessionCmd {
    /// Open a session for the workstation owning MAC
    Start {
        #[arg(long = "mac")]
        mac: String,

        #[arg(long = "os")]
        os: String,

        #[arg(long = "os-version")]
        os_version: Option<String>,

        #[arg(long = "user")]
        user: Option<String>,
    },

    /// Close the open session of the workstation owning MAC
    End {
        #[arg(long = "mac")]
        mac: String,

        /// Comma-separated `name#start#end` tokens
        #[arg(long = "apps", default_value = "")]
        apps: String,

        /// Seconds added to the end time (negative trims idle time)
        #[arg(long = "offset", default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,
    },

    /// List sessions
    List {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long = "open", help = "Only sessions still open")]
        open: bool,
    },
}
