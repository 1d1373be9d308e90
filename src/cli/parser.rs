use crate::export::ExportFormat;
use crate::models::service_event::ServiceKind;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface for the fleet maintenance control ledger
#[derive(Parser)]
#[command(
    name = "fleetledger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Weekly odometer control, maintenance alerts and shop visits for a rental fleet (SQLite)",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db", conflicts_with = "tenant")]
    pub db: Option<String>,

    /// Use the database of a named tenant inside `tenants_dir`
    #[arg(global = true, long = "tenant")]
    pub tenant: Option<String>,

    /// Operator name written to the audit log
    #[arg(global = true, long = "operator")]
    pub operator: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ServiceAction {
    /// Book a visit (needs --kind)
    Schedule,
    /// The vehicle enters the shop for its booked visit
    Enter,
    /// The vehicle leaves the shop (use --serviced for the work done)
    Exit,
    /// Emergency visit outside the schedule (needs --kind)
    Unplanned,
    /// List every visit of the vehicle
    List,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing configuration fields with defaults")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
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

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "filter", help = "Only rows matching this regular expression")]
        filter: Option<String>,
    },

    /// Load a scheduling-grid snapshot (JSON: vehicles and weeks with lines)
    Import {
        #[arg(long = "file", help = "Snapshot file to import")]
        file: String,
    },

    /// List grid weeks with their control status
    Weeks {
        #[arg(long = "next", help = "Only show the next week to sync")]
        next: bool,

        #[arg(long = "json", help = "Print as JSON")]
        json: bool,
    },

    /// Create the control records of a week from the grid (idempotent)
    Sync {
        #[arg(long = "week", conflicts_with = "next", required_unless_present = "next")]
        week: Option<i64>,

        #[arg(long = "next", help = "Sync the earliest week without records")]
        next: bool,
    },

    /// Show one week's control grid with alerts
    Grid {
        #[arg(long = "week")]
        week: i64,

        #[arg(long = "json", help = "Print as JSON")]
        json: bool,
    },

    /// Close a week: its records become read-only
    Close {
        #[arg(long = "week")]
        week: i64,
    },

    /// Delete the most recent week's records, readings and service events
    Delete {
        #[arg(long = "week")]
        week: i64,

        #[arg(long = "yes", help = "Confirm the deletion")]
        yes: bool,
    },

    /// Show or update a vehicle's maintenance configuration
    Maint {
        #[arg(long = "vehicle")]
        vehicle: i64,

        #[arg(long = "oil-interval")]
        oil_interval: Option<i64>,

        #[arg(long = "last-oil")]
        last_oil: Option<i64>,

        #[arg(long = "belt", help = "Whether the vehicle has a timing belt")]
        has_belt: Option<bool>,

        #[arg(long = "belt-interval")]
        belt_interval: Option<i64>,

        #[arg(long = "last-belt")]
        last_belt: Option<i64>,

        #[arg(long = "allowance", help = "Weekly km allowance")]
        allowance: Option<i64>,
    },

    /// Register a weekly odometer reading
    Km {
        #[arg(long = "week")]
        week: i64,

        #[arg(long = "vehicle")]
        vehicle: i64,

        #[arg(long = "km", allow_negative_numbers = true)]
        km: i64,

        #[arg(long = "expect-version", help = "Fail if the record changed since this version")]
        expect_version: Option<i64>,
    },

    /// Shop visit lifecycle
    Service {
        #[arg(value_enum)]
        action: ServiceAction,

        #[arg(long = "vehicle")]
        vehicle: i64,

        #[arg(long = "week", required_if_eq_any = [
            ("action", "schedule"), ("action", "enter"), ("action", "exit"), ("action", "unplanned")
        ])]
        week: Option<i64>,

        #[arg(long = "kind", value_enum, required_if_eq_any = [
            ("action", "schedule"), ("action", "unplanned")
        ])]
        kind: Option<ServiceKind>,

        #[arg(long = "serviced", value_enum, value_delimiter = ',')]
        serviced: Vec<ServiceKind>,

        #[arg(long = "expect-version", help = "Fail if the record changed since this version")]
        expect_version: Option<i64>,
    },

    /// Odometer readings recorded for a vehicle
    History {
        #[arg(long = "vehicle")]
        vehicle: i64,
    },

    /// Copy the database to a backup file
    Backup {
        #[arg(long = "file", help = "Destination file")]
        file: String,

        #[arg(long = "compress", help = "Zip the backup")]
        compress: bool,

        #[arg(long = "force", help = "Overwrite an existing file")]
        force: bool,
    },

    /// Export control records
    Export {
        #[arg(long = "format", value_enum)]
        format: ExportFormat,

        #[arg(long = "file", help = "Absolute output path")]
        file: String,

        #[arg(long = "range", help = "Week ids: N, N:M or all")]
        range: Option<String>,

        #[arg(long = "force", help = "Overwrite an existing file")]
        force: bool,
    },
}
