//! User cache CLI
//!
//! Command-line tools for inspecting and driving a file-backed user cache.
//!
//! # Commands
//!
//! - `put-document` - Store a document for a user (server → phone)
//! - `push-message` - Append a message as the phone would
//! - `get-messages` - Claim and print a user's messages
//! - `clear` - Delete processed messages in a time window
//! - `users` - List every user with cached entries
//! - `pending` - List users with outstanding messages
//! - `geocode` / `reverse-geocode` - Query Nominatim

mod commands;

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use usercache_core::{MessageKind, TenantId, TimeField};

/// User cache command-line tools.
#[derive(Parser)]
#[command(name = "usercache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store directory
    #[arg(global = true, short, long, env = "USERCACHE_STORE")]
    store: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Time window arguments shared by reads and cleanup.
#[derive(clap::Args, Debug)]
struct WindowArgs {
    /// Timestamp the window applies to (write_ts, read_ts)
    #[arg(long, default_value = "write_ts")]
    field: TimeField,

    /// Inclusive lower bound, seconds since the epoch
    #[arg(long)]
    start: Option<f64>,

    /// Exclusive upper bound, seconds since the epoch
    #[arg(long)]
    end: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a document for a user, replacing any previous value
    PutDocument {
        /// User UUID
        user: TenantId,
        /// Document key
        key: String,
        /// Document value as JSON
        value: String,
    },

    /// Append a message-class entry for a user
    PushMessage {
        /// User UUID
        user: TenantId,
        /// Message key
        key: String,
        /// Payload as JSON
        data: String,
        /// Record type (message, sensor-data, rw-document)
        #[arg(short, long, default_value = "message")]
        kind: MessageKind,
        /// Plugin tag
        #[arg(short, long)]
        plugin: Option<String>,
    },

    /// Claim and print a user's messages
    GetMessages {
        /// User UUID
        user: TenantId,
        /// Restrict to these keys (repeatable)
        #[arg(short, long = "key")]
        keys: Vec<String>,
        #[command(flatten)]
        window: WindowArgs,
        /// Mark then fetch in two store calls
        #[arg(long)]
        two_phase: bool,
    },

    /// Delete processed messages in a time window
    Clear {
        /// User UUID
        user: TenantId,
        /// Restrict to these keys (repeatable)
        #[arg(short, long = "key")]
        keys: Vec<String>,
        #[command(flatten)]
        window: WindowArgs,
    },

    /// List every user with cached entries
    Users,

    /// List users with outstanding messages
    Pending,

    /// Resolve an address to coordinates
    Geocode {
        /// Free-form address
        address: String,
        /// Nominatim base URL
        #[arg(long, env = "NOMINATIM_QUERY_URL")]
        nominatim_url: Option<String>,
    },

    /// Resolve coordinates to an address
    ReverseGeocode {
        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        /// Nominatim base URL
        #[arg(long, env = "NOMINATIM_QUERY_URL")]
        nominatim_url: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = cli.store.as_deref();
    match cli.command {
        Commands::PutDocument { user, key, value } => {
            let path = require_store(store, "put-document")?;
            emit(&commands::document::put(path, user, &key, &value)?)?;
        }
        Commands::PushMessage {
            user,
            key,
            data,
            kind,
            plugin,
        } => {
            let path = require_store(store, "push-message")?;
            emit(&commands::messages::push(
                path,
                user,
                kind,
                &key,
                &data,
                plugin.as_deref(),
            )?)?;
        }
        Commands::GetMessages {
            user,
            keys,
            window,
            two_phase,
        } => {
            let path = require_store(store, "get-messages")?;
            let window = commands::messages::window(window.field, window.start, window.end)?;
            emit(&commands::messages::get(
                path,
                user,
                &keys,
                window.as_ref(),
                two_phase,
            )?)?;
        }
        Commands::Clear { user, keys, window } => {
            let path = require_store(store, "clear")?;
            let window = commands::messages::window(window.field, window.start, window.end)?
                .ok_or("--end is required for clear")?;
            emit(&commands::messages::clear(path, user, &keys, &window)?)?;
        }
        Commands::Users => {
            let path = require_store(store, "users")?;
            emit(&commands::tenants::users(path)?)?;
        }
        Commands::Pending => {
            let path = require_store(store, "pending")?;
            emit(&commands::tenants::pending(path)?)?;
        }
        Commands::Geocode {
            address,
            nominatim_url,
        } => {
            emit(&commands::geocode::forward(
                nominatim_url.as_deref(),
                &address,
            )?)?;
        }
        Commands::ReverseGeocode {
            lat,
            lon,
            nominatim_url,
        } => {
            emit(&commands::geocode::reverse(
                nominatim_url.as_deref(),
                lat,
                lon,
            )?)?;
        }
        Commands::Version => {
            println!("usercache CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn require_store<'a>(
    store: Option<&'a Path>,
    command: &str,
) -> Result<&'a Path, Box<dyn std::error::Error>> {
    store.ok_or_else(|| format!("Store path required for {command}").into())
}

fn emit<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
