mod config;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;

use recall_contacts::{AddressBookDb, ContactDirectory};
use recall_core::{DEFAULT_DIRECTION_LIMIT, DEFAULT_RECENT_LIMIT, MessageReconstructor};
use recall_db::{Archive, expand_home};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "recall", version, about = "Read messages from the local chat archive as JSON")]
struct Cli {
    /// Archive to read (overrides RECALL_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// AddressBook store for name resolution (overrides RECALL_CONTACTS_DB)
    #[arg(long, global = true)]
    contacts: Option<PathBuf>,

    /// Skip name resolution even if a contacts store is configured
    #[arg(long, global = true)]
    no_contacts: bool,

    /// Indent JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Most recent messages
    Recent {
        #[arg(short = 'n', long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: u32,
        /// Return every message, ignoring --limit
        #[arg(long)]
        all: bool,
    },
    /// One message by row id
    Get { id: i64 },
    /// Conversation with one sender (exact handle id)
    Sender { phone: String },
    /// Messages in one group room
    Room { room: String },
    /// Messages received
    Inbound {
        #[arg(short = 'n', long, default_value_t = DEFAULT_DIRECTION_LIMIT)]
        limit: u32,
    },
    /// Messages sent
    Outbound {
        #[arg(short = 'n', long, default_value_t = DEFAULT_DIRECTION_LIMIT)]
        limit: u32,
    },
    /// Group room names seen on messages
    Rooms,
    /// Room name to display name mapping
    Chats,
}

fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries JSON only
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "recall=info,recall_core=info,recall_contacts=info,recall_db=info".into()
            }),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let db_path = cli.db.clone().unwrap_or(config.db_path.clone());
    let archive = Archive::open(&db_path)?;

    let contacts = if cli.no_contacts {
        None
    } else {
        match cli.contacts.clone().or(config.contacts_db.clone()) {
            Some(path) => {
                let path = expand_home(&path);
                info!("Resolving names from {}", path.display());
                let ttl = config.contacts_ttl()?;
                Some(ContactDirectory::with_ttl(AddressBookDb::new(path), ttl)?)
            }
            None => None,
        }
    };

    let recall = MessageReconstructor::new(archive, contacts);

    let output: Value = match cli.command {
        Command::Recent { limit, all } => {
            serde_json::to_value(recall.list_recent((!all).then_some(limit))?)?
        }
        Command::Get { id } => serde_json::to_value(recall.get_by_id(id)?)?,
        Command::Sender { phone } => serde_json::to_value(recall.list_by_sender(&phone)?)?,
        Command::Room { room } => serde_json::to_value(recall.list_by_room(&room)?)?,
        Command::Inbound { limit } => serde_json::to_value(recall.list_inbound(limit)?)?,
        Command::Outbound { limit } => serde_json::to_value(recall.list_outbound(limit)?)?,
        Command::Rooms => serde_json::to_value(recall.group_room_names()?)?,
        Command::Chats => serde_json::to_value(recall.chat_mapping()?)?,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.pretty {
        serde_json::to_writer_pretty(&mut out, &output)?;
    } else {
        serde_json::to_writer(&mut out, &output)?;
    }
    writeln!(out)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::parse_from(["recall", "--pretty", "recent", "-n", "5"]);
        assert!(cli.pretty);
        assert!(matches!(cli.command, Command::Recent { limit: 5, all: false }));

        let cli = Cli::parse_from(["recall", "inbound"]);
        assert!(matches!(cli.command, Command::Inbound { limit } if limit == DEFAULT_DIRECTION_LIMIT));

        let cli = Cli::parse_from(["recall", "get", "42", "--db", "/tmp/chat.db"]);
        assert!(matches!(cli.command, Command::Get { id: 42 }));
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/chat.db")));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
