use std::ffi::OsString;

use clap::{Args, CommandFactory, Parser};

use crate::db::ConnectionDescriptor;
use crate::error::{Error, Result};

/// Command-line surface. Every connection parameter falls back to a `DB_*`
/// environment variable (a `.env` file is loaded into the environment first),
/// then to a built-in default.
#[derive(Debug, Clone, Parser)]
#[command(name = "pgcrud", version, about = "Run canned CRUD operations against a PostgreSQL users table")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub operations: Operations,
}

/// Rewrite Go `flag`-style single-dash long options (`-recreate`,
/// `-port=6543`) to `--recreate` / `--port=6543`. Anything that is not a known
/// long option, such as `-h` or a negative value, passes through unchanged.
pub fn go_style_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Cli::command();
    let longs: Vec<&str> = command
        .get_arguments()
        .filter_map(|arg| arg.get_long())
        .chain(["help", "version"])
        .collect();

    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if name.len() > 1 && longs.contains(&name) {
                        OsString::from(format!("-{text}"))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// pg host
    #[arg(long, env = "DB_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// pg port
    #[arg(long, env = "DB_PORT", default_value = "5432")]
    pub port: String,

    /// login user
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub user: String,

    /// login password; omitted from the connection when empty
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// login database
    #[arg(long, env = "DB_NAME", default_value = "postgres")]
    pub dbname: String,
}

impl ConnectionArgs {
    pub fn descriptor(&self) -> Result<ConnectionDescriptor> {
        let port = self
            .port
            .trim()
            .parse::<u16>()
            .map_err(|e| Error::Config(format!("port {:?}: {e}", self.port)))?;
        Ok(ConnectionDescriptor::new(
            &self.host,
            port,
            &self.user,
            &self.password,
            &self.dbname,
        ))
    }
}

/// Independent switches; any combination may be set in one run.
#[derive(Debug, Clone, Default, Args)]
pub struct Operations {
    /// drop and recreate the users table
    #[arg(long)]
    pub recreate: bool,

    /// delete all rows
    #[arg(long)]
    pub delall: bool,

    /// delete one row
    #[arg(long)]
    pub delone: bool,

    /// insert one row with a random name
    #[arg(long)]
    pub insertone: bool,

    /// select one row
    #[arg(long)]
    pub selectone: bool,

    /// select all rows
    #[arg(long)]
    pub selectall: bool,

    /// update one row with a random name
    #[arg(long)]
    pub updateone: bool,

    /// insert one row inside a transaction
    #[arg(long)]
    pub usetrans: bool,

    /// insert three rows inside one transaction
    #[arg(long)]
    pub usetwophase: bool,

    /// keep the connection idle for --hold-secs after connecting
    #[arg(long)]
    pub holdconn: bool,

    /// seconds to hold the idle connection
    #[arg(long, env = "DB_HOLD_SECS", default_value_t = 20)]
    pub hold_secs: u64,

    /// row id for --selectone, --updateone and --delone (random 1..=10 if unset)
    #[arg(long)]
    pub id: Option<i32>,

    /// print selected rows as JSON lines
    #[arg(long)]
    pub json: bool,
}
