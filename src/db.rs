use std::fmt;

use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::Connection;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Parameters needed to reach the store. TLS is always disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub host: String,
    pub port: u16,
    pub user: String,
    password: Option<String>,
    pub dbname: String,
}

impl ConnectionDescriptor {
    /// An empty password is dropped entirely rather than sent as an empty
    /// credential, so the server (or `PGPASSWORD`/pgpass) decides how to
    /// authenticate.
    pub fn new(host: &str, port: u16, user: &str, password: &str, dbname: &str) -> Self {
        Self {
            host: host.to_string(),
            port,
            user: user.to_string(),
            password: (!password.is_empty()).then(|| password.to_string()),
            dbname: dbname.to_string(),
        }
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        let opts = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.dbname)
            .ssl_mode(PgSslMode::Disable);
        match &self.password {
            Some(password) => opts.password(password),
            None => opts,
        }
    }
}

/// libpq keyword/value form with the password masked; safe to log.
impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host={} port={} user={}", self.host, self.port, self.user)?;
        if self.password.is_some() {
            f.write_str(" password=***")?;
        }
        write!(f, " dbname={} sslmode=disable", self.dbname)
    }
}

/// Owns the single live connection for the life of the process.
pub struct Database {
    conn: PgConnection,
}

impl Database {
    /// Open and ping. Either failing is a connection error; nothing is retried.
    pub async fn connect(descriptor: &ConnectionDescriptor) -> Result<Self> {
        info!(connection = %descriptor, "connecting to database");
        Self::connect_with(&descriptor.connect_options()).await
    }

    pub async fn connect_with(options: &PgConnectOptions) -> Result<Self> {
        let mut conn = PgConnection::connect_with(options)
            .await
            .map_err(Error::Connection)?;
        conn.ping().await.map_err(Error::Connection)?;
        println!("Successfully connected to PostgreSQL!");
        Ok(Self { conn })
    }

    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(Error::op("close connection"))?;
        debug!("connection closed");
        Ok(())
    }
}
