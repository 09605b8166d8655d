use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Opening or pinging the connection failed.
    #[error("failed to connect to database")]
    Connection(#[source] sqlx::Error),

    /// A single statement or transaction step failed.
    #[error("failed to {op}")]
    Operation {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("user {0} not found")]
    NotFound(i32),

    #[error("failed to encode record")]
    Encode(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Adapter for `map_err` that tags a sqlx error with the failed operation.
    pub fn op(op: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Error::Operation { op, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn operation_error_names_the_operation_and_keeps_source() {
        let err = Error::op("create user")(sqlx::Error::RowNotFound);
        assert_eq!(err.to_string(), "failed to create user");
        assert!(err.source().is_some());
    }

    #[test]
    fn not_found_mentions_id() {
        assert_eq!(Error::NotFound(7).to_string(), "user 7 not found");
    }

    #[test]
    fn connection_error_has_source() {
        let err = Error::Connection(sqlx::Error::PoolClosed);
        assert!(err.source().is_some());
    }
}
