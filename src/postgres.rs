//! Postgres backend over a borrowed `tokio_postgres::Client`.

pub mod connection;
pub mod query;

pub use connection::PostgresConnection;
pub use query::{build_result_set_from_statement, postgres_extract_value};
