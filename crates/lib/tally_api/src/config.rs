//! API server configuration.

/// Configuration for the API server, assembled by the binary from CLI
/// arguments and environment variables.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// JWT signing secret. Read once at startup, never mutated.
    pub jwt_secret: String,
    /// Token validity window in seconds.
    pub token_validity_secs: i64,
}
