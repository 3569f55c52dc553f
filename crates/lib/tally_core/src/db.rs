//! Ephemeral PostgreSQL instances for integration tests.
//!
//! Discovers server binaries via `pg_config` on PATH and drives
//! `initdb`, `pg_ctl`, and `pg_isready` as child processes. Data lives
//! in a tempdir that is removed when the instance is dropped.

use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::time::sleep;
use tracing::debug;

/// Database name created inside each ephemeral instance.
const DATABASE_NAME: &str = "tally";

/// Maximum time to wait for PostgreSQL to become ready.
const READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll interval when waiting for readiness.
const READY_POLL: Duration = Duration::from_millis(200);

/// Errors that can occur while managing the instance.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("PostgreSQL command failed: {0}")]
    Command(String),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pg_config not found on PATH")]
    PgConfigNotFound,

    #[error("PostgreSQL not ready after {0:?}")]
    ReadyTimeout(Duration),
}

/// Whether PostgreSQL binaries are reachable. Tests that need a live
/// server call this first and skip when it returns false.
pub fn postgres_available() -> bool {
    std::process::Command::new("pg_config")
        .arg("--bindir")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A throwaway PostgreSQL instance bound to a free ephemeral port.
pub struct EphemeralDb {
    bin_dir: PathBuf,
    data_dir: PathBuf,
    port: u16,
    started: bool,
    /// Keeps the data directory alive until the instance is dropped.
    _tempdir: tempfile::TempDir,
}

impl EphemeralDb {
    /// Initialize and start a fresh instance, creating the `tally`
    /// database inside it.
    pub async fn start() -> Result<Self, DbError> {
        let output = Command::new("pg_config")
            .arg("--bindir")
            .output()
            .await
            .map_err(|_| DbError::PgConfigNotFound)?;
        if !output.status.success() {
            return Err(DbError::PgConfigNotFound);
        }
        let bin_dir = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());

        let tempdir = tempfile::tempdir()?;
        let data_dir = tempdir.path().join("pgdata");
        let port = free_port()?;

        let mut db = Self {
            bin_dir,
            data_dir,
            port,
            started: false,
            _tempdir: tempdir,
        };
        db.run_initdb().await?;
        db.run_pg_ctl_start().await?;
        db.wait_until_ready().await?;
        db.started = true;
        db.create_database().await?;
        debug!(url = %db.connection_url(), "ephemeral PostgreSQL ready");
        Ok(db)
    }

    /// Connection URL for the application database.
    pub fn connection_url(&self) -> String {
        format!("postgresql://localhost:{}/{DATABASE_NAME}", self.port)
    }

    /// Stop the server. Also invoked implicitly by dropping the tempdir,
    /// but an explicit stop shuts down cleanly.
    pub async fn stop(&mut self) -> Result<(), DbError> {
        if !self.started {
            return Ok(());
        }
        let output = Command::new(self.bin_dir.join("pg_ctl"))
            .arg("-D")
            .arg(&self.data_dir)
            .arg("-m")
            .arg("fast")
            .arg("stop")
            .output()
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DbError::Command(format!("pg_ctl stop failed: {stderr}")));
        }
        self.started = false;
        Ok(())
    }

    async fn run_initdb(&self) -> Result<(), DbError> {
        let output = Command::new(self.bin_dir.join("initdb"))
            .arg("-D")
            .arg(&self.data_dir)
            .arg("--no-locale")
            .arg("--encoding=UTF8")
            .output()
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DbError::Command(format!("initdb failed: {stderr}")));
        }
        Ok(())
    }

    async fn run_pg_ctl_start(&self) -> Result<(), DbError> {
        // Unix socket goes into the data dir to avoid /tmp permission issues.
        let server_opts = format!(
            "-p {} -k {} -h localhost",
            self.port,
            self.data_dir.display()
        );
        let logfile = self.data_dir.join("postgresql.log");
        let output = Command::new(self.bin_dir.join("pg_ctl"))
            .arg("-D")
            .arg(&self.data_dir)
            .arg("-o")
            .arg(&server_opts)
            .arg("-l")
            .arg(&logfile)
            .arg("start")
            .output()
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DbError::Command(format!("pg_ctl start failed: {stderr}")));
        }
        Ok(())
    }

    async fn wait_until_ready(&self) -> Result<(), DbError> {
        let pg_isready = self.bin_dir.join("pg_isready");
        let deadline = tokio::time::Instant::now() + READY_TIMEOUT;
        loop {
            let output = Command::new(&pg_isready)
                .arg("-p")
                .arg(self.port.to_string())
                .arg("-h")
                .arg("localhost")
                .output()
                .await?;
            if output.status.success() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(DbError::ReadyTimeout(READY_TIMEOUT));
            }
            sleep(READY_POLL).await;
        }
    }

    async fn create_database(&self) -> Result<(), DbError> {
        // Connect to the default `postgres` database to create ours.
        let maintenance_url = format!("postgresql://localhost:{}/postgres", self.port);
        let pool = sqlx::PgPool::connect(&maintenance_url).await?;
        // CREATE DATABASE cannot use bind parameters; the name is a constant.
        sqlx::query(&format!("CREATE DATABASE \"{DATABASE_NAME}\""))
            .execute(&pool)
            .await?;
        pool.close().await;
        Ok(())
    }
}

/// Find a free ephemeral port by binding to port 0.
fn free_port() -> Result<u16, DbError> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
