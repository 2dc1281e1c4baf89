//! Purpose: `env2file` CLI entry point.
//! Role: Binary crate root; initializes tracing, runs the driver, maps failures to an exit status.
//! Invariants: stdout carries only "Successfully wrote content to <path>" lines.
//! Invariants: Failures print "Unexpected error: <message>" on stderr and exit with status 1.
//! Invariants: Command-line arguments are ignored; all input comes from the environment.
use tracing_subscriber::EnvFilter;

use env2file::to_exit_code;

fn main() {
    init_tracing();
    if let Err(err) = env2file::run() {
        tracing::debug!(kind = ?err.kind(), path = ?err.path(), "run failed");
        eprintln!("Unexpected error: {err}");
        std::process::exit(to_exit_code(err.kind()));
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
