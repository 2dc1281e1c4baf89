//! Purpose: Library crate behind the `env2file` binary.
//! Exports: `env`, `parse`, `decode`, `write`, `error`, and the `run` / `run_with` driver.
//! Role: Turn the `WRITE` variable into files: tokenize, resolve each token, write.
//! Invariants: Instructions are processed strictly in order; the first failure stops the run.
//! Invariants: A malformed fragment anywhere in `WRITE` fails before any file is written.
//! Invariants: No rollback; files written before a failure stay on disk.
pub mod decode;
pub mod env;
pub mod error;
pub mod parse;
pub mod write;

use std::path::Path;

use tracing::info;

pub use decode::{Token, decode_content};
pub use env::{GetEnv, SYSTEM_ENV, SystemEnv};
pub use error::{Error, ErrorKind, Result, to_exit_code};
pub use parse::{RawInstruction, WriteInstruction, parse_write_env, tokenize_write};
pub use write::{write_to_file, write_to_file_in};

/// Runs against the process environment and working directory.
pub fn run() -> Result<usize> {
    let cwd = std::env::current_dir()
        .map_err(|err| Error::write_failure(Path::new("."), err))?;
    run_with(&SYSTEM_ENV, &cwd)
}

/// Runs against `env`, resolving relative paths against `base`.
///
/// Each token is resolved right before its file is written, so an undefined
/// reference in instruction N leaves files 1..N-1 in place. Returns the number
/// of files written.
pub fn run_with(env: &impl GetEnv, base: &Path) -> Result<usize> {
    let raw = parse::read_write_var(env)?;
    let instructions = tokenize_write(&raw)?;
    info!(count = instructions.len(), "writing files");

    for RawInstruction { path, token } in &instructions {
        let content = decode_content(token, env)?;
        write_to_file_in(base, path, &content)?;
    }
    Ok(instructions.len())
}
