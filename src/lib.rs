// Biblioteca raíz del crate `creditshift`.
// Reexporta los módulos principales y proporciona `run_job_file`, que ejecuta
// un trabajo de búsqueda leído de disco sin levantar el servidor.
pub mod algorithm;
pub mod api_json;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
pub mod server_handlers;
pub mod worker;

pub use algorithm::{CancelToken, SearchOptions, find_assignments};
pub use api_json::{JobMessage, SearchJob, parse_search_job};
pub use config::ServerConfig;
pub use error::{ConfigError, EngineError, EngineResult, PlanDecodeError};
pub use server::run_server;
pub use worker::{JobSummary, SearchHandle, run_job, spawn_job};

use std::io::{self, Write};
use std::path::Path;

/// Reads a job from `path`, runs it and writes every response line to `out`.
pub fn run_job_file<P: AsRef<Path>, W: Write>(path: P, out: &mut W) -> io::Result<JobSummary> {
    let text = std::fs::read_to_string(path)?;
    let job = parse_search_job(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let mut write_error: Option<io::Error> = None;
    let summary = run_job(job, CancelToken::new(), |message| {
        let written = message
            .to_line()
            .map_err(io::Error::from)
            .and_then(|line| out.write_all(line.as_bytes()));
        match written {
            Ok(()) => true,
            Err(e) => {
                write_error = Some(e);
                false
            }
        }
    });
    match write_error {
        Some(e) => Err(e),
        None => Ok(summary),
    }
}
