// --- creditshift: asignación automática de cursos a requisitos ---

use creditshift::logging::init_tracing;
use creditshift::{ServerConfig, run_job_file, run_server};
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.get(1).map(String::as_str) == Some("run") {
        let Some(path) = args.get(2) else {
            eprintln!("uso: creditshift run <job.json>");
            std::process::exit(2);
        };
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let summary = run_job_file(path, &mut out)?;
        info!(
            batches = summary.batches,
            plans_examined = summary.plans_examined,
            "offline job complete"
        );
        return Ok(());
    }

    let config = ServerConfig::from_env();
    info!("Iniciando servidor en http://{}", config.bind_addr);
    run_server(config).await
}
