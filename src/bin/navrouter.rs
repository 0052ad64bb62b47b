use navrouter::cli::run_cli;
use navrouter::logging;

fn main() {
    if let Err(err) = logging::init_logging_with_config(&logging::LogConfig::from_env()) {
        eprintln!("warning: {err}");
    }
    if let Err(err) = run_cli() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
