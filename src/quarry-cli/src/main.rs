use clap::Parser;
use quarry_cli::{output, run, telemetry, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Resolve options first so a config-file `debug` also drives log verbosity
    let options = match cli.client_options() {
        Ok(options) => options,
        Err(e) => {
            output::print_error(&format!("{e:#}"));
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init_telemetry(options.debug, cli.log_json) {
        output::print_warning(&format!("logging disabled: {e}"));
    }

    if let Err(e) = run(cli, options).await {
        tracing::debug!(error = ?e, "Command failed");
        output::print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
