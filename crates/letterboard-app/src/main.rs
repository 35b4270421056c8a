//! Main application entry point (native): replays a gesture script and
//! prints the final board as JSON.

#[cfg(feature = "native")]
#[derive(clap::Parser)]
#[command(name = "letterboard", about = "Replay a Letterboard gesture script")]
struct Cli {
    /// Path to the JSON gesture script.
    script: std::path::PathBuf,
    /// Pretty-print the resulting board.
    #[arg(long)]
    pretty: bool,
}

#[cfg(feature = "native")]
fn main() -> std::process::ExitCode {
    use clap::Parser;
    use std::process::ExitCode;

    env_logger::init();
    let cli = Cli::parse();
    log::info!("Replaying {}", cli.script.display());

    let script = match letterboard_app::Script::load(&cli.script) {
        Ok(script) => script,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let snapshot = script.run();
    let json = if cli.pretty {
        serde_json::to_string_pretty(&snapshot)
    } else {
        serde_json::to_string(&snapshot)
    };
    match json {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to encode board: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
