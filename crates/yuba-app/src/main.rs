use anyhow::Result;
use clap::Parser;

use yuba::app::{exit_code, run_ask_mode, run_repl_mode};
use yuba::host_api::HostApiServer;
use yuba::{build_widget, init_logging, Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::HostApi { port }) => HostApiServer::new(*port).start().await,
        Some(Commands::Ask { text, json }) => {
            let widget = build_widget(&cli)?;
            let outcome = run_ask_mode(widget, &text.join(" "), *json).await?;
            match exit_code(outcome) {
                0 => Ok(()),
                code => std::process::exit(code),
            }
        }
        None => {
            let widget = build_widget(&cli)?;
            run_repl_mode(&cli, widget).await
        }
    }
}
