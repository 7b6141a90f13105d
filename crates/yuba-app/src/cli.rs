use clap::{Parser, Subcommand};
use yuba_types::DEFAULT_BACKEND;

/// CLI arguments for yuba
#[derive(Parser, Debug)]
#[command(name = "yuba")]
#[command(about = "Yuba - Your Ultimate Backend Agent, in the terminal")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend origin serving /chat and /format
    #[arg(long, env = "YUBA_BACKEND", default_value = DEFAULT_BACKEND, value_name = "URL")]
    pub backend: String,

    /// Bot configuration reference forwarded with every chat request
    #[arg(long, env = "YUBA_CONFIG_URL", default_value = "", value_name = "URL")]
    pub config_url: String,

    /// Email of the user, passed along with the configuration
    #[arg(long, env = "YUBA_USER_EMAIL", value_name = "EMAIL")]
    pub user_email: Option<String>,

    /// Host API performing callback actions (e.g. http://localhost:8001).
    /// Without it, callback instructions from the backend cannot be carried out.
    #[arg(long, env = "YUBA_HOST_API", value_name = "URL")]
    pub host_api: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a single message and print the reply
    Ask {
        /// Message text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print the reply as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the mock host API (GET /news, GET /weather)
    HostApi {
        /// Port to listen on
        #[arg(long, default_value_t = 8001)]
        port: u16,
    },
}
