//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for mex-assist
#[derive(Parser, Debug)]
#[command(name = "mex-assist")]
#[command(author, version, about = "Chat with MEX, the merchant dashboard assistant")]
#[command(long_about = r#"
MEX Assist is a terminal front end for the merchant dashboard's assistant panel.

Each message is sent to the assistant service together with the conversation
so far. Replies may carry a directive: `show_customers` opens the customers
view (filtered by `daysAgo` when given) and `send_emails` opens the email
preview. Only one message can be in flight at a time.

Configuration files are loaded from (in priority order):
1. MEX_* environment variables   e.g. MEX_ASSISTANT__ENDPOINT
2. --config <path>               Explicit config file
3. ./mex.toml                    Project-level config
4. ~/.config/mex-assist/config.toml   Global config

Example:
  mex-assist
  mex-assist "Which customers haven't ordered in 30 days?"
  mex-assist --endpoint https://mex.example.com/api/chat --token "$TOKEN"
"#)]
pub struct Cli {
    /// Send a single message, print the reply and exit
    pub message: Option<String>,

    /// Assistant chat endpoint (overrides config)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Bearer token for the assistant service (overrides config)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write diagnostics to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
