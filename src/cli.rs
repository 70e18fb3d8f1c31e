use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Chat with an AI companion from your terminal", long_about = None)]
pub struct Args {
    /// Send a single message and print the reply instead of starting a chat
    pub message: Option<String>,

    /// Path to the YAML config file [default: ~/.hearttalk/config.yaml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Chat endpoint URL
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
