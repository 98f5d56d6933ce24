use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_config(name: &str) -> Option<Self> {
        <Self as clap::ValueEnum>::from_str(name, true).ok()
    }
}

#[derive(Parser)]
#[command(
    name = "quotefind",
    about = "Find quotes in YouTube videos and jump to the moment they are spoken",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL (starts an interactive session if omitted)
    pub url: Option<String>,

    /// Text to search for in the transcript
    pub query: Option<String>,

    /// Cue playback at the Nth result (1-based)
    #[arg(short, long)]
    pub pick: Option<usize>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print the player cue for the video
    #[arg(long)]
    pub preview: bool,

    /// List thumbnail URLs for the video
    #[arg(short, long)]
    pub thumbnails: bool,

    /// Download every thumbnail tier into DIR
    #[arg(long, value_name = "DIR")]
    pub save_thumbnails: Option<PathBuf>,

    /// Read queries and commands from stdin even when a URL is given
    #[arg(short, long)]
    pub interactive: bool,

    /// Transcript service endpoint
    #[arg(long)]
    pub service: Option<String>,

    /// Maximum dissimilarity (0-1) for a segment to match
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Transcript request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum number of results to show
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Show session state transitions and metadata
    #[arg(short, long)]
    pub verbose: bool,
}
