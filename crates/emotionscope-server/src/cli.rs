use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "emotionscope")]
#[command(author, version, about = "Emotion classification over HTTP")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the emotion model and serve POST /analyze_emotion
    Serve(ServeArgs),

    /// Send texts to a running server and print the detected emotions
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "emotionscope.yaml", env = "EMOTIONSCOPE_CONFIG")]
    pub config: PathBuf,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// HuggingFace model repository
    #[arg(long, conflicts_with = "model_path")]
    pub model: Option<String>,

    /// Local model directory
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// Inference device (cpu, cuda, metal)
    #[arg(long)]
    pub device: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Server base URL
    #[arg(short, long, default_value = "http://127.0.0.1:5000", env = "EMOTIONSCOPE_URL")]
    pub url: String,

    /// Texts to analyze; a few sample sentences are used when omitted
    pub texts: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
