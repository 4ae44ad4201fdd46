use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "brc-processor")]
#[command(about = "Per-station min/mean/max summary of a station;measurement file")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Input file with one 'station;measurement' record per line")]
    pub input_file: PathBuf,

    #[arg(
        short,
        long,
        help = "Number of parallel workers [default: available CPUs]"
    )]
    pub workers: Option<usize>,

    #[arg(long, help = "Read chunks with buffered I/O instead of memory mapping")]
    pub buffered: bool,

    #[arg(long, help = "Show a progress bar on stderr")]
    pub progress: bool,

    #[arg(short, long, help = "Settings file (toml, yaml, json, ...)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}
