use crate::cli::args::Cli;
use crate::error::Result;
use crate::processors::ParallelProcessor;
use crate::settings::ProcessorSettings;
use crate::writers::SummaryFormatter;
use std::fs::File;
use std::sync::Mutex;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use validator::Validate;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(&cli)?;

    let mut settings = ProcessorSettings::load(cli.config.as_deref())?.with_workers(cli.workers);
    if cli.buffered {
        settings.use_mmap = false;
    }
    if cli.progress {
        settings.show_progress = true;
    }
    settings.validate()?;

    info!(
        input = %cli.input_file.display(),
        workers = settings.workers,
        use_mmap = settings.use_mmap,
        "starting"
    );

    let processor = ParallelProcessor::new(settings.workers)
        .with_access_mode(settings.access_mode())
        .with_progress(settings.show_progress);

    let outcome = processor.process_file(&cli.input_file)?;
    if outcome.stations.is_empty() {
        warn!(input = %cli.input_file.display(), "no measurements found");
    }

    let stdout = std::io::stdout();
    SummaryFormatter::new().write_to(&outcome.stations, stdout.lock())?;

    Ok(())
}

/// Logs go to stderr, or to `--log-file` when given. `RUST_LOG` overrides
/// the level chosen by `--verbose`.
fn init_logging(cli: &Cli) -> Result<()> {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    // A subscriber may already be installed when running embedded or in tests.
    if let Err(e) = installed {
        debug!(error = %e, "keeping existing tracing subscriber");
    }

    Ok(())
}
