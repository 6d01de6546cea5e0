//! heic2jpg - Convert HEIC photos to JPG from the command line

use heic2jpg::{
    config::{init_logging, Config},
    error::Result,
    progress::ProgressTracker,
    report, Pipeline,
};
use std::io::BufRead;
use tracing::{error, info};

fn main() {
    // Parse configuration and initialize logging
    let config = Config::from_args().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    init_logging(config.verbose);

    let outcome = run(&config);
    if let Err(e) = &outcome {
        error!("Conversion failed: {:#}", e);
        eprintln!("\nAn unexpected error occurred: {:#}", e);
    }

    if !config.no_pause {
        pause();
    }

    if outcome.is_err() {
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    let (source, destination) = config.resolve_directories()?;

    let pipeline = Pipeline::new(&source, &destination);

    // Check for work before the pipeline creates the destination
    let total_files = match pipeline.preflight() {
        Ok(total_files) => total_files,
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };

    println!("{}", report::render_header());
    println!(
        "{}",
        report::render_run_info(pipeline.source(), pipeline.destination(), total_files)
    );

    let conversion = pipeline.start()?;

    let tracker = ProgressTracker::new(!config.no_progress);
    let progress = tracker.create_file_progress(conversion.total_files(), "Converting files");

    let mut last_stats = conversion.stats();
    for event in conversion {
        ProgressTracker::file_done(&progress, &event.file_name);
        last_stats = event.stats;
    }
    ProgressTracker::finish_progress(progress, "Conversion completed");

    info!(
        "Processed {} files ({} converted, {} copied, {} failed)",
        last_stats.processed, last_stats.converted, last_stats.copied, last_stats.failed
    );
    print!("{}", report::render_summary(&last_stats));
    Ok(())
}

fn pause() {
    println!("\nPress Enter to exit...");
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}
