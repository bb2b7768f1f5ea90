extern crate env_logger;
#[macro_use]
extern crate log;

use anyhow::Result;
use clap::Parser;

mod barcode;
mod cli;
mod filter;
mod io;
mod options;
mod reader;
mod report;
mod summary;

use cli::Cli;
use options::Options;

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    println!("read_filter v{}", cli::VERSION);

    let opts = Options::try_from(cli)?;
    info!(
        "Filtering {} barcodes ({}) to lengths {}",
        opts.barcodes.len(),
        opts.barcodes.join(","),
        opts.range
    );

    // time everything!
    let now = std::time::Instant::now();

    let outcomes = barcode::filter_all(&opts)?;
    let elapsed = now.elapsed().as_secs_f64();

    summary::log_run_summary(&outcomes, elapsed);

    if let Some(path) = &opts.report {
        let metadata = report::RunMetadata::new(&opts, elapsed);
        report::write_report(path, &metadata, &outcomes)?;
    }

    info!("Done filtering reads.");
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        if err.downcast_ref::<options::UsageError>().is_some() {
            error!("run with --help for usage");
        }
        std::process::exit(1);
    }
}
