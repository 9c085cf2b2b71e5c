//! Check if a Solar System object is (or was) observable by NASA's K2 mission.
//!
//! Usage:
//! ```text
//! k2ephem [OPTIONS] <TARGET>
//! ```
//!
//! See --help for detailed options.
use std::{fs::File, path::PathBuf, time::Duration};

use clap::Parser;
use log::info;

use k2ephem::{
    constants::{DEFAULT_STEP_SIZE_DAYS, DEFAULT_TIMEOUT_SECS, FIRST_CAMPAIGN, HORIZONS_URL},
    fetch_and_check,
    visibility::{sky_path, write_sky_path_csv},
    CampaignCatalog, CheckParams, HorizonsEnv, K2EphemError,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    name = "k2ephem",
    about = "Check if a Solar System object is (or was) observable by NASA's K2 mission. \
             This command will query JPL/Horizons to find out.",
    long_about = None
)]
struct Args {
    /// Name of the target. Must be known to JPL/Horizons.
    target: String,

    /// First campaign to check
    #[arg(long, default_value_t = FIRST_CAMPAIGN)]
    first: u32,

    /// Last campaign to check (defaults to the last campaign of the catalog)
    #[arg(long)]
    last: Option<u32>,

    /// Ephemeris step size in days; values below 1 are sent to Horizons in hours
    #[arg(long, default_value_t = DEFAULT_STEP_SIZE_DAYS)]
    step: f64,

    /// CSV file overriding the built-in campaign table (campaign,ra,dec,roll,start,stop)
    #[arg(long)]
    campaigns: Option<PathBuf>,

    /// Write the sky path of the target during the campaigns to this CSV file, for plotting
    #[arg(long)]
    plot: Option<PathBuf>,

    /// JPL/Horizons batch endpoint
    #[arg(long, default_value = HORIZONS_URL)]
    horizons_url: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Print debug information
    #[arg(short, long, action)]
    verbose: bool,
}

fn run(args: &Args) -> Result<(), K2EphemError> {
    let catalog = match &args.campaigns {
        Some(path) => CampaignCatalog::from_csv_path(path)?,
        None => CampaignCatalog::k2(),
    };
    let last = args
        .last
        .or_else(|| catalog.last_number())
        .ok_or_else(|| K2EphemError::InvalidParameter("the campaign catalog is empty".into()))?;

    let params = CheckParams::builder()
        .first_campaign(args.first)
        .last_campaign(last)
        .step_size_days(args.step)
        .build()?;

    let env = HorizonsEnv::with_settings(&args.horizons_url, Duration::from_secs(args.timeout))?;
    let (table, results) = fetch_and_check(&env, &catalog, &args.target, &params)?;

    if let Some(path) = &args.plot {
        let points = sky_path(&table, &catalog, params.first_campaign, params.last_campaign)?;
        write_sky_path_csv(&points, File::create(path)?)?;
        info!("Sky path written to {}", path.display());
    }

    if results.is_empty() {
        println!(
            "'{}' does not appear to be visible in K2 campaigns {}-{}.",
            args.target, params.first_campaign, params.last_campaign
        );
    } else {
        let campaigns: Vec<_> = results.iter().map(|r| r.campaign).collect();
        println!(
            "Object '{}' is visible in Campaigns {:?}.",
            args.target, campaigns
        );
        for result in &results {
            println!("{result}");
        }
    }
    Ok(())
}

fn main() -> Result<(), K2EphemError> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&args) {
        // Horizons' own explanation has already been logged by the parser
        Err(err) if err.is_ephem_failure() => {
            eprintln!("Could not retrieve an ephemeris for '{}'.", args.target);
            Ok(())
        }
        other => other,
    }
}
