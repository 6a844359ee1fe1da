// Command-line front end.
//
// Loads the CSV snapshot once, builds the request from arguments, runs one
// pipeline and prints a markdown preview, optionally exporting the full
// table to CSV and/or JSON.
use clap::{Args, Parser, Subcommand};
use realty_trends::format::{format_groups, format_parking, format_search, format_trends};
use realty_trends::loader::{self, LoadReport};
use realty_trends::util::format_int;
use realty_trends::{
    output, AnalyticsRequest, Dimension, FilterSpec, PeriodField, RegionFilter, SecondarySort,
    Snapshot,
};
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

#[derive(Debug, Parser)]
#[command(name = "realty-trends", about = "Real-estate price trends and parking supply reports")]
struct Cli {
    /// Transaction table (CSV).
    #[arg(long, env = "REALTY_TRANSACTIONS", default_value = "real_estate_transaction.csv")]
    transactions: PathBuf,

    /// Public parking roster (CSV).
    #[arg(long, env = "REALTY_PARKING", default_value = "public_parking.csv")]
    parking: PathBuf,

    /// Rows shown in the console preview.
    #[arg(long, default_value_t = 20)]
    preview: usize,

    /// Export the full table as CSV.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Export the full table as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct FilterArgs {
    #[arg(long)]
    district: Option<String>,
    #[arg(long)]
    subdivision: Option<String>,
    #[arg(long)]
    building_use: Option<String>,
    /// Amount ceiling in 10,000 won; ignored if not a number.
    #[arg(long)]
    max_amount: Option<String>,
}

impl FilterArgs {
    fn to_spec(&self) -> FilterSpec {
        FilterSpec::from_inputs(
            self.district.as_deref(),
            self.subdivision.as_deref(),
            self.building_use.as_deref(),
            self.max_amount.as_deref(),
        )
    }
}

#[derive(Debug, Args)]
struct TrendArgs {
    #[command(flatten)]
    filter: FilterArgs,
    /// Comma-separated: district, subdivision, building-use, building-name.
    #[arg(long, value_delimiter = ',', default_value = "district")]
    group_by: Vec<Dimension>,
    /// reception-year, contract-year or construction-year.
    #[arg(long, default_value = "reception-year")]
    period: PeriodField,
    /// Restart ranking for each value of this dimension.
    #[arg(long)]
    rank_within: Option<Dimension>,
    /// Show only this subdivision, ranked against the rest of the filtered set.
    #[arg(long)]
    focus_subdivision: Option<String>,
    /// Tie-breaker after rank: group or period.
    #[arg(long, default_value = "group")]
    sort_by: SecondarySort,
}

impl TrendArgs {
    fn to_request(&self) -> AnalyticsRequest {
        AnalyticsRequest {
            filter: self.filter.to_spec(),
            dimensions: self.group_by.clone(),
            period: self.period,
            rank_within: self.rank_within,
            focus_subdivision: self
                .focus_subdivision
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            sort_by: self.sort_by,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Yearly average price per m² with yoy/total change and rank.
    Trends(TrendArgs),
    /// One row per group ranked by total change.
    Ranking(TrendArgs),
    /// List transactions matching the filters.
    Search(FilterArgs),
    /// Parking supply and availability.
    Parking {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        sub_region: Option<String>,
    },
    /// Known districts, or the subdivisions of one district.
    Regions {
        #[arg(long)]
        district: Option<String>,
    },
}

fn log_load(what: &str, report: &LoadReport) {
    log::info!(
        "{}: {} rows read, {} loaded, {} skipped",
        what,
        format_int(report.total_rows),
        format_int(report.loaded_rows),
        format_int(report.parse_errors)
    );
}

/// The filters name a place the snapshot has never seen. Reported as a
/// warning; the (empty) table is still produced.
fn check_known_region(snapshot: &Snapshot, spec: &FilterSpec) {
    if let Some(d) = &spec.district {
        let known = snapshot.districts();
        if !known.contains(d) {
            log::warn!("district '{}' not found; known districts: {}", d, known.join(", "));
            return;
        }
        if let Some(s) = &spec.subdivision {
            let subs = snapshot.subdivisions(d);
            if !subs.contains(s) {
                log::warn!("subdivision '{}' not found in {}; known: {}", s, d, subs.join(", "));
            }
        }
    }
}

fn emit<T>(cli: &Cli, title: &str, note: Option<&str>, rows: &[T]) -> realty_trends::Result<()>
where
    T: Tabled + Serialize + Clone,
{
    output::preview_table(title, note, rows, cli.preview);
    if let Some(path) = &cli.out {
        output::write_csv(path, rows)?;
        println!("(Full table exported to {})", path.display());
    }
    if let Some(path) = &cli.json {
        output::write_json(path, rows)?;
        println!("(Full table exported to {})", path.display());
    }
    Ok(())
}

fn run(cli: &Cli) -> realty_trends::Result<()> {
    let (snapshot, tx_report, pk_report) = loader::load_snapshot(&cli.transactions, &cli.parking)?;
    log_load("transactions", &tx_report);
    log_load("parking", &pk_report);

    match &cli.command {
        Command::Trends(args) => {
            let request = args.to_request();
            check_known_region(&snapshot, &request.filter);
            let trends = realty_trends::run_analytics(&snapshot, &request);
            emit(cli, "Average Price per m² by Period", Some("rank by total change rate"), &format_trends(&trends))
        }
        Command::Ranking(args) => {
            let request = args.to_request();
            check_known_region(&snapshot, &request.filter);
            let groups = realty_trends::run_group_ranking(&snapshot, &request);
            emit(cli, "Total Change Rate Ranking", None, &format_groups(&groups))
        }
        Command::Search(args) => {
            let spec = args.to_spec();
            check_known_region(&snapshot, &spec);
            let hits = realty_trends::run_record_search(&snapshot, &spec);
            emit(cli, "Matching Transactions", None, &format_search(&hits))
        }
        Command::Parking { region, sub_region } => {
            let filter = RegionFilter::from_inputs(region.as_deref(), sub_region.as_deref());
            if let Some(r) = &filter.region {
                if !snapshot.parking_regions().contains(r) {
                    log::warn!("no parking facilities registered in '{}'", r);
                }
            }
            let supply = realty_trends::run_parking_supply(&snapshot, &filter);
            emit(cli, "Public Parking Supply", Some("sorted by total spaces"), &format_parking(&supply))
        }
        Command::Regions { district } => {
            let names = match district.as_deref() {
                Some(d) => snapshot.subdivisions(d),
                None => snapshot.districts(),
            };
            for n in &names {
                println!("{}", n);
            }
            if let Some(path) = &cli.json {
                output::write_json(path, &names)?;
            }
            Ok(())
        }
    }
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
