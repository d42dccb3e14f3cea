// BaZi Chart - CLI
// Computes one chart and prints it as JSON

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use bazi_chart::{
    BirthRequest, CachedCalendar, ChartBuilder, ChartError, ChartReport, Config, ErrorPayload,
    TableCalendar,
};

#[derive(Debug, Parser)]
#[command(name = "bazi-chart", version, about = "Four Pillars chart from a civil birth moment")]
struct Cli {
    /// Civil birth year
    #[arg(long)]
    year: Option<i32>,

    /// Civil birth month (1-12)
    #[arg(long)]
    month: Option<u32>,

    /// Civil birth day (1-31)
    #[arg(long)]
    day: Option<u32>,

    /// Civil birth hour (0-23)
    #[arg(long)]
    hour: Option<u32>,

    /// Civil birth minute (0-59)
    #[arg(long)]
    minute: Option<u32>,

    /// Birthplace longitude in decimal degrees east
    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Solar-term CSV (year,term,instant)
    #[arg(long)]
    solar_terms: Option<PathBuf>,

    /// Lunar month CSV (lunar_year,month,leap,start)
    #[arg(long)]
    lunar_months: Option<PathBuf>,

    /// Meridian the civil clock is set to
    #[arg(long, allow_hyphen_values = true)]
    meridian: Option<f64>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn request(&self) -> BirthRequest {
        BirthRequest {
            birth_year: self.year,
            birth_month: self.month,
            birth_day: self.day,
            birth_hour: self.hour,
            birth_minute: self.minute,
            longitude: self.longitude,
        }
    }

    fn config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(path) = &self.solar_terms {
            config.solar_terms_path = path.clone();
        }
        if let Some(path) = &self.lunar_months {
            config.lunar_months_path = path.clone();
        }
        if let Some(meridian) = self.meridian {
            config.reference_meridian = meridian;
        }
        Ok(config)
    }
}

/// What the CLI prints: a chart, or the payload of a chart failure.
enum Outcome {
    Chart(Box<ChartReport>),
    Failure(ErrorPayload),
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli)? {
        Outcome::Chart(report) => {
            print_json(&report, cli.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Failure(payload) => {
            print_json(&payload, cli.pretty)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Validate the request first so input errors never depend on the data files.
fn run(cli: &Cli) -> Result<Outcome> {
    let moment = match cli.request().validate() {
        Ok(moment) => moment,
        Err(e) => return Ok(Outcome::Failure(ErrorPayload::from(&ChartError::from(e)))),
    };

    let config = cli.config()?;
    let calendar = TableCalendar::from_paths(&config.solar_terms_path, &config.lunar_months_path)
        .context("Failed to load calendar tables")?;
    let builder = ChartBuilder::new(CachedCalendar::new(calendar)).with_settings(config.chart_settings());

    Ok(match builder.build(&moment) {
        Ok(chart) => Outcome::Chart(Box::new(ChartReport::from(&chart))),
        Err(err) => Outcome::Failure(ErrorPayload::from(&err)),
    })
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_TABLES: [&str; 4] = [
        "--solar-terms",
        "/nonexistent/solar_terms.csv",
        "--lunar-months",
        "/nonexistent/lunar_months.csv",
    ];

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["bazi-chart"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&NO_TABLES);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_missing_longitude_reported_before_tables_load() {
        let cli = cli(&["--year", "1990", "--month", "1", "--day", "1", "--hour", "0", "--minute", "0"]);

        match run(&cli).unwrap() {
            Outcome::Failure(payload) => {
                assert_eq!(payload.kind, "validation");
                assert_eq!(payload.field.as_deref(), Some("longitude"));
            }
            Outcome::Chart(_) => panic!("chart built without a longitude"),
        }
    }

    #[test]
    fn test_valid_request_needs_tables() {
        let cli = cli(&[
            "--year", "1990", "--month", "1", "--day", "1", "--hour", "0", "--minute", "0",
            "--longitude", "116.4",
        ]);

        let err = run(&cli).err().unwrap();
        assert!(err.to_string().contains("Failed to load calendar tables"));
    }

    #[test]
    fn test_negative_longitude_parses() {
        let cli = cli(&["--longitude", "-73.9"]);
        assert_eq!(cli.request().longitude, Some(-73.9));
    }
}
