//! confconv binary entry point

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use confconv_core::{ConvertConfig, Converter, NamingMode};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug)]
struct CliOptions {
    config: ConvertConfig,
    summary: bool,
    log_format: LogFormat,
}

impl CliOptions {
    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let source = matches
            .get_one::<PathBuf>("source")
            .context("missing source directory")?;
        let target = matches
            .get_one::<PathBuf>("target")
            .context("missing target directory")?;

        let mut config = ConvertConfig::new(source, target);
        if let Some(&jobs) = matches.get_one::<u64>("jobs") {
            let jobs = usize::try_from(jobs).context("--jobs does not fit this platform")?;
            config = config.with_max_jobs(jobs);
        }
        if let Some(&secs) = matches.get_one::<u64>("timeout") {
            config = config.with_job_timeout(Duration::from_secs(secs));
        }
        if matches.get_flag("anchor-extension") {
            config = config.with_naming(NamingMode::Suffix);
        }

        let log_format = match matches.get_one::<String>("log-format").map(String::as_str) {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            config,
            summary: matches.get_flag("summary"),
            log_format,
        })
    }
}

fn build_cli() -> Command {
    Command::new("confconv")
        .version(confconv_core::VERSION)
        .about("Convert a directory of YAML files into pretty-printed JSON")
        .arg(
            Arg::new("source")
                .value_name("SOURCE_DIR")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory containing .yaml/.yml files"),
        )
        .arg(
            Arg::new("target")
                .value_name("TARGET_DIR")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Output directory (deleted and recreated)"),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .value_parser(value_parser!(u64).range(1..))
                .help("Maximum number of files converted at once"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .value_parser(value_parser!(u64).range(1..))
                .help("Abort the run if a single file takes longer than this"),
        )
        .arg(
            Arg::new("anchor-extension")
                .long("anchor-extension")
                .action(ArgAction::SetTrue)
                .help("Only replace the trailing extension when naming output files"),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .action(ArgAction::SetTrue)
                .help("Print how many files were converted, also on failure"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Log output format"),
        )
}

fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    let options = match CliOptions::from_matches(&matches) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    init_logging(options.log_format);

    let converter = Converter::new(options.config);
    let cancel = converter.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling outstanding conversions ...");
            cancel.cancel();
        }
    });

    match converter.run().await {
        Ok(report) => {
            if options.summary {
                println!("{}", report.summary());
            }
            ExitCode::SUCCESS
        }
        Err(failure) => {
            if options.summary {
                println!("{}", failure.report.summary());
            }
            eprintln!("error: {failure}");
            ExitCode::FAILURE
        }
    }
}
