mod entities;
mod fetchers;
mod readers;
mod repositories;
#[cfg(test)]
mod test_support;
mod usecases;
use anyhow::{Context, Result};
use chrono::Local;
use clap::{value_parser, Arg, ArgMatches, Command};
use fetchers::{HttpFetcher, DEFAULT_BASE_URL};
use repositories::RedisRepository;
use std::process::ExitCode;
use tracing::{error, info, warn, Level};
use usecases::{import_bhavcopy, ImportOutcome};

struct Settings {
    redis_host: String,
    redis_port: u16,
    redis_db: i64,
    base_url: String,
}

fn main() -> ExitCode {
    init_logger();

    let settings = match get_settings(&set_console()) {
        Ok(settings) => settings,
        Err(e) => {
            error!(message = &*e.to_string());
            return ExitCode::FAILURE;
        }
    };

    info!("import task was started.");
    match execute_import(&settings) {
        Ok(ImportOutcome::NotPublished { date }) => {
            info!(message = "import task was skipped.", %date);
            ExitCode::SUCCESS
        }
        Ok(ImportOutcome::Loaded {
            date,
            records,
            securities,
        }) => {
            info!(message = "import task was succeeded.", %date, records, securities);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let traces = &*e
                .chain()
                .map(|e| e.to_string())
                .collect::<Vec<String>>()
                .join(",\n");
            error!(message = &*e.to_string(), trace = traces);
            warn!("import task was failed.");
            ExitCode::FAILURE
        }
    }
}

fn execute_import(settings: &Settings) -> Result<ImportOutcome> {
    let fetcher = HttpFetcher::new()?;
    let mut repository =
        RedisRepository::new(&settings.redis_host, settings.redis_port, settings.redis_db)?;
    import_bhavcopy(
        &fetcher,
        &mut repository,
        &settings.base_url,
        Local::now().date_naive(),
    )
}

fn init_logger() {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .json()
        .flatten_event(true)
        .init();
}

fn set_console() -> ArgMatches {
    Command::new("Import bhavcopy batch")
        .version("1.0.0")
        .about("Load yesterday's BSE equity bhavcopy into redis")
        .arg(
            Arg::new("redis_host")
                .long("redis-host")
                .env("REDIS_HOST")
                .value_name("HOST")
                .required(true),
        )
        .arg(
            Arg::new("redis_port")
                .long("redis-port")
                .env("REDIS_PORT")
                .value_name("PORT")
                .value_parser(value_parser!(u16))
                .default_value("6379"),
        )
        .arg(
            Arg::new("redis_db")
                .long("redis-db")
                .env("REDIS_DB")
                .value_name("DB")
                .value_parser(value_parser!(i64))
                .default_value("0"),
        )
        .arg(
            Arg::new("base_url")
                .long("base-url")
                .env("BHAVCOPY_BASE_URL")
                .value_name("URL")
                .default_value(DEFAULT_BASE_URL),
        )
        .get_matches()
}

fn get_settings(matches: &ArgMatches) -> Result<Settings> {
    Ok(Settings {
        redis_host: matches
            .get_one::<String>("redis_host")
            .context("redis host is not specified.")?
            .to_owned(),
        redis_port: *matches
            .get_one::<u16>("redis_port")
            .context("redis port is not specified.")?,
        redis_db: *matches
            .get_one::<i64>("redis_db")
            .context("redis db is not specified.")?,
        base_url: matches
            .get_one::<String>("base_url")
            .context("base url is not specified.")?
            .to_owned(),
    })
}
