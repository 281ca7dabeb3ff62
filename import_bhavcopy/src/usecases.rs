use crate::{
    entities::BhavEntry,
    fetchers::{availability, bhavcopy_url, previous_day, Availability, Fetcher},
    readers::{open_archive, DataReader, ZipCSVReader},
    repositories::Repository,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    /// No archive exists for `date`; the store was not touched.
    NotPublished { date: NaiveDate },
    Loaded {
        date: NaiveDate,
        records: usize,
        securities: usize,
    },
}

/// Downloads the bhavcopy for the day before `today` and replaces the store contents with it.
///
/// The store is flushed once the first archive entry is open, before any row is parsed,
/// so a failure past that point leaves it empty or partially loaded.
pub fn import_bhavcopy(
    fetcher: &impl Fetcher,
    repository: &mut impl Repository,
    base_url: &str,
    today: NaiveDate,
) -> Result<ImportOutcome> {
    let date = previous_day(today)?;
    let url = bhavcopy_url(base_url, date);
    info!(message = "downloading bhavcopy.", %date, url = &*url);

    let response = fetcher.fetch(&url)?;
    if availability(response.status) == Availability::NotPublished {
        info!(message = "bhavcopy is not published.", %date, status = %response.status);
        return Ok(ImportOutcome::NotPublished { date });
    }

    let status = response.status;
    let mut archive = open_archive(response.body)
        .with_context(|| format!("bhavcopy of {date} cannot be opened (status {status})."))?;
    let mut reader = ZipCSVReader::new(&mut archive)?;
    info!(message = "bhavcopy was opened.", entry = reader.entry_name());

    repository.clear()?;
    let (records, securities) = load(&mut reader, repository)?;

    info!(message = "bhavcopy was loaded.", %date, records, securities);
    Ok(ImportOutcome::Loaded {
        date,
        records,
        securities,
    })
}

fn load(reader: &mut impl DataReader, repository: &mut impl Repository) -> Result<(usize, usize)> {
    let mut records = 0;
    let mut keys = HashSet::new();
    for record in reader.read() {
        let entry = BhavEntry::from(record?);
        let key = entry.key();
        if keys.contains(&key) {
            debug!(message = "duplicate security name replaced.", key = &*key);
        }
        repository.upsert(&entry)?;
        records += 1;
        keys.insert(key);
    }
    Ok((records, keys.len()))
}
