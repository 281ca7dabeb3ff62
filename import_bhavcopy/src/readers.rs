use crate::entities::BhavRecord;
use anyhow::{bail, Context, Result};
use std::io::Cursor;
use zip::{read::ZipFile, ZipArchive};

pub type Archive = ZipArchive<Cursor<Vec<u8>>>;

pub trait DataReader {
    fn read<'a>(&'a mut self) -> Box<dyn Iterator<Item = Result<BhavRecord>> + 'a>;
}

pub fn open_archive(body: Vec<u8>) -> Result<Archive> {
    let archive =
        ZipArchive::new(Cursor::new(body)).context("response body is not a zip archive.")?;
    if archive.len() == 0 {
        bail!("zip archive has no entries.");
    }
    Ok(archive)
}

/// Streams rows of the first file stored in the archive. Any further entries are ignored.
pub struct ZipCSVReader<'a> {
    entry_name: String,
    reader: csv::Reader<ZipFile<'a, Cursor<Vec<u8>>>>,
}

impl<'a> ZipCSVReader<'a> {
    pub fn new(archive: &'a mut Archive) -> Result<Self> {
        let entry = archive
            .by_index(0)
            .context("first zip entry cannot be opened.")?;
        let entry_name = entry.name().to_owned();
        Ok(Self {
            entry_name,
            // Rows may carry more or fewer trailing columns than the header.
            reader: csv::ReaderBuilder::new().flexible(true).from_reader(entry),
        })
    }

    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }
}

impl DataReader for ZipCSVReader<'_> {
    fn read<'a>(&'a mut self) -> Box<dyn Iterator<Item = Result<BhavRecord>> + 'a> {
        let entry_name = &self.entry_name;
        Box::new(self.reader.deserialize::<BhavRecord>().map(move |result| {
            result.with_context(|| format!("a record of {entry_name} cannot be read."))
        }))
    }
}
