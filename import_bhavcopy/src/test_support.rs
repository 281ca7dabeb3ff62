use crate::fetchers::{FetchResponse, Fetcher};
use anyhow::{bail, Result};
use reqwest::StatusCode;
use std::cell::RefCell;
use std::io::{Cursor, Write};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Answers every request with the same canned response and remembers the urls asked for.
pub struct StaticFetcher {
    response: Option<(StatusCode, Vec<u8>)>,
    pub requested: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub fn new(status: StatusCode, body: Vec<u8>) -> Self {
        Self {
            response: Some((status, body)),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            response: None,
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl Fetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse> {
        self.requested.borrow_mut().push(url.to_owned());
        match &self.response {
            Some((status, body)) => Ok(FetchResponse {
                status: *status,
                body: body.clone(),
            }),
            None => bail!("connection refused"),
        }
    }
}
