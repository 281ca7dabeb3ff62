use serde::Deserialize;

pub const REQUIRED_FIELDS: [&str; 6] = ["SC_CODE", "SC_NAME", "OPEN", "HIGH", "LOW", "CLOSE"];

/// One row of the bhavcopy csv. Columns other than the six below are ignored.
#[derive(Debug, Deserialize)]
pub struct BhavRecord {
    #[serde(rename = "SC_CODE")]
    pub securities_code: String,
    #[serde(rename = "SC_NAME")]
    pub securities_name: String,
    #[serde(rename = "OPEN")]
    pub open_price: String,
    #[serde(rename = "HIGH")]
    pub high_price: String,
    #[serde(rename = "LOW")]
    pub low_price: String,
    #[serde(rename = "CLOSE")]
    pub close_price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BhavEntry {
    pub securities_code: String,
    pub securities_name: String,
    pub open_price: String,
    pub high_price: String,
    pub low_price: String,
    pub close_price: String,
}

impl BhavEntry {
    pub fn key(&self) -> String {
        normalize_name(&self.securities_name)
    }

    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            (REQUIRED_FIELDS[0], &self.securities_code),
            (REQUIRED_FIELDS[1], &self.securities_name),
            (REQUIRED_FIELDS[2], &self.open_price),
            (REQUIRED_FIELDS[3], &self.high_price),
            (REQUIRED_FIELDS[4], &self.low_price),
            (REQUIRED_FIELDS[5], &self.close_price),
        ]
    }
}

impl From<BhavRecord> for BhavEntry {
    fn from(record: BhavRecord) -> Self {
        Self {
            securities_code: record.securities_code.trim().to_owned(),
            securities_name: record.securities_name.trim().to_owned(),
            open_price: record.open_price.trim().to_owned(),
            high_price: record.high_price.trim().to_owned(),
            low_price: record.low_price.trim().to_owned(),
            close_price: record.close_price.trim().to_owned(),
        }
    }
}

/// Lookup key for a security: surrounding whitespace removed, lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
