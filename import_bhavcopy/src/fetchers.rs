use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::StatusCode;

pub const DEFAULT_BASE_URL: &str = "https://www.bseindia.com";

// bseindia.com answers 403 to the default reqwest user agent.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_13_6) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/87.0.4280.88 Safari/537.36";

pub struct FetchResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("HTTP client cannot be built.")?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("GET {url} failed."))?;
        let status = response.status();
        let body = response
            .bytes()
            .with_context(|| format!("body of {url} cannot be read."))?
            .to_vec();
        Ok(FetchResponse { status, body })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Published,
    NotPublished,
}

/// The exchange publishes no trading calendar, so a missing archive is the
/// only sign that the market was closed on the requested date.
pub fn availability(status: StatusCode) -> Availability {
    if status == StatusCode::NOT_FOUND {
        Availability::NotPublished
    } else {
        Availability::Published
    }
}

pub fn previous_day(today: NaiveDate) -> Result<NaiveDate> {
    today
        .pred_opt()
        .with_context(|| format!("the day before {today} is out of range."))
}

pub fn bhavcopy_url(base_url: &str, date: NaiveDate) -> String {
    format!(
        "{}/download/BhavCopy/Equity/EQ{}_CSV.ZIP",
        base_url.trim_end_matches('/'),
        date.format("%d%m%y")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn url_embeds_date_as_ddmmyy() {
        assert_eq!(
            bhavcopy_url(DEFAULT_BASE_URL, date(2021, 1, 5)),
            "https://www.bseindia.com/download/BhavCopy/Equity/EQ050121_CSV.ZIP"
        );
    }

    #[test]
    fn url_ignores_trailing_slash_on_base() {
        assert_eq!(
            bhavcopy_url("http://localhost:8080/", date(2020, 12, 31)),
            "http://localhost:8080/download/BhavCopy/Equity/EQ311220_CSV.ZIP"
        );
    }

    #[test]
    fn previous_day_crosses_month_and_year() {
        assert_eq!(previous_day(date(2021, 3, 1)).unwrap(), date(2021, 2, 28));
        assert_eq!(previous_day(date(2021, 1, 1)).unwrap(), date(2020, 12, 31));
        assert_eq!(previous_day(date(2024, 3, 1)).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn previous_day_fails_at_calendar_start() {
        assert!(previous_day(NaiveDate::MIN).is_err());
    }

    #[test]
    fn http_fetcher_sends_browser_user_agent_and_passes_404_through() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                request.push_str(&line);
            }
            reader
                .get_mut()
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nNot Found")
                .unwrap();
            request
        });

        let url = bhavcopy_url(&format!("http://{addr}"), date(2021, 1, 4));
        let response = HttpFetcher::new().unwrap().fetch(&url).unwrap();
        let request = server.join().unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, b"Not Found");
        assert!(request.starts_with("GET /download/BhavCopy/Equity/EQ040121_CSV.ZIP HTTP/1.1\r\n"));
        let user_agent = request
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("user-agent").then(|| value.trim())
            })
            .unwrap();
        assert_eq!(user_agent, USER_AGENT);
    }

    #[test]
    fn only_not_found_means_not_published() {
        assert_eq!(availability(StatusCode::NOT_FOUND), Availability::NotPublished);
        for status in [
            StatusCode::OK,
            StatusCode::FORBIDDEN,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            assert_eq!(availability(status), Availability::Published);
        }
    }
}
