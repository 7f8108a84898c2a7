use std::time::{Duration, UNIX_EPOCH};

use crate::source::{ClockError, ReferenceSource};

/// Reference time from the `Date` header of a HEAD request.
///
/// Any web server works; the header has one-second resolution.
pub struct HttpDateSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpDateSource {
    pub fn new(url: impl Into<String>) -> Result<Self, ClockError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| ClockError::Unreachable(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl ReferenceSource for HttpDateSource {
    fn probe(&mut self) -> Result<f64, ClockError> {
        let response = self
            .client
            .head(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .map_err(|e| ClockError::Unreachable(e.to_string()))?;
        let header = response
            .headers()
            .get(reqwest::header::DATE)
            .ok_or(ClockError::MissingDate)?;
        let text = header
            .to_str()
            .map_err(|_| ClockError::MalformedDate(format!("{header:?}")))?;
        parse_date(text)
    }
}

fn parse_date(text: &str) -> Result<f64, ClockError> {
    let when =
        httpdate::parse_http_date(text).map_err(|_| ClockError::MalformedDate(text.to_owned()))?;
    when.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .map_err(|_| ClockError::MalformedDate(text.to_owned()))
}
