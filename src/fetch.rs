use hyper::client::HttpConnector;
use hyper::{Client, Uri};
use log::{debug, info};

use crate::domain::{Metric, Reading, Readings};
use crate::error::{Error, Result};

pub struct Fetcher {
    client: Client<HttpConnector>,
    base_url: String,
}

impl Fetcher {
    pub fn new(base_url: impl Into<String>) -> Fetcher {
        Fetcher {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn endpoint(&self, metric: Metric) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), metric.endpoint())
    }

    pub async fn fetch(&self, metric: Metric) -> Result<Reading> {
        let url = self.endpoint(metric);
        let uri: Uri = url.parse()?;

        debug!("GET {}", url);

        let response = self.client.get(uri).await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Status { url, status });
        }

        let body = hyper::body::to_bytes(response.into_body()).await?;
        let value = String::from_utf8(body.to_vec())?;

        Ok(Reading::new(metric, value))
    }

    pub async fn fetch_all(&self) -> Result<Readings> {
        let mut readings = Readings::default();

        for metric in Metric::ALL.iter().copied() {
            let reading = self.fetch(metric).await?;

            info!("Reading: {:?}", reading.to_string());

            readings.push(reading);
        }

        Ok(readings)
    }
}
