//! # HTTP environment
//!
//! [`HorizonsEnv`] owns the HTTP client used to talk to JPL/Horizons, the endpoint it
//! talks to and the request timeout. It is cheap to clone and meant to be built once per run.
//!
//! Requests are blocking from the caller's point of view: each call spins a current-thread
//! tokio runtime and waits for the whole response body, so the connection is released before
//! the call returns, on success as on failure.
//!
//! ```rust,no_run
//! use k2ephem::env_state::HorizonsEnv;
//!
//! let env = HorizonsEnv::new().unwrap();
//! let body = env.get_from_url("https://ssd.jpl.nasa.gov/horizons_batch.cgi?batch=1").unwrap();
//! println!("{}", &body[..100.min(body.len())]);
//! ```
use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::{
    constants::{DEFAULT_TIMEOUT_SECS, HORIZONS_URL},
    k2ephem_errors::K2EphemError,
};

#[derive(Debug, Clone)]
pub struct HorizonsEnv {
    pub http_client: Client,
    pub base_url: String,
    pub timeout: Duration,
}

impl HorizonsEnv {
    /// Environment pointing to the public Horizons batch endpoint with the default timeout.
    pub fn new() -> Result<Self, K2EphemError> {
        HorizonsEnv::with_settings(HORIZONS_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Environment with a custom endpoint and timeout.
    ///
    /// Arguments
    /// ---------
    /// * `base_url`: Horizons batch endpoint, without query string
    /// * `timeout`: global timeout of one request
    pub fn with_settings(base_url: &str, timeout: Duration) -> Result<Self, K2EphemError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(HorizonsEnv {
            http_client,
            base_url: base_url.to_string(),
            timeout,
        })
    }

    /// GET `url` and return the response body as text.
    ///
    /// A non-2xx status is reported as [`K2EphemError::HttpStatus`], transport failures as
    /// [`K2EphemError::FetchFailure`]. Nothing is retried.
    pub fn get_from_url(&self, url: &str) -> Result<String, K2EphemError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        rt.block_on(async {
            let response = self.http_client.get(url).send().await?;
            let status = response.status();
            let body = response.text().await?;
            debug!("HTTP {status}, {} bytes received", body.len());
            if !status.is_success() {
                return Err(K2EphemError::HttpStatus {
                    status: status.as_u16(),
                    body,
                });
            }
            Ok(body)
        })
    }
}

#[cfg(test)]
mod env_state_test {
    use super::*;

    #[test]
    fn test_default_env() {
        let env = HorizonsEnv::new().unwrap();
        assert_eq!(env.base_url, HORIZONS_URL);
        assert_eq!(env.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_unreachable_host_is_a_fetch_failure() {
        let env = HorizonsEnv::with_settings("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = env.get_from_url("http://127.0.0.1:9/horizons_batch.cgi");
        assert!(matches!(result, Err(K2EphemError::FetchFailure(_))));
    }
}
