//! Allow-list validation for proxied upstream URLs.

use url::Url;

use super::error::{ProxyError, ProxyResult};

/// Upstream data providers the proxy is willing to relay to.
///
/// Exact host matches only; no wildcard or subdomain matching.
pub const ALLOWED_HOSTS: &[&str] = &[
    "forecast.weather.gov",
    "api.weather.com",
    "www.aviationweather.gov",
    "www.wunderground.com",
    "api-ak.wunderground.com",
    "tidesandcurrents.noaa.gov",
    "l-36.com",
    "airquality.weather.gov",
    "airnow.gov",
    "www.airnowapi.org",
    "alerts.weather.gov",
    "mesonet.agron.iastate.edu",
    "tgftp.nws.noaa.gov",
    "www.cpc.ncep.noaa.gov",
    "radar.weather.gov",
    "www2.ehs.niu.edu",
    "api.usno.navy.mil",
];

/// Validates that `url` points at an allow-listed upstream over HTTP(S).
///
/// Pure check, performs no I/O.
pub fn validate(url: &Url) -> ProxyResult<()> {
    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(ProxyError::UnsupportedScheme),
    }

    // An explicit port makes the authority something other than a listed
    // host, even when the name part matches.
    if url.port().is_some() {
        return Err(ProxyError::InvalidHost);
    }

    let host = url.host_str().ok_or(ProxyError::InvalidHost)?;
    if ALLOWED_HOSTS.contains(&host) {
        Ok(())
    } else {
        Err(ProxyError::InvalidHost)
    }
}
