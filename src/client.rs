//! Fetching the authentication record.

use std::io::Read;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::{
   error::Error,
   record::AuthenticationRecord,
};

/// Production authentication endpoint.
pub const PROVE_URL: &str = "https://www.nepalstock.com/api/authenticate/prove";

/// Headers NEPSE expects from a browser. Requests without them get blocked.
const HEADERS: [(&str, &str); 9] = [
   (
      "User-Agent",
      "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:89.0) Gecko/20100101 Firefox/89.0",
   ),
   ("Accept", "application/json, text/plain, */*"),
   ("Accept-Language", "en-US,en;q=0.5"),
   ("Accept-Encoding", "gzip, deflate, br"),
   ("Connection", "close"),
   ("Referer", ""),
   ("Pragma", "no-cache"),
   ("Cache-Control", "no-cache"),
   ("TE", "Trailers"),
];

/// Issues authentication requests. No retries; every failure is returned.
#[derive(Debug, Clone)]
pub struct Authenticator {
   url: String,
}

impl Default for Authenticator {
   fn default() -> Self {
      Self::new()
   }
}

impl Authenticator {
   /// Targets [`PROVE_URL`].
   #[must_use]
   pub fn new() -> Self {
      Self::with_url(PROVE_URL)
   }

   /// Targets a different endpoint, e.g. a mirror or a local test server.
   #[must_use]
   pub fn with_url(url: impl Into<String>) -> Self {
      Self { url: url.into() }
   }

   #[must_use]
   pub fn url(&self) -> &str {
      &self.url
   }

   /// Fetches a fresh authentication record.
   pub fn authenticate(&self) -> Result<AuthenticationRecord, Error> {
      debug!(url = %self.url, "requesting authentication record");

      let request = HEADERS
         .iter()
         .fold(minreq::get(&self.url), |request, &(name, value)| {
            request.with_header(name, value)
         });
      let response = request.send()?;

      if response.status_code != 200 {
         return Err(Error::HttpStatus(response.status_code, self.url.clone()));
      }

      debug!(bytes = response.as_bytes().len(), "received authentication response");
      decode_response(response.as_bytes())
   }
}

/// Fetches a record from [`PROVE_URL`].
pub fn authenticate() -> Result<AuthenticationRecord, Error> {
   Authenticator::new().authenticate()
}

/// Decodes a raw response body: gzip, then JSON.
///
/// The body is always gunzipped; NEPSE compresses every response regardless
/// of `Content-Encoding` negotiation.
pub fn decode_response(body: &[u8]) -> Result<AuthenticationRecord, Error> {
   let mut json = Vec::new();
   GzDecoder::new(body)
      .read_to_end(&mut json)
      .map_err(Error::Decompress)?;
   Ok(serde_json::from_slice(&json)?)
}
