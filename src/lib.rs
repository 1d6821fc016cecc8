//! Authenticate against the NEPSE public API and descramble its tokens.
//!
//! ```ignore
//! use nepse_auth::{WasmOracle, authenticate};
//!
//! let oracle = WasmOracle::from_file("nepse.wasm")?;
//! let record = authenticate()?;
//! let access_token = record.parse_access_token(&oracle)?;
//! ```
//!
//! To bring your own HTTP client, fetch the body yourself and hand it to
//! [`decode_response`], or deserialize an [`AuthenticationRecord`] directly.
//! Any [`Oracle`] implementation can stand in for the WebAssembly module.

mod claims;
#[cfg(feature = "fetch")]
mod client;
mod descramble;
mod error;
mod oracle;
mod record;
#[cfg(feature = "wasm")]
mod wasm;

pub use claims::Claims;
#[cfg(feature = "fetch")]
pub use client::{
   Authenticator,
   PROVE_URL,
   authenticate,
   decode_response,
};
pub use descramble::{
   CutIndices,
   Permutation,
   Salts,
   cut_indices,
   descramble,
   excise,
};
pub use error::Error;
pub use oracle::{
   Oracle,
   Transform,
};
pub use record::{
   AuthenticationRecord,
   Tokens,
};
#[cfg(feature = "wasm")]
pub use wasm::WasmOracle;
