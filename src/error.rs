//! Error types.

use std::{
   error::Error as StdError,
   fmt,
   io,
};

use crate::oracle::Transform;

#[derive(Debug)]
pub enum Error {
   /// Cut indices are out of range or not strictly increasing for the token.
   CutRange { cuts: [i32; 5], len: usize },
   /// A transform export failed or trapped.
   Transform {
      transform: Transform,
      message:   String,
   },
   /// The transform module could not be compiled or instantiated.
   ModuleLoad(String),
   /// No transform module was embedded at build time.
   ModuleMissing,
   /// The transform module lacks a required export.
   MissingExport(&'static str),
   /// The transform module lock was poisoned by a panicking caller.
   Poisoned,
   /// Failed to parse a token.
   Parse(String),
   /// Base64 decoding failed.
   Base64(data_encoding::DecodeError),
   /// JSON decoding failed.
   Json(serde_json::Error),
   /// Reading a file failed.
   Io(io::Error),
   /// Response body is not valid gzip.
   #[cfg(feature = "fetch")]
   Decompress(io::Error),
   /// HTTP request failed.
   #[cfg(feature = "fetch")]
   Http(minreq::Error),
   /// HTTP response returned non-200 status.
   #[cfg(feature = "fetch")]
   HttpStatus(i32, String),
}

impl fmt::Display for Error {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match *self {
         Self::CutRange { ref cuts, len } => {
            write!(f, "cut indices {cuts:?} do not fit a token of length {len}")
         },
         Self::Transform {
            transform,
            ref message,
         } => write!(f, "transform {} failed: {message}", transform.export_name()),
         Self::ModuleLoad(ref msg) => write!(f, "failed to load transform module: {msg}"),
         Self::ModuleMissing => write!(f, "no transform module was bundled at build time"),
         Self::MissingExport(name) => write!(f, "transform module does not export `{name}`"),
         Self::Poisoned => write!(f, "transform module lock poisoned"),
         Self::Parse(ref msg) => write!(f, "parse error: {msg}"),
         Self::Base64(ref err) => write!(f, "base64 decode error: {err}"),
         Self::Json(ref err) => write!(f, "JSON decode error: {err}"),
         Self::Io(ref err) => write!(f, "I/O error: {err}"),
         #[cfg(feature = "fetch")]
         Self::Decompress(ref err) => write!(f, "gzip decode error: {err}"),
         #[cfg(feature = "fetch")]
         Self::Http(ref err) => write!(f, "HTTP error: {err}"),
         #[cfg(feature = "fetch")]
         Self::HttpStatus(code, ref url) => write!(f, "{url} returned HTTP {code}"),
      }
   }
}

impl StdError for Error {
   fn source(&self) -> Option<&(dyn StdError + 'static)> {
      match *self {
         Self::Base64(ref err) => Some(err),
         Self::Json(ref err) => Some(err),
         Self::Io(ref err) => Some(err),
         Self::CutRange { .. }
         | Self::Transform { .. }
         | Self::ModuleLoad(_)
         | Self::ModuleMissing
         | Self::MissingExport(_)
         | Self::Poisoned
         | Self::Parse(_) => None,
         #[cfg(feature = "fetch")]
         Self::Decompress(ref err) => Some(err),
         #[cfg(feature = "fetch")]
         Self::Http(ref err) => Some(err),
         #[cfg(feature = "fetch")]
         Self::HttpStatus(..) => None,
      }
   }
}

impl From<data_encoding::DecodeError> for Error {
   fn from(err: data_encoding::DecodeError) -> Self {
      Self::Base64(err)
   }
}

impl From<serde_json::Error> for Error {
   fn from(err: serde_json::Error) -> Self {
      Self::Json(err)
   }
}

impl From<io::Error> for Error {
   fn from(err: io::Error) -> Self {
      Self::Io(err)
   }
}

#[cfg(feature = "fetch")]
impl From<minreq::Error> for Error {
   fn from(err: minreq::Error) -> Self {
      Self::Http(err)
   }
}
