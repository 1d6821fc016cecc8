//! The `/api/authenticate/prove` response.

use serde::Deserialize;

use crate::{
   descramble::{
      Permutation,
      Salts,
      descramble,
   },
   error::Error,
   oracle::Oracle,
};

/// Authentication response as returned by NEPSE.
///
/// The tokens are still scrambled. Use [`tokens`](Self::tokens) or the
/// `parse_*` methods to recover them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationRecord {
   #[serde(default, deserialize_with = "null_as_default")]
   pub server_time:       i64,
   #[serde(default, deserialize_with = "null_as_default")]
   pub salt:              String,
   pub access_token:      String,
   #[serde(default, deserialize_with = "null_as_default")]
   pub token_type:        String,
   pub refresh_token:     String,
   pub salt1:             i32,
   pub salt2:             i32,
   pub salt3:             i32,
   pub salt4:             i32,
   pub salt5:             i32,
   #[serde(default, deserialize_with = "null_as_default")]
   pub is_display_active: bool,
   #[serde(default, deserialize_with = "null_as_default")]
   pub popup_doc_for:     String,
}

/// Descrambled access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
   pub access:  String,
   pub refresh: String,
}

impl AuthenticationRecord {
   /// `salt1` through `salt5`.
   #[must_use]
   pub const fn salts(&self) -> Salts {
      [self.salt1, self.salt2, self.salt3, self.salt4, self.salt5]
   }

   /// Recovers the real access token.
   pub fn parse_access_token<O: Oracle + ?Sized>(&self, oracle: &O) -> Result<String, Error> {
      descramble(oracle, &self.access_token, self.salts(), &Permutation::ACCESS)
   }

   /// Recovers the real refresh token.
   pub fn parse_refresh_token<O: Oracle + ?Sized>(&self, oracle: &O) -> Result<String, Error> {
      descramble(oracle, &self.refresh_token, self.salts(), &Permutation::REFRESH)
   }

   /// Recovers both tokens.
   pub fn tokens<O: Oracle + ?Sized>(&self, oracle: &O) -> Result<Tokens, Error> {
      Ok(Tokens {
         access:  self.parse_access_token(oracle)?,
         refresh: self.parse_refresh_token(oracle)?,
      })
   }
}

/// Informational fields are sometimes sent as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
   D: serde::Deserializer<'de>,
   T: Default + Deserialize<'de>,
{
   Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
