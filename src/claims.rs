//! Inspecting descrambled tokens.
//!
//! NEPSE tokens are JWTs. Only the payload is decoded; the signature is not
//! verified.

use data_encoding::BASE64URL_NOPAD;
use serde_json::{
   Map,
   Value,
};

use crate::error::Error;

/// Decoded JWT payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
   payload: Map<String, Value>,
}

impl Claims {
   /// Decodes the payload segment of `token`.
   ///
   /// A still-scrambled token usually fails here, which makes this a cheap
   /// sanity check after descrambling.
   pub fn from_token(token: &str) -> Result<Self, Error> {
      let mut segments = token.split('.');
      let (Some(_header), Some(payload), Some(_signature), None) =
         (segments.next(), segments.next(), segments.next(), segments.next())
      else {
         return Err(Error::Parse("token is not a three-part JWT".into()));
      };

      let bytes = BASE64URL_NOPAD.decode(payload.trim_end_matches('=').as_bytes())?;
      let value: Value = serde_json::from_slice(&bytes)?;
      match value {
         Value::Object(payload) => Ok(Self { payload }),
         _ => Err(Error::Parse("JWT payload is not an object".into())),
      }
   }

   /// `exp`, in seconds since the Unix epoch.
   #[must_use]
   pub fn expires_at(&self) -> Option<i64> {
      self.payload.get("exp").and_then(Value::as_i64)
   }

   /// `iat`, in seconds since the Unix epoch.
   #[must_use]
   pub fn issued_at(&self) -> Option<i64> {
      self.payload.get("iat").and_then(Value::as_i64)
   }

   #[must_use]
   pub fn subject(&self) -> Option<&str> {
      self.payload.get("sub").and_then(Value::as_str)
   }

   #[must_use]
   pub fn get(&self, key: &str) -> Option<&Value> {
      self.payload.get(key)
   }

   #[must_use]
   pub const fn as_map(&self) -> &Map<String, Value> {
      &self.payload
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   fn jwt(payload: &str) -> String {
      let header = BASE64URL_NOPAD.encode(br#"{"alg":"HS512"}"#);
      let payload = BASE64URL_NOPAD.encode(payload.as_bytes());
      format!("{header}.{payload}.c2lnbmF0dXJl")
   }

   #[test]
   fn decode_payload() {
      let token = jwt(r#"{"sub":"nepse","iat":1718000000,"exp":1718000060}"#);
      let claims = Claims::from_token(&token).unwrap();
      assert_eq!(claims.subject(), Some("nepse"));
      assert_eq!(claims.issued_at(), Some(1_718_000_000));
      assert_eq!(claims.expires_at(), Some(1_718_000_060));
      assert!(claims.get("aud").is_none());
   }

   #[test]
   fn wrong_segment_count() {
      Claims::from_token("only.two").unwrap_err();
      Claims::from_token("a.b.c.d").unwrap_err();
   }

   #[test]
   fn scrambled_payload_fails() {
      let token = jwt(r#"{"sub":"nepse"}"#);
      let mut scrambled = token.clone();
      scrambled.insert(token.find('.').unwrap() + 3, '!');
      Claims::from_token(&scrambled).unwrap_err();
   }

   #[test]
   fn non_object_payload() {
      let token = jwt("[1,2,3]");
      assert!(matches!(Claims::from_token(&token), Err(Error::Parse(_))));
   }
}
