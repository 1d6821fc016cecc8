//! Token descrambling.
//!
//! NEPSE hides its real tokens by inserting one filler character at five
//! positions. The positions come from feeding the response salts through the
//! five transforms, each with its own argument order:
//!
//! ```text
//! token[..i1] + token[i1+1..i2] + token[i2+1..i3] + token[i3+1..i4] + token[i4+1..i5] + token[i5+1..]
//! ```

use tracing::debug;

use crate::{
   error::Error,
   oracle::{
      Oracle,
      Transform,
   },
};

/// `salt1` through `salt5`, in response order.
pub type Salts = [i32; 5];

/// Cut indices `i1` through `i5`, as returned by the transforms.
pub type CutIndices = [i32; 5];

/// Argument order for each transform, as zero-based positions into [`Salts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permutation([[usize; 5]; 5]);

impl Permutation {
   /// Salt order used for the access token.
   pub const ACCESS: Self = Self([
      [0, 1, 2, 3, 4],
      [0, 1, 3, 2, 4],
      [0, 1, 3, 2, 4],
      [0, 1, 3, 2, 4],
      [0, 1, 3, 2, 4],
   ]);
   /// Salt order used for the refresh token.
   pub const REFRESH: Self = Self([
      [1, 0, 2, 4, 3],
      [1, 0, 2, 3, 4],
      [1, 0, 3, 2, 4],
      [1, 0, 3, 2, 4],
      [1, 0, 3, 2, 4],
   ]);

   /// Builds a permutation from per-transform salt positions.
   ///
   /// Returns `None` if any row is not a permutation of `0..5`.
   #[must_use]
   pub fn new(orders: [[usize; 5]; 5]) -> Option<Self> {
      let valid = orders.iter().all(|order| {
         let mut seen = [false; 5];
         order.iter().all(|&pos| {
            pos < 5 && !std::mem::replace(&mut seen[pos], true)
         })
      });
      valid.then_some(Self(orders))
   }

   /// Arranges `salts` in the order `transform` expects them.
   #[must_use]
   pub fn arguments(&self, transform: Transform, salts: Salts) -> [i32; 5] {
      self.0[transform.position()].map(|pos| salts[pos])
   }
}

/// Runs the five transforms in order and collects their cut indices.
///
/// Stops at the first failing transform.
pub fn cut_indices<O: Oracle + ?Sized>(
   oracle: &O,
   salts: Salts,
   permutation: &Permutation,
) -> Result<CutIndices, Error> {
   let mut cuts = [0; 5];
   for transform in Transform::ALL {
      cuts[transform.position()] = oracle.call(transform, permutation.arguments(transform, salts))?;
   }
   debug!(?cuts, "computed cut indices");
   Ok(cuts)
}

/// Removes the character at each cut index and joins the six fragments.
///
/// Cuts must satisfy `0 <= i1 < i2 < i3 < i4 < i5 < token.len()` and each
/// must land on a single-byte character. Anything else is a
/// [`Error::CutRange`]; nothing is clamped.
pub fn excise(token: &str, cuts: CutIndices) -> Result<String, Error> {
   let range_error = || Error::CutRange {
      cuts,
      len: token.len(),
   };

   let mut out = String::with_capacity(token.len().saturating_sub(cuts.len()));
   let mut start = 0_usize;

   for cut in cuts {
      let cut = usize::try_from(cut).map_err(|_| range_error())?;
      if cut < start {
         return Err(range_error());
      }
      let fragment = token.get(start..cut).ok_or_else(range_error)?;
      let next = cut + 1;
      if !token.is_char_boundary(next) {
         return Err(range_error());
      }
      out.push_str(fragment);
      start = next;
   }

   out.push_str(token.get(start..).ok_or_else(range_error)?);
   Ok(out)
}

/// Descrambles `token` with the cut indices derived from `salts`.
pub fn descramble<O: Oracle + ?Sized>(
   oracle: &O,
   token: &str,
   salts: Salts,
   permutation: &Permutation,
) -> Result<String, Error> {
   let cuts = cut_indices(oracle, salts, permutation)?;
   excise(token, cuts)
}
