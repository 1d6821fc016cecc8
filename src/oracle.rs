//! The five opaque salt-to-index transforms.

use std::{
   fmt,
   sync::Arc,
};

use crate::error::Error;

/// One of the five transforms exported by the NEPSE token module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
   Cdx,
   Rdx,
   Bdx,
   Ndx,
   Mdx,
}

impl Transform {
   /// All transforms, in the order their cut indices appear in a token.
   pub const ALL: [Self; 5] = [Self::Cdx, Self::Rdx, Self::Bdx, Self::Ndx, Self::Mdx];

   /// Name of the function exported by the module.
   #[must_use]
   pub const fn export_name(self) -> &'static str {
      match self {
         Self::Cdx => "cdx",
         Self::Rdx => "rdx",
         Self::Bdx => "bdx",
         Self::Ndx => "ndx",
         Self::Mdx => "mdx",
      }
   }

   /// Position of this transform in [`ALL`](Self::ALL).
   #[must_use]
   pub const fn position(self) -> usize {
      self as usize
   }
}

impl fmt::Display for Transform {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(self.export_name())
   }
}

/// Source of cut indices.
///
/// Each transform maps five salts to one index. A return value of `0` is a
/// real index, not a failure; failures are reported through `Err`.
pub trait Oracle {
   fn call(&self, transform: Transform, args: [i32; 5]) -> Result<i32, Error>;
}

impl<O: Oracle + ?Sized> Oracle for &O {
   fn call(&self, transform: Transform, args: [i32; 5]) -> Result<i32, Error> {
      (**self).call(transform, args)
   }
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
   fn call(&self, transform: Transform, args: [i32; 5]) -> Result<i32, Error> {
      (**self).call(transform, args)
   }
}

impl<O: Oracle + ?Sized> Oracle for Arc<O> {
   fn call(&self, transform: Transform, args: [i32; 5]) -> Result<i32, Error> {
      (**self).call(transform, args)
   }
}
