//! WebAssembly-backed [`Oracle`].
//!
//! NEPSE ships the transforms as a small WebAssembly module exporting `cdx`,
//! `rdx`, `bdx`, `ndx` and `mdx`, each `(i32, i32, i32, i32, i32) -> i32`.
//! The module takes no imports.

use std::{
   fs,
   path::Path,
   sync::Mutex,
};

use data_encoding::HEXLOWER;
use hmac_sha256::Hash;
use tracing::debug;
use wasmtime::{
   Engine,
   Instance,
   Module,
   Store,
   TypedFunc,
};

use crate::{
   error::Error,
   oracle::{
      Oracle,
      Transform,
   },
};

/// Module embedded by the build script; empty when none was provided.
static BUNDLED: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/nepse.wasm"));

type TransformFn = TypedFunc<(i32, i32, i32, i32, i32), i32>;

struct Loaded {
   store:      Store<()>,
   transforms: [TransformFn; 5],
}

/// Transforms executed by wasmtime.
///
/// Load once at startup and share; calls are serialized through an internal
/// lock, so the oracle is `Send + Sync`.
pub struct WasmOracle {
   loaded:      Mutex<Loaded>,
   fingerprint: String,
}

impl WasmOracle {
   /// Loads the module embedded at build time.
   ///
   /// The build script embeds `$NEPSE_BUNDLE_MODULE`, or `assets/nepse.wasm`
   /// when the variable is unset.
   pub fn bundled() -> Result<Self, Error> {
      if BUNDLED.is_empty() {
         return Err(Error::ModuleMissing);
      }
      Self::from_bytes(BUNDLED)
   }

   /// Reads and loads a module from disk.
   pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
      let bytes = fs::read(path.as_ref())?;
      Self::from_bytes(&bytes)
   }

   /// Compiles and instantiates a module from binary or text format.
   pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
      let engine = Engine::default();
      let module =
         Module::new(&engine, bytes).map_err(|err| Error::ModuleLoad(format!("{err:#}")))?;

      let mut store = Store::new(&engine, ());
      let instance = Instance::new(&mut store, &module, &[])
         .map_err(|err| Error::ModuleLoad(format!("{err:#}")))?;

      let transforms = [
         Self::resolve(&instance, &mut store, Transform::Cdx)?,
         Self::resolve(&instance, &mut store, Transform::Rdx)?,
         Self::resolve(&instance, &mut store, Transform::Bdx)?,
         Self::resolve(&instance, &mut store, Transform::Ndx)?,
         Self::resolve(&instance, &mut store, Transform::Mdx)?,
      ];

      let fingerprint = HEXLOWER.encode(&Hash::hash(bytes));
      debug!(%fingerprint, size = bytes.len(), "loaded transform module");

      Ok(Self {
         loaded: Mutex::new(Loaded { store, transforms }),
         fingerprint,
      })
   }

   /// Hex SHA-256 of the module bytes.
   ///
   /// NEPSE rotates the module occasionally; this identifies which one is
   /// loaded.
   #[must_use]
   pub fn fingerprint(&self) -> &str {
      &self.fingerprint
   }

   fn resolve(
      instance: &Instance,
      store: &mut Store<()>,
      transform: Transform,
   ) -> Result<TransformFn, Error> {
      let name = transform.export_name();
      if instance.get_func(&mut *store, name).is_none() {
         return Err(Error::MissingExport(name));
      }
      instance
         .get_typed_func(&mut *store, name)
         .map_err(|err| Error::ModuleLoad(format!("export `{name}`: {err:#}")))
   }
}

impl Oracle for WasmOracle {
   fn call(&self, transform: Transform, args: [i32; 5]) -> Result<i32, Error> {
      let mut guard = self.loaded.lock().map_err(|_| Error::Poisoned)?;
      let loaded = &mut *guard;

      let [a, b, c, d, e] = args;
      loaded.transforms[transform.position()]
         .call(&mut loaded.store, (a, b, c, d, e))
         .map_err(|err| Error::Transform {
            transform,
            message: format!("{err:#}"),
         })
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::descramble::{
      Permutation,
      descramble,
   };

   /// Each transform returns one of its arguments: `cdx` the first, `mdx`
   /// the last.
   const PASSTHROUGH: &str = r#"
      (module
         (func (export "cdx") (param i32 i32 i32 i32 i32) (result i32) local.get 0)
         (func (export "rdx") (param i32 i32 i32 i32 i32) (result i32) local.get 1)
         (func (export "bdx") (param i32 i32 i32 i32 i32) (result i32) local.get 2)
         (func (export "ndx") (param i32 i32 i32 i32 i32) (result i32) local.get 3)
         (func (export "mdx") (param i32 i32 i32 i32 i32) (result i32) local.get 4))
   "#;

   #[test]
   fn calls_reach_the_right_export() {
      let oracle = WasmOracle::from_bytes(PASSTHROUGH.as_bytes()).unwrap();
      let args = [10, 20, 30, 40, 50];
      for (idx, transform) in Transform::ALL.into_iter().enumerate() {
         assert_eq!(oracle.call(transform, args).unwrap(), args[idx]);
      }
   }

   #[test]
   fn descramble_through_module() {
      let oracle = WasmOracle::from_bytes(PASSTHROUGH.as_bytes()).unwrap();
      // Access order passes salt4 before salt3 to every transform but cdx.
      let salts = [3, 7, 15, 11, 19];
      let plain = descramble(
         &oracle,
         "abcXdefYghiZjklWmnoVpqr",
         salts,
         &Permutation::ACCESS,
      )
      .unwrap();
      assert_eq!(plain, "abcdefghijklmnopqr");
   }

   #[test]
   fn zero_is_an_index() {
      let oracle = WasmOracle::from_bytes(PASSTHROUGH.as_bytes()).unwrap();
      assert_eq!(oracle.call(Transform::Cdx, [0, 1, 2, 3, 4]).unwrap(), 0);
   }

   #[test]
   fn fingerprint_is_stable() {
      let first = WasmOracle::from_bytes(PASSTHROUGH.as_bytes()).unwrap();
      let second = WasmOracle::from_bytes(PASSTHROUGH.as_bytes()).unwrap();
      assert_eq!(first.fingerprint(), second.fingerprint());
      assert_eq!(first.fingerprint().len(), 64);
   }

   #[test]
   fn missing_export() {
      let wat = r#"
         (module
            (func (export "cdx") (param i32 i32 i32 i32 i32) (result i32) i32.const 0)
            (func (export "rdx") (param i32 i32 i32 i32 i32) (result i32) i32.const 0)
            (func (export "bdx") (param i32 i32 i32 i32 i32) (result i32) i32.const 0)
            (func (export "ndx") (param i32 i32 i32 i32 i32) (result i32) i32.const 0))
      "#;
      let Err(err) = WasmOracle::from_bytes(wat.as_bytes()) else {
         panic!("module without mdx loaded");
      };
      assert!(matches!(err, Error::MissingExport("mdx")));
   }

   #[test]
   fn wrong_signature() {
      let wat = r#"
         (module
            (func (export "cdx") (param i32) (result i32) local.get 0)
            (func (export "rdx") (param i32 i32 i32 i32 i32) (result i32) i32.const 0)
            (func (export "bdx") (param i32 i32 i32 i32 i32) (result i32) i32.const 0)
            (func (export "ndx") (param i32 i32 i32 i32 i32) (result i32) i32.const 0)
            (func (export "mdx") (param i32 i32 i32 i32 i32) (result i32) i32.const 0))
      "#;
      let Err(err) = WasmOracle::from_bytes(wat.as_bytes()) else {
         panic!("mistyped cdx loaded");
      };
      assert!(matches!(err, Error::ModuleLoad(_)));
   }

   #[test]
   fn invalid_module() {
      let Err(err) = WasmOracle::from_bytes(b"\0asm garbage") else {
         panic!("garbage loaded");
      };
      assert!(matches!(err, Error::ModuleLoad(_)));
   }

   #[test]
   fn trap_is_transform_error() {
      let wat = r#"
         (module
            (func (export "cdx") (param i32 i32 i32 i32 i32) (result i32) i32.const 0)
            (func (export "rdx") (param i32 i32 i32 i32 i32) (result i32) unreachable)
            (func (export "bdx") (param i32 i32 i32 i32 i32) (result i32) i32.const 0)
            (func (export "ndx") (param i32 i32 i32 i32 i32) (result i32) i32.const 0)
            (func (export "mdx") (param i32 i32 i32 i32 i32) (result i32) i32.const 0))
      "#;
      let oracle = WasmOracle::from_bytes(wat.as_bytes()).unwrap();
      let err = oracle.call(Transform::Rdx, [0; 5]).unwrap_err();
      assert!(matches!(err, Error::Transform {
         transform: Transform::Rdx,
         ..
      }));
   }

   #[test]
   fn bundled_module() {
      match WasmOracle::bundled() {
         Ok(oracle) => {
            assert!(!BUNDLED.is_empty());
            assert_eq!(oracle.fingerprint().len(), 64);
            assert!(oracle.fingerprint().bytes().all(|byte| byte.is_ascii_hexdigit()));
         },
         Err(err) => {
            assert!(BUNDLED.is_empty());
            assert!(matches!(err, Error::ModuleMissing));
         },
      }
   }

   #[test]
   fn missing_file() {
      let Err(err) = WasmOracle::from_file("/nonexistent/nepse.wasm") else {
         panic!("loaded a missing file");
      };
      assert!(matches!(err, Error::Io(_)));
   }
}
