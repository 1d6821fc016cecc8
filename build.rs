use std::{
   env,
   fs,
   path::PathBuf,
};

const MODULE_ENV: &str = "NEPSE_BUNDLE_MODULE";
const DEFAULT_MODULE: &str = "assets/nepse.wasm";

fn main() {
   println!("cargo:rerun-if-env-changed={MODULE_ENV}");
   println!("cargo:rerun-if-changed=assets");

   let out = PathBuf::from(env::var_os("OUT_DIR").expect("cargo sets OUT_DIR")).join("nepse.wasm");
   let manifest_dir =
      PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR"));

   // Relative paths resolve against the package root, not the caller's cwd.
   let source = env::var_os(MODULE_ENV)
      .filter(|path| !path.is_empty())
      .map(|path| manifest_dir.join(path))
      .or_else(|| {
         let path = manifest_dir.join(DEFAULT_MODULE);
         path.is_file().then_some(path)
      });

   match source {
      Some(path) => {
         println!("cargo:rerun-if-changed={}", path.display());
         fs::copy(&path, &out)
            .unwrap_or_else(|err| panic!("failed to bundle {}: {err}", path.display()));
      },
      // An empty artifact makes `WasmOracle::bundled()` report a missing module.
      None => fs::write(&out, b"").expect("failed to write empty module placeholder"),
   }
}
