//! Prints a descrambled NEPSE access token.

use std::{
   path::PathBuf,
   process::ExitCode,
};

use clap::Parser;
use nepse_auth::{
   Authenticator,
   Claims,
   Error,
   PROVE_URL,
   WasmOracle,
};
use tracing::{
   error,
   info,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nepse-token", version, about = "Fetch and descramble a NEPSE access token")]
struct Cli {
   /// Transform module to load instead of the bundled one.
   #[arg(long, env = "NEPSE_WASM_MODULE")]
   module: Option<PathBuf>,

   /// Authentication endpoint.
   #[arg(long, default_value = PROVE_URL)]
   url: String,

   /// Also print the refresh token.
   #[arg(long)]
   refresh: bool,

   /// Print the access token's claims as JSON.
   #[arg(long)]
   claims: bool,
}

fn main() -> ExitCode {
   tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
      .with_writer(std::io::stderr)
      .init();

   let cli = Cli::parse();

   // Without the module nothing else can work.
   let oracle = match cli.module.as_deref() {
      Some(path) => WasmOracle::from_file(path),
      None => WasmOracle::bundled(),
   };
   let oracle = match oracle {
      Ok(oracle) => oracle,
      Err(err) => {
         error!(%err, "cannot load transform module");
         return ExitCode::FAILURE;
      },
   };
   info!(fingerprint = oracle.fingerprint(), "transform module ready");

   match run(&cli, &oracle) {
      Ok(()) => ExitCode::SUCCESS,
      Err(err) => {
         error!(%err, "authentication failed");
         ExitCode::FAILURE
      },
   }
}

fn run(cli: &Cli, oracle: &WasmOracle) -> Result<(), Error> {
   let record = Authenticator::with_url(cli.url.as_str()).authenticate()?;
   let access = record.parse_access_token(oracle)?;
   println!("{access}");

   if cli.refresh {
      println!("{}", record.parse_refresh_token(oracle)?);
   }

   if cli.claims {
      let claims = Claims::from_token(&access)?;
      println!("{}", serde_json::to_string_pretty(claims.as_map())?);
   }

   Ok(())
}
