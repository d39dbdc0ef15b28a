//! `compressembed`: compress one file and generate the source that embeds it.
//!
//! ```bash
//! compressembed --in logo.png --var LOGO --pkg assets --src assets.rs
//! compressembed --in config.json --var config --lang go --out config.dat
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use compressembed::{Config, DEFAULT_OUTPUT, DEFAULT_PACKAGE, Language};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "compressembed", version)]
#[command(about = "Compress a file with a preset DEFLATE dictionary and generate source that embeds it")]
struct Cli {
    /// Input file
    #[arg(long = "in", value_name = "PATH")]
    input: PathBuf,

    /// Compressed output file
    #[arg(long = "out", value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Source file to create [default: compressed.<ext>]
    #[arg(long = "src", value_name = "PATH")]
    source: Option<PathBuf>,

    /// Package (Go) or module (Rust) name of the generated source
    #[arg(long = "pkg", default_value = DEFAULT_PACKAGE)]
    package: String,

    /// Name the decompressed resource is exposed under
    #[arg(long = "var")]
    variable: String,

    /// Language of the generated source (rust, go)
    #[arg(long = "lang", default_value = "rust")]
    language: Language,

    /// Pin the dictionary key (unpadded base64) instead of generating one
    #[arg(long, value_name = "BASE64")]
    key: Option<String>,

    /// Pin the generated function name instead of generating one
    #[arg(long = "func", value_name = "NAME")]
    function: Option<String>,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.input, self.variable)
            .output(self.output)
            .package(self.package)
            .language(self.language);
        if let Some(source) = self.source {
            config = config.source(source);
        }
        if let Some(key) = self.key {
            config = config.key(key);
        }
        if let Some(function) = self.function {
            config = config.function(function);
        }
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_config();
    let input = config.input_path().display().to_string();
    let summary =
        compressembed::run(&config).with_context(|| format!("failed to embed '{input}'"))?;

    tracing::info!(
        input_len = summary.input_len,
        artifact_len = summary.artifact_len,
        artifact = %summary.output.display(),
        source = %summary.source.display(),
        "done"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::try_parse_from([
            "compressembed",
            "--in",
            "data.bin",
            "--var",
            "payload",
            "--pkg",
            "demo",
            "--lang",
            "go",
            "--func",
            "unpack",
        ])
        .unwrap();
        let config = cli.into_config();
        assert_eq!(config.input_path(), std::path::Path::new("data.bin"));
        assert_eq!(config.output_path(), std::path::Path::new(DEFAULT_OUTPUT));
        assert_eq!(config.source_path(), PathBuf::from("compressed.go"));
        assert_eq!(config.package_name(), "demo");
        assert_eq!(config.function_name(), "unpack");
        assert_eq!(config.variable_name(), "payload");
    }

    #[test]
    fn input_and_variable_are_required() {
        assert!(Cli::try_parse_from(["compressembed", "--var", "payload"]).is_err());
        assert!(Cli::try_parse_from(["compressembed", "--in", "data.bin"]).is_err());
    }

    #[test]
    fn unknown_language_is_rejected() {
        let result =
            Cli::try_parse_from(["compressembed", "--in", "a", "--var", "b", "--lang", "cobol"]);
        assert!(result.is_err());
    }
}
