//! The asset compiler: configuration and the run pipeline.
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    codec,
    emit::{self, Emitter, Language, Source},
    ident,
    key::{Key, KeyError},
};

/// Length of generated function names.
pub const FUNCTION_NAME_LEN: usize = 6;

/// Default path of the compressed artifact.
pub const DEFAULT_OUTPUT: &str = "resource.dat";

/// Default package (or module) name of the generated source.
pub const DEFAULT_PACKAGE: &str = "main";

//
// ==================== PUBLIC BUILDER API ====================
//

/// Everything one run needs: what to compress, where to write, and how to name
/// the generated symbols.
///
/// # Example
/// ```no_run
/// // in build.rs
/// let out_dir = std::path::PathBuf::from(std::env::var_os("OUT_DIR").unwrap());
/// compressembed::Config::new("assets/blob.bin", "BLOB")
///     .output(out_dir.join("blob.dat"))
///     .source(out_dir.join("blob.rs"))
///     .package("assets")
///     .rerun_if_changed(true)
///     .run()
///     .expect("Failed to embed assets");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    input: PathBuf,
    output: PathBuf,
    source: Option<PathBuf>,
    package: String,
    function: String,
    variable: String,
    key: String,
    language: Language,
    rerun_if_changed: bool,
}

impl Config {
    /// Creates a configuration compressing `input` and exposing it as `variable`.
    ///
    /// The function name and dictionary key are freshly generated; pin them with
    /// [`Config::function`] and [`Config::key`] for reproducible output.
    pub fn new(input: impl AsRef<Path>, variable: impl Into<String>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            source: None,
            package: DEFAULT_PACKAGE.to_owned(),
            function: ident::generate(FUNCTION_NAME_LEN),
            variable: variable.into(),
            key: Key::generate().to_base64(),
            language: Language::default(),
            rerun_if_changed: false,
        }
    }

    /// Sets the path of the compressed artifact.
    #[must_use]
    pub fn output(mut self, path: impl AsRef<Path>) -> Self {
        self.output = path.as_ref().to_path_buf();
        self
    }

    /// Sets the path of the generated source. Defaults to `compressed.<ext>`.
    #[must_use]
    pub fn source(mut self, path: impl AsRef<Path>) -> Self {
        self.source = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the package (Go) or module (Rust) name of the generated source.
    #[must_use]
    pub fn package(mut self, name: impl Into<String>) -> Self {
        self.package = name.into();
        self
    }

    /// Pins the name of the generated decompression function.
    #[must_use]
    pub fn function(mut self, name: impl Into<String>) -> Self {
        self.function = name.into();
        self
    }

    /// Pins the dictionary key, as unpadded base64.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[must_use]
    pub const fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Prints `cargo:rerun-if-changed` for the input when set. Use from `build.rs`.
    #[must_use]
    pub const fn rerun_if_changed(mut self, enabled: bool) -> Self {
        self.rerun_if_changed = enabled;
        self
    }

    #[must_use]
    pub fn input_path(&self) -> &Path {
        &self.input
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// The generated source path, falling back to `compressed.<ext>`.
    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        self.source.clone().unwrap_or_else(|| {
            PathBuf::from(format!("compressed.{}", self.language.extension()))
        })
    }

    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package
    }

    #[must_use]
    pub fn function_name(&self) -> &str {
        &self.function
    }

    #[must_use]
    pub fn variable_name(&self) -> &str {
        &self.variable
    }

    /// The dictionary key as configured, unpadded base64.
    #[must_use]
    pub fn encoded_key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn target_language(&self) -> Language {
        self.language
    }

    /// Checks names and decodes the key without touching the file system.
    ///
    /// # Errors
    /// Returns [`Error::InvalidIdentifier`], [`Error::NameClash`] or [`Error::Key`].
    pub fn validate(&self) -> Result<Key> {
        let language = self.language;
        for (field, value, valid) in [
            ("variable", &self.variable, language.is_symbol(&self.variable)),
            ("package", &self.package, language.is_identifier(&self.package)),
            ("function", &self.function, language.is_symbol(&self.function)),
        ] {
            if !valid {
                return Err(Error::InvalidIdentifier {
                    field,
                    value: value.clone(),
                    language,
                });
            }
        }
        let helpers = language.helper_names(&self.function);
        if self.variable == self.function || helpers.contains(&self.variable) {
            return Err(Error::NameClash(self.variable.clone()));
        }
        Ok(Key::from_base64(&self.key)?)
    }

    /// Runs the pipeline with this configuration. See [`run`].
    ///
    /// # Errors
    /// Returns the first [`Error`] any step produces.
    pub fn run(self) -> Result<Summary> {
        run(&self)
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub input_len: usize,
    pub artifact_len: usize,
    pub output: PathBuf,
    pub source: PathBuf,
}

/// A specialized `Result` type for the asset compiler.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid {field} name '{value}': not a valid {language} identifier")]
    InvalidIdentifier {
        field: &'static str,
        value: String,
        language: Language,
    },
    #[error("variable '{0}' clashes with the generated function or its helpers")]
    NameClash(String),
    #[error("invalid dictionary key")]
    Key(#[from] KeyError),
    #[error("unknown target language '{0}' (expected 'rust' or 'go')")]
    UnknownLanguage(String),
    #[error("cannot {action} '{}'", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("compression failed")]
    Compression(#[from] codec::Error),
    #[error("compression produced an empty artifact")]
    EmptyArtifact,
    #[error("cannot parse template")]
    Template(#[from] handlebars::TemplateError),
    #[error("cannot render template")]
    Render(#[from] handlebars::RenderError),
}

impl Error {
    fn io(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}

//
// ==================== PIPELINE ====================
//

/// Validates `config`, compresses its input, and writes the artifact and the
/// generated source.
///
/// The steps run strictly in order and the first failure aborts the run. Files
/// written before the failure are left in place. Nothing is written if
/// validation fails.
///
/// # Errors
/// Returns the first [`Error`] any step produces.
pub fn run(config: &Config) -> Result<Summary> {
    let key = config.validate()?;
    let source_path = config.source_path();
    debug!(
        function = %config.function,
        variable = %config.variable,
        package = %config.package,
        language = %config.language,
        "configuration validated"
    );

    if config.rerun_if_changed {
        println!("cargo:rerun-if-changed={}", config.input.display());
    }
    let data = fs::read(&config.input).map_err(Error::io("read input", &config.input))?;

    let compressed = codec::compress(&data, key.as_bytes())?;
    if compressed.is_empty() {
        return Err(Error::EmptyArtifact);
    }
    info!(
        input = %config.input.display(),
        input_len = data.len(),
        artifact_len = compressed.len(),
        "compressed input"
    );

    fs::write(&config.output, &compressed).map_err(Error::io("write artifact", &config.output))?;
    info!(path = %config.output.display(), "wrote artifact");

    let emitter = Emitter::new(config.language)?;
    let (artifact, fallback) =
        emit::artifact_reference(config.language, &source_path, &config.output)
            .map_err(Error::io("resolve artifact path", &config.output))?;
    if fallback {
        warn!(
            artifact = %artifact,
            source = %source_path.display(),
            "artifact is not below the generated source's directory"
        );
    }
    let text = emitter.render(&Source {
        package: &config.package,
        function: &config.function,
        variable: &config.variable,
        key: &config.key,
        artifact: &artifact,
    })?;

    fs::write(&source_path, text).map_err(Error::io("write source", &source_path))?;
    info!(path = %source_path.display(), "wrote generated source");

    Ok(Summary {
        input_len: data.len(),
        artifact_len: compressed.len(),
        output: config.output.clone(),
        source: source_path,
    })
}
