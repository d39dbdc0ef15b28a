//! Source generation for the consuming project.
//!
//! Each target [`Language`] owns a fixed handlebars template. Rendering is strict:
//! a template that references a field the emitter does not supply is an error,
//! never silently blank output.
use std::{
    fmt, io,
    path::{Component, Path},
    str::FromStr,
};

use handlebars::Handlebars;
use serde::Serialize;

use crate::{
    build::{Error, Result},
    ident,
};

/// Reserved in edition 2024 but still parsed as identifiers by syn.
const RUST_RESERVED: [&str; 1] = ["gen"];

/// Imports of the Go template and the predeclared names it calls.
const GO_TEMPLATE_NAMES: [&str; 6] = ["bytes", "zlib", "base64", "io", "byte", "panic"];

const GO_KEYWORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// The language of the generated source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// A `pub mod` that reads the artifact with `include_bytes!` and decompresses
    /// it through [`decompress_embedded`](crate::decompress_embedded).
    #[default]
    Rust,
    /// A Go file that embeds the artifact with `//go:embed` and inflates it with
    /// `compress/zlib`.
    Go,
}

impl Language {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Go => "go",
        }
    }

    /// File extension of generated sources, used for the default source path.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Rust => "rs",
            Self::Go => "go",
        }
    }

    const fn template(self) -> &'static str {
        match self {
            Self::Rust => include_str!("../templates/rust.hbs"),
            Self::Go => include_str!("../templates/go.hbs"),
        }
    }

    /// Returns `true` if `s` can name a symbol in this language.
    ///
    /// On top of [`ident::is_identifier`], keywords and the bare `_` are rejected.
    #[must_use]
    pub fn is_identifier(self, s: &str) -> bool {
        if !ident::is_identifier(s) {
            return false;
        }
        match self {
            // syn's parser refuses keywords and `_`.
            Self::Rust => {
                !RUST_RESERVED.contains(&s) && syn::parse_str::<syn::Ident>(s).is_ok()
            }
            Self::Go => s != "_" && !GO_KEYWORDS.contains(&s),
        }
    }

    /// Returns `true` if `s` can name a symbol the generated source declares.
    ///
    /// Go symbols live in the package block, so they must not shadow the template's
    /// imports or the builtins it calls.
    #[must_use]
    pub fn is_symbol(self, s: &str) -> bool {
        self.is_identifier(s)
            && match self {
                Self::Rust => true,
                Self::Go => !GO_TEMPLATE_NAMES.contains(&s),
            }
    }

    /// Names the template derives from the generated function name.
    #[must_use]
    pub fn helper_names(self, function: &str) -> [String; 2] {
        match self {
            Self::Rust => [format!("{function}_DATA"), format!("{function}_KEY")],
            Self::Go => [format!("{function}Data"), format!("{function}Key")],
        }
    }

    /// Go only embeds files below the package directory; Rust takes any path.
    const fn allows_absolute_paths(self) -> bool {
        matches!(self, Self::Rust)
    }

    fn quote_path(self, artifact: &str) -> String {
        match self {
            Self::Rust => format!("{artifact:?}"),
            Self::Go if artifact.contains(char::is_whitespace) => format!("`{artifact}`"),
            Self::Go => artifact.to_owned(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "go" | "golang" => Ok(Self::Go),
            _ => Err(Error::UnknownLanguage(s.to_owned())),
        }
    }
}

/// The values a template is rendered against.
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    pub package: &'a str,
    pub function: &'a str,
    pub variable: &'a str,
    /// The dictionary key, unpadded base64.
    pub key: &'a str,
    /// Path of the artifact as the generated source should reference it.
    pub artifact: &'a str,
}

#[derive(Serialize)]
struct TemplateData<'a> {
    package: &'a str,
    function: &'a str,
    variable: &'a str,
    key: &'a str,
    artifact: String,
    generator: &'static str,
}

/// Renders generated sources for one [`Language`].
pub struct Emitter {
    registry: Handlebars<'static>,
    language: Language,
}

impl Emitter {
    /// Parses the template for `language`.
    ///
    /// # Errors
    /// Returns [`Error::Template`] if the template does not parse.
    pub fn new(language: Language) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_template_string(language.name(), language.template())?;
        Ok(Self { registry, language })
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Renders the generated source text.
    ///
    /// # Errors
    /// Returns [`Error::Render`] if rendering fails.
    pub fn render(&self, source: &Source<'_>) -> Result<String> {
        let data = TemplateData {
            package: source.package,
            function: source.function,
            variable: source.variable,
            key: source.key,
            artifact: self.language.quote_path(source.artifact),
            generator: env!("CARGO_PKG_VERSION"),
        };
        Ok(self.registry.render(self.language.name(), &data)?)
    }
}

/// Computes how a source file at `source` should refer to the file at `artifact`.
///
/// Artifacts below the source's directory are referenced relatively with `/`
/// separators. Anything else becomes an absolute path for Rust, or the artifact
/// path unchanged for Go. The second value reports whether that fallback was taken.
///
/// # Errors
/// Fails if the current directory is needed to absolutize a path and cannot be read.
pub fn artifact_reference(
    language: Language,
    source: &Path,
    artifact: &Path,
) -> io::Result<(String, bool)> {
    let source = std::path::absolute(source)?;
    let target = std::path::absolute(artifact)?;
    let base = source.parent().unwrap_or_else(|| Path::new(""));

    if let Ok(relative) = target.strip_prefix(base) {
        let joined = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                Component::ParentDir => Some("..".into()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        return Ok((joined, false));
    }

    let fallback = if language.allows_absolute_paths() {
        target.to_string_lossy().into_owned()
    } else {
        artifact.to_string_lossy().replace('\\', "/")
    };
    Ok((fallback, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source<'a>(package: &'a str, artifact: &'a str) -> Source<'a> {
        Source {
            package,
            function: "xQ3_ab",
            variable: "payload",
            key: "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
            artifact,
        }
    }

    #[test]
    fn templates_parse() {
        assert!(Emitter::new(Language::Rust).is_ok());
        assert!(Emitter::new(Language::Go).is_ok());
    }

    #[test]
    fn rust_output_embeds_everything() {
        let text = Emitter::new(Language::Rust)
            .unwrap()
            .render(&source("demo", "out.bin"))
            .unwrap();
        assert!(text.contains("pub mod demo {"));
        assert!(text.contains(r#"include_bytes!("out.bin")"#));
        assert!(text.contains("pub static payload:"));
        assert!(text.contains("fn xQ3_ab() -> ::std::vec::Vec<u8>"));
        assert!(text.contains(r#""AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA""#));
        assert!(text.contains("::compressembed::decompress_embedded(xQ3_ab_DATA, xQ3_ab_KEY)"));
    }

    #[test]
    fn go_output_embeds_everything() {
        let text = Emitter::new(Language::Go)
            .unwrap()
            .render(&source("demo", "out.bin"))
            .unwrap();
        assert!(text.contains("package demo\n"));
        assert!(text.contains("//go:embed out.bin\n"));
        assert!(text.contains("var payload = xQ3_ab()"));
        assert!(text.contains("zlib.NewReaderDict"));
    }

    #[test]
    fn paths_are_quoted_per_language() {
        let rust = Emitter::new(Language::Rust).unwrap();
        let text = rust.render(&source("demo", r#"odd "name".bin"#)).unwrap();
        assert!(text.contains(r#"include_bytes!("odd \"name\".bin")"#));

        let go = Emitter::new(Language::Go).unwrap();
        let text = go.render(&source("demo", "with space.bin")).unwrap();
        assert!(text.contains("//go:embed `with space.bin`"));
    }

    #[test]
    fn html_is_not_escaped() {
        let text = Emitter::new(Language::Rust)
            .unwrap()
            .render(&source("demo", "a&b.bin"))
            .unwrap();
        assert!(text.contains(r#"include_bytes!("a&b.bin")"#));
    }

    #[test]
    fn keywords_are_not_identifiers() {
        assert!(!Language::Rust.is_identifier("fn"));
        assert!(!Language::Rust.is_identifier("_"));
        assert!(Language::Rust.is_identifier("func"));
        assert!(!Language::Go.is_identifier("func"));
        assert!(!Language::Go.is_identifier("_"));
        assert!(Language::Go.is_identifier("fn"));
        assert!(!Language::Go.is_identifier("1bad"));
    }

    #[test]
    fn reserved_rust_words_are_not_identifiers() {
        assert!(!Language::Rust.is_identifier("gen"));
        assert!(Language::Rust.is_identifier("generate"));
        assert!(Language::Go.is_identifier("gen"));
    }

    #[test]
    fn go_symbols_avoid_template_names() {
        for name in ["bytes", "zlib", "base64", "io", "byte", "panic"] {
            assert!(Language::Go.is_identifier(name), "{name}");
            assert!(!Language::Go.is_symbol(name), "{name}");
            assert!(Language::Rust.is_symbol(name), "{name}");
        }
        assert!(Language::Go.is_symbol("payload"));
    }

    #[test]
    fn helper_names_follow_templates() {
        let text = Emitter::new(Language::Go)
            .unwrap()
            .render(&source("demo", "out.bin"))
            .unwrap();
        for helper in Language::Go.helper_names("xQ3_ab") {
            assert!(text.contains(&format!("{helper} ")), "{helper}");
        }

        let text = Emitter::new(Language::Rust)
            .unwrap()
            .render(&source("demo", "out.bin"))
            .unwrap();
        for helper in Language::Rust.helper_names("xQ3_ab") {
            assert!(text.contains(&format!("{helper}:")), "{helper}");
        }
    }

    #[test]
    fn parses_language_names() {
        assert_eq!("Rust".parse::<Language>().unwrap(), Language::Rust);
        assert_eq!("go".parse::<Language>().unwrap(), Language::Go);
        assert!(matches!("cobol".parse::<Language>(), Err(Error::UnknownLanguage(_))));
    }

    #[test]
    fn sibling_artifacts_are_relative() {
        let (reference, fallback) =
            artifact_reference(Language::Go, Path::new("gen/out.go"), Path::new("gen/res/out.bin"))
                .unwrap();
        assert_eq!(reference, "res/out.bin");
        assert!(!fallback);

        let (reference, _) =
            artifact_reference(Language::Rust, Path::new("out.rs"), Path::new("out.bin")).unwrap();
        assert_eq!(reference, "out.bin");
    }

    #[test]
    fn outside_artifacts_fall_back() {
        let (reference, fallback) =
            artifact_reference(Language::Rust, Path::new("gen/out.rs"), Path::new("out.bin"))
                .unwrap();
        assert!(fallback);
        assert!(Path::new(&reference).is_absolute());

        let (reference, fallback) =
            artifact_reference(Language::Go, Path::new("gen/out.go"), Path::new("out.bin"))
                .unwrap();
        assert!(fallback);
        assert_eq!(reference, "out.bin");
    }
}
