//! Ship binary assets inside a program as dictionary-compressed artifacts.
//!
//! `compressembed` is a build-time asset compiler. Given one input file it
//! produces two outputs:
//!
//! 1.  **Artifact:** the file's bytes, DEFLATE-compressed at maximum effort inside a
//!     zlib stream, primed with a random 32-byte preset dictionary (the *key*).
//! 2.  **Generated source:** a Rust module (or Go file) that embeds the artifact,
//!     carries the key as a base64 literal, and exposes the decompressed bytes under
//!     a name you choose.
//!
//! The key is not a secret. Without it the artifact cannot be inflated, which keeps
//! raw bytes out of casual view, but it offers no confidentiality.
//!
//! ## Usage
//!
//! 1. Add `compressembed` to your `Cargo.toml`. The `build` feature is required for
//!    build-dependencies.
//!
//! ```toml
//! [dependencies]
//! compressembed = "0.1"
//!
//! [build-dependencies]
//! compressembed = { version = "0.1", features = ["build"] }
//! ```
//!
//! 2. Compress the asset and generate its module in `build.rs`.
//!
//! ```ignore
//! // build.rs
//! let out_dir = std::path::PathBuf::from(std::env::var_os("OUT_DIR").unwrap());
//! compressembed::Config::new("assets/config.bin", "CONFIG")
//!     .package("assets")
//!     .output(out_dir.join("config.dat"))
//!     .source(out_dir.join("assets.rs"))
//!     .rerun_if_changed(true)
//!     .run()
//!     .expect("Failed to embed assets");
//! ```
//!
//! 3. Include the generated module.
//!
//! ```ignore
//! // src/main.rs
//! include!(concat!(env!("OUT_DIR"), "/assets.rs"));
//!
//! let data: &[u8] = &assets::CONFIG;
//! println!("Decompressed data is {} bytes long.", data.len());
//! ```
//!
//! The `compressembed` binary from `compressembed-cli` runs the same pipeline from
//! the command line.

#![doc(html_root_url = "https://docs.rs/compressembed/0.1.0")]

pub mod codec;
pub mod key;

pub use codec::{compress, decompress};
pub use key::{KEY_LEN, Key, KeyError};

//
// ===== RUNTIME CODE =====
//

/// Decompresses an artifact embedded by generated source.
///
/// This function is an implementation detail of the generated Rust module and is not
/// intended to be called directly by user code. Its signature is not guaranteed to be stable.
///
/// # Panics
///
/// Panics if `key` is not a valid key or `data` does not decompress with it. This
/// indicates the artifact and source were not generated by the same run.
#[doc(hidden)]
#[must_use]
pub fn decompress_embedded(data: &'static [u8], key: &str) -> Vec<u8> {
    let key = Key::from_base64(key)
        .expect("BUG: compressembed: generated source carries a malformed key.");
    codec::decompress(data, key.as_bytes()).expect(
        "BUG: compressembed: embedded artifact does not match its key. Regenerate both together.",
    )
}

//
// ===== BUILD-TIME CODE =====
//

#[cfg(feature = "build")]
mod build;
#[cfg(feature = "build")]
pub mod emit;
#[cfg(feature = "build")]
pub mod ident;
#[cfg(feature = "build")]
pub use build::{Config, DEFAULT_OUTPUT, DEFAULT_PACKAGE, Error, FUNCTION_NAME_LEN, Summary, run};
#[cfg(feature = "build")]
pub use emit::Language;

#[cfg(test)]
mod tests {
    use super::*;

    static HELLO: std::sync::LazyLock<Vec<u8>> = std::sync::LazyLock::new(|| {
        compress(b"Hello World!", Key::from_bytes([0; KEY_LEN]).as_bytes()).unwrap()
    });

    #[test]
    fn embedded_data_decompresses() {
        let key = Key::from_bytes([0; KEY_LEN]).to_base64();
        assert_eq!(decompress_embedded(&HELLO, &key), b"Hello World!");
    }

    #[test]
    #[should_panic(expected = "does not match its key")]
    fn mismatched_key_panics() {
        let key = Key::from_bytes([1; KEY_LEN]).to_base64();
        let _ = decompress_embedded(&HELLO, &key);
    }
}
