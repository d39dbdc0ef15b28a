//! Dictionary-seeded DEFLATE, wrapped in a zlib stream.
//!
//! The compressor is primed with a preset dictionary, and the zlib header records
//! the dictionary's Adler-32 checksum. Inflating therefore needs the exact same
//! dictionary bytes. This is light obfuscation, not encryption.
use std::io::Write;

use flate2::{Compress, Compression, Decompress, FlushDecompress, Status, write::ZlibEncoder};

/// Growth step for the decompression buffer.
const CHUNK: usize = 16 * 1024;

/// A specialized `Result` type for compression operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error produced by [`compress`] or [`decompress`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("preset dictionary is empty")]
    EmptyDictionary,
    #[error("compressor rejected the preset dictionary")]
    Dictionary(#[source] flate2::CompressError),
    #[error("I/O error while compressing")]
    Io(#[from] std::io::Error),
    #[error("stream was compressed with a preset dictionary but none was supplied")]
    MissingDictionary,
    #[error("preset dictionary does not match the stream (expected Adler-32 {expected:#010x})")]
    DictionaryMismatch { expected: u32 },
    #[error("corrupt compressed stream")]
    Corrupt(#[source] flate2::DecompressError),
    #[error("compressed stream ended unexpectedly")]
    Truncated,
}

/// Compresses `payload` at maximum effort using `key` as the preset dictionary.
///
/// The output is deterministic for a given payload, key and backend version.
///
/// # Errors
/// Returns [`Error::EmptyDictionary`] for an empty `key`, or [`Error::Dictionary`]
/// if the compressor cannot be primed with it.
pub fn compress(payload: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(Error::EmptyDictionary);
    }

    let mut deflater = Compress::new(Compression::best(), true);
    deflater.set_dictionary(key).map_err(Error::Dictionary)?;

    let buffer = Vec::with_capacity(payload.len() / 2 + 64);
    let mut encoder = ZlibEncoder::new_with_compress(buffer, deflater);
    encoder.write_all(payload)?;
    Ok(encoder.finish()?)
}

/// Inverts [`compress`]. `key` must be byte-identical to the compression key.
///
/// # Errors
/// A wrong key yields [`Error::DictionaryMismatch`]; malformed input yields
/// [`Error::Corrupt`] or [`Error::Truncated`].
pub fn decompress(payload: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(payload.len().saturating_mul(4).max(CHUNK));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.len().max(CHUNK));
        }

        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();
        match inflater.decompress_vec(&payload[consumed..], &mut out, FlushDecompress::None) {
            Ok(Status::StreamEnd) => return Ok(out),
            Ok(Status::Ok | Status::BufError) => {
                // There is always spare output room here, so no progress means no input.
                if inflater.total_in() as usize == consumed && inflater.total_out() == produced {
                    return Err(Error::Truncated);
                }
            }
            Err(err) => match err.needs_dictionary() {
                Some(_) if key.is_empty() => return Err(Error::MissingDictionary),
                Some(expected) => {
                    inflater
                        .set_dictionary(key)
                        .map_err(|_| Error::DictionaryMismatch { expected })?;
                }
                None => return Err(Error::Corrupt(err)),
            },
        }
    }
}
