//! Text normalization for exported chat logs.
//!
//! QQ exports come from several client versions and land on disk as UTF-8,
//! UTF-8 with a signature, UTF-16 with a BOM, or legacy GBK. [`decode`]
//! resolves all of them to a `String`:
//!
//! 1. a UTF-8 or UTF-16 byte-order mark selects that encoding (strictly),
//! 2. otherwise strict UTF-8 is attempted,
//! 3. otherwise the bytes are read as GBK with malformed sequences replaced.
//!
//! The GBK tier never fails, so a log without a BOM always decodes.
//!
//! # Example
//!
//! ```
//! use checkin::encoding::{decode, normalize_line_endings};
//!
//! let text = decode(b"\xEF\xBB\xBF2024-1-1 8:00:00 A(1)\r\nhi\r\n")?;
//! assert_eq!(normalize_line_endings(&text), "2024-1-1 8:00:00 A(1)\nhi\n");
//! # Ok::<(), checkin::CheckinError>(())
//! ```

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, GBK, UTF_8};
use tracing::{debug, warn};

use crate::error::{CheckinError, Result};

/// Decodes raw log bytes into text.
///
/// Fails with [`CheckinError::Encoding`] only when a byte-order mark
/// announces an encoding the payload does not actually follow.
pub fn decode(bytes: &[u8]) -> Result<String> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        debug!(encoding = encoding.name(), "byte-order mark detected");
        return encoding
            .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
            .map(Cow::into_owned)
            .ok_or_else(|| {
                CheckinError::encoding(format!(
                    "input starts with a {} byte-order mark but is not valid {}",
                    encoding.name(),
                    encoding.name()
                ))
            });
    }

    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        return Ok(text.into_owned());
    }

    let (text, had_errors) = GBK.decode_without_bom_handling(bytes);
    if had_errors {
        warn!("input is neither UTF-8 nor clean GBK; undecodable bytes were replaced");
    } else {
        debug!("input decoded as GBK");
    }
    Ok(text.into_owned())
}

/// Converts CR-LF line endings to LF. Lone CRs are left alone.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains("\r\n") {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Reads a file and returns its decoded, LF-normalized text.
///
/// A path that does not exist is reported as [`CheckinError::MissingInput`]
/// rather than a bare IO error.
pub fn read_log(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CheckinError::missing_input(path));
    }

    let bytes = fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read input file");

    let text = decode(&bytes)?;
    Ok(match normalize_line_endings(&text) {
        Cow::Borrowed(_) => text,
        Cow::Owned(normalized) => normalized,
    })
}
