//! Program image loader.
//!
//! Two formats are accepted. A `.hex` file holds one 32-bit word per line
//! in hexadecimal (optionally `0x`-prefixed), with `#` starting a comment;
//! it is converted to big-endian bytes. Any other file is taken as a raw
//! big-endian memory image.

use std::fs;
use std::path::Path;

use crate::common::{SimError, SimResult};
use crate::config::parse_hex;

/// Image file formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Raw,
    Hex,
}

impl ImageFormat {
    /// Picks the format from the file extension.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("hex") => ImageFormat::Hex,
            _ => ImageFormat::Raw,
        }
    }
}

/// Reads an image file into big-endian bytes.
pub fn load_image(path: impl AsRef<Path>) -> SimResult<Vec<u8>> {
    let path = path.as_ref();
    let io_err = |source| SimError::ImageLoad {
        path: path.to_path_buf(),
        source,
    };
    match ImageFormat::detect(path) {
        ImageFormat::Raw => fs::read(path).map_err(io_err),
        ImageFormat::Hex => {
            let text = fs::read_to_string(path).map_err(io_err)?;
            parse_hex_image(&text).map_err(|(line, text)| SimError::ImageParse {
                path: path.to_path_buf(),
                line,
                text,
            })
        }
    }
}

/// Parses hex-word text. On failure returns the 1-based line and its text.
pub fn parse_hex_image(text: &str) -> Result<Vec<u8>, (usize, String)> {
    let mut bytes = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let word = raw.split('#').next().unwrap_or("").trim();
        if word.is_empty() {
            continue;
        }
        let digits = word.trim_start_matches("0x").replace('_', "");
        if digits.is_empty() || digits.len() > 8 || u32::from_str_radix(&digits, 16).is_err() {
            return Err((i + 1, raw.to_string()));
        }
        bytes.extend_from_slice(&parse_hex(&digits, 0).to_be_bytes());
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_lines_become_big_endian_words() {
        let text = "# program\n0x24010005\n2402000a  # li $2, 10\n\n0000000c\n";
        assert_eq!(
            parse_hex_image(text).unwrap(),
            vec![0x24, 0x01, 0x00, 0x05, 0x24, 0x02, 0x00, 0x0A, 0, 0, 0, 0x0C]
        );
    }

    #[test]
    fn bad_hex_line_reports_position() {
        assert_eq!(
            parse_hex_image("00000000\nzzzz\n"),
            Err((2, "zzzz".to_string()))
        );
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ImageFormat::detect(Path::new("a.HEX")), ImageFormat::Hex);
        assert_eq!(ImageFormat::detect(Path::new("a.bin")), ImageFormat::Raw);
        assert_eq!(ImageFormat::detect(Path::new("image")), ImageFormat::Raw);
    }
}
