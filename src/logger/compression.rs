//! Gzip compression of rotated log files

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

/// Compress `path` into `path.gz` and remove the original.
///
/// Returns the path of the compressed file.
pub fn compress_file(path: &Path) -> io::Result<PathBuf> {
    let mut compressed_name = path.file_name().unwrap_or_default().to_os_string();
    compressed_name.push(".gz");
    let compressed_path = path.with_file_name(compressed_name);

    let mut input = BufReader::new(File::open(path)?);
    let mut encoder = GzEncoder::new(File::create(&compressed_path)?, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;
    Ok(compressed_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use proptest::prelude::*;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_compress_replaces_original() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("jobkit.20250101_000000.log");
        fs::write(&file_path, "job ran").unwrap();

        let compressed = compress_file(&file_path).unwrap();

        assert!(!file_path.exists());
        assert_eq!(
            compressed,
            dir.path().join("jobkit.20250101_000000.log.gz")
        );
        assert!(compressed.exists());
    }

    #[test]
    fn test_compress_missing_file() {
        let dir = tempdir().unwrap();
        assert!(compress_file(&dir.path().join("absent.log")).is_err());
    }

    proptest! {
        /// Decompressing a compressed log yields the original bytes
        #[test]
        fn property_compression_preserves_content(content in "[a-zA-Z0-9 \n]{1,1000}") {
            let dir = tempdir().unwrap();
            let file_path = dir.path().join("test.log");
            fs::write(&file_path, &content).unwrap();

            let compressed = compress_file(&file_path).unwrap();

            let mut decoder = GzDecoder::new(File::open(compressed).unwrap());
            let mut decompressed = String::new();
            decoder.read_to_string(&mut decompressed).unwrap();
            prop_assert_eq!(decompressed, content);
        }
    }
}
