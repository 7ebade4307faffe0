/// Scoped readers over plain and gzip-compressed text files
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub fn is_gzipped(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

/// Open a text file, decompressing on the fly when it ends in `.gz`
pub fn open_text(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    if is_gzipped(path) {
        open_gzip(path)
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// Open a file that must be gzip-compressed regardless of its name
pub fn open_gzip(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    Ok(Box::new(BufReader::new(MultiGzDecoder::new(BufReader::new(file)))))
}

/// Drop the line terminator but keep trailing tabs so empty last columns survive
pub fn chomp(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}
