// SPDX-FileCopyrightText: 2025 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Loading intcode programs into [Memory]
//!
//! Programs are usually stored the way Advent of Code hands them out: a single line of
//! comma-separated decimal ints. Raw 64-bit ints in either byte order are supported too.
//!
//! The search driver needs a pristine copy of memory for every candidate it tries, so instead of
//! a single buffer it takes a [MemorySource], which builds a new one on every call to
//! [`MemorySource::load`].

use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::str::Utf8Error;

use clap::ValueEnum;
use log::debug;
use thiserror::Error;

use crate::Memory;

/// An error that occured while loading an intcode program
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file to load doesn't exist
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    /// Some other I/O error occured
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// the file being read
        path: PathBuf,
        /// the underlying error
        #[source]
        source: io::Error,
    },
    /// A comma-separated token isn't a decimal int
    #[error("int #{index} ({token:?}) is not a valid integer: {source}")]
    Parse {
        /// the zero-based position of the token within the list
        index: usize,
        /// the offending token, with surrounding whitespace removed
        token: String,
        /// the underlying error
        #[source]
        source: ParseIntError,
    },
    /// Text input that isn't UTF-8
    #[error("program is not valid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),
    /// Binary input whose length isn't a multiple of 8
    #[error("expected 8 bytes, got {}: {:02x?}", .0.len(), .0)]
    IncompleteInt(Box<[u8]>),
}

/// The on-disk format of an intcode program
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, ValueEnum)]
pub enum CodeFormat {
    /// comma-separated ASCII-encoded decimal numbers
    #[default]
    #[value(alias("text"))]
    #[value(alias("aoc"))]
    Ascii,
    /// little-endian 64-bit integers
    #[cfg_attr(target_endian = "little", value(alias("binary-native")))]
    #[value(name("binary-little-endian"), alias("binle"))]
    LittleEndian,
    #[cfg_attr(target_endian = "big", value(alias("binary-native")))]
    #[value(name("binary-big-endian"), alias("binbe"))]
    /// big-endian 64-bit integers
    BigEndian,
}

impl CodeFormat {
    /// Parse `input` into a program according to `self`
    pub fn parse(self, input: &[u8]) -> Result<Vec<i64>, LoadError> {
        match self {
            CodeFormat::Ascii => parse_ascii(str::from_utf8(input)?),
            CodeFormat::LittleEndian => load_bin(input, i64::from_le_bytes),
            CodeFormat::BigEndian => load_bin(input, i64::from_be_bytes),
        }
    }
}

/// Parse a comma-separated list of decimal ints.
///
/// Whitespace around the list and around each int is ignored. An empty (or all-whitespace) input
/// is an empty program.
///
/// ```
/// use intcode::loader::parse_ascii;
/// assert_eq!(parse_ascii("1,9,10,3,\n2, 3,11,0,99\n").unwrap(), vec![1, 9, 10, 3, 2, 3, 11, 0, 99]);
/// assert!(parse_ascii("1,two,3").is_err());
/// ```
pub fn parse_ascii(input: &str) -> Result<Vec<i64>, LoadError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(',')
        .map(str::trim)
        .enumerate()
        .map(|(index, token)| {
            token.parse().map_err(|source| LoadError::Parse {
                index,
                token: token.to_owned(),
                source,
            })
        })
        .collect()
}

fn load_bin<F: Fn([u8; 8]) -> i64>(input: &[u8], func: F) -> Result<Vec<i64>, LoadError> {
    let (chunks, remainder) = input.as_chunks::<8>();
    if remainder.is_empty() {
        Ok(chunks.iter().copied().map(func).collect())
    } else {
        Err(LoadError::IncompleteInt(Box::from(remainder)))
    }
}

/// Read and parse the program stored at `path`
pub fn load_file(path: &Path, format: CodeFormat) -> Result<Vec<i64>, LoadError> {
    let input = std::fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_owned())
        } else {
            LoadError::Io {
                path: path.to_owned(),
                source,
            }
        }
    })?;
    let program = format.parse(&input)?;
    debug!("loaded {} ints from {}", program.len(), path.display());
    Ok(program)
}

/// Something that can build a fresh copy of an intcode program's starting memory
pub trait MemorySource {
    /// Build a new [Memory], independent of any previously returned
    fn load(&self) -> Result<Memory, LoadError>;
}

impl<S: MemorySource + ?Sized> MemorySource for &S {
    fn load(&self) -> Result<Memory, LoadError> {
        (**self).load()
    }
}

/// A [MemorySource] that reads and parses a file on every load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
    format: CodeFormat,
}

impl FileSource {
    /// Load from `path`, in the given `format`
    pub fn new(path: impl Into<PathBuf>, format: CodeFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// The file that's loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MemorySource for FileSource {
    fn load(&self) -> Result<Memory, LoadError> {
        load_file(&self.path, self.format).map(Memory::from)
    }
}

/// A [MemorySource] holding an already-parsed program, which it copies into a new buffer on every
/// load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(Box<[i64]>);

impl Snapshot {
    /// Keep `code` as the starting memory
    pub fn new(code: impl IntoIterator<Item = i64>) -> Self {
        Self(code.into_iter().collect())
    }

    /// Read and parse the program at `path` once, keeping it as the starting memory
    pub fn from_file(path: &Path, format: CodeFormat) -> Result<Self, LoadError> {
        load_file(path, format).map(Self::new)
    }

    /// The starting memory
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

impl MemorySource for Snapshot {
    fn load(&self) -> Result<Memory, LoadError> {
        Ok(Memory::from(&self.0[..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn ascii_whitespace() {
        assert_eq!(parse_ascii("").unwrap(), Vec::<i64>::new());
        assert_eq!(parse_ascii(" \n").unwrap(), Vec::<i64>::new());
        assert_eq!(parse_ascii("-5").unwrap(), vec![-5]);
        assert_eq!(parse_ascii(" 1 ,2,\t3 \r\n").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn ascii_bad_token() {
        let Err(LoadError::Parse { index, token, .. }) = parse_ascii("1,2,3.5,4") else {
            panic!("expected a parse error");
        };
        assert_eq!((index, token.as_str()), (2, "3.5"));

        // a trailing comma leaves an empty token
        assert!(matches!(
            parse_ascii("1,2,"),
            Err(LoadError::Parse { index: 2, .. })
        ));
    }

    #[test]
    fn binary_formats() {
        let le: Vec<u8> = [1_i64, -2, 99].iter().flat_map(|i| i.to_le_bytes()).collect();
        let be: Vec<u8> = [1_i64, -2, 99].iter().flat_map(|i| i.to_be_bytes()).collect();
        assert_eq!(CodeFormat::LittleEndian.parse(&le).unwrap(), vec![1, -2, 99]);
        assert_eq!(CodeFormat::BigEndian.parse(&be).unwrap(), vec![1, -2, 99]);

        let Err(LoadError::IncompleteInt(rest)) = CodeFormat::LittleEndian.parse(&le[..20]) else {
            panic!("expected trailing bytes to be rejected");
        };
        assert_eq!(rest.len(), 4);
    }

    #[test]
    fn ascii_rejects_invalid_utf8() {
        assert!(matches!(
            CodeFormat::Ascii.parse(&[b'1', b',', 0xff]),
            Err(LoadError::Utf8(_))
        ));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let err = load_file(&path, CodeFormat::Ascii).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(ref p) if *p == path));
        assert_eq!(err.to_string(), format!("{} does not exist", path.display()));
    }

    #[test]
    fn file_source_rereads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1,0,0,0,99").unwrap();
        let source = FileSource::new(file.path(), CodeFormat::Ascii);

        let mut first = source.load().unwrap();
        *first.get_mut(0).unwrap() = 1234;
        assert_eq!(source.load().unwrap().as_slice(), &[1, 0, 0, 0, 99]);
    }

    #[test]
    fn snapshot_loads_are_independent() {
        let snapshot = Snapshot::new([2, 0, 0, 0, 99]);
        let mut first = snapshot.load().unwrap();
        *first.get_mut(1).unwrap() = 7;
        assert_eq!(snapshot.load().unwrap().as_slice(), &[2, 0, 0, 0, 99]);
        assert_eq!(snapshot.as_slice(), &[2, 0, 0, 0, 99]);
    }
}
