use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use log::debug;

use annoload_core::{AnnotationRecord, MalformedRecord, ReadError};

use crate::consts::{COMMENT_PREFIX, READ_BUFFER_CAPACITY};
use crate::error::VepParseError;
use crate::vep::parse_vep_line;

///
/// Lazily reads VEP output line by line.
///
/// Header, comment and blank lines are skipped silently. A line that fails to
/// parse is yielded as [`ReadError::Malformed`] and reading resumes on the next
/// line; an I/O error is yielded as [`ReadError::Io`] and ends the stream.
///
pub struct VepAnnotationReader<R> {
    reader: R,
    buf: Vec<u8>,
    line_number: u64,
    finished: bool,
}

impl<R: BufRead> VepAnnotationReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(1024),
            line_number: 0,
            finished: false,
        }
    }

    /// Number of lines consumed so far, including skipped ones.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> Iterator for VepAnnotationReader<R> {
    type Item = Result<AnnotationRecord, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.finished = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(ReadError::Io(e)));
                }
            }
            self.line_number += 1;

            let line = match std::str::from_utf8(&self.buf) {
                Ok(line) => line.trim_end_matches('\n').trim_end_matches('\r'),
                Err(_) => {
                    let malformed = MalformedRecord::new(
                        self.line_number,
                        String::from_utf8_lossy(&self.buf).trim_end().to_string(),
                        VepParseError::InvalidUtf8.to_string(),
                    );
                    return Some(Err(ReadError::Malformed(malformed)));
                }
            };

            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }

            return Some(parse_vep_line(line).map_err(|e| {
                ReadError::from(MalformedRecord::new(self.line_number, line, e.to_string()))
            }));
        }
    }
}

///
/// Open a file for buffered reading, decompressing it when the name ends in
/// `.gz` or `.bgz`.
///
pub fn open_annotation_file(path: &Path) -> std::io::Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)?;
    let is_gzipped = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "gz" || ext == "bgz");

    if is_gzipped {
        debug!("Opening {} as gzip", path.display());
        Ok(Box::new(BufReader::with_capacity(
            READ_BUFFER_CAPACITY,
            MultiGzDecoder::new(file),
        )))
    } else {
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER_CAPACITY, file)))
    }
}

///
/// A VEP output file on disk.
///
/// Every call to [`VepAnnotationFile::records`] opens the file afresh, so a
/// load can be restarted from the first line.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VepAnnotationFile {
    path: PathBuf,
}

impl VepAnnotationFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> std::io::Result<VepAnnotationReader<Box<dyn BufRead + Send>>> {
        let reader = open_annotation_file(&self.path)?;
        Ok(VepAnnotationReader::new(reader))
    }
}
