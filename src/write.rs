//! Writing rendered site files to the local file system. A [`FileContainer`]
//! pairs a target directory, a filename and the file's content; the site
//! creator collects one container per artifact and writes them all in a
//! final pass.

use std::fmt;
use std::fs;
use std::path::PathBuf;

pub struct FileContainer {
    pub path: PathBuf,
    pub filename: String,
    pub data: String,
}

impl FileContainer {
    /// Writes the file, creating the target directory if necessary.
    pub fn write(&self) -> Result<()> {
        fs::create_dir_all(&self.path).map_err(|err| Error::Io {
            path: self.path.clone(),
            err,
        })?;
        let target = self.path.join(&self.filename);
        fs::write(&target, &self.data).map_err(|err| Error::Io { path: target, err })
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error writing an output file.
#[derive(Debug)]
pub enum Error {
    Io { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => {
                write!(f, "writing '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { path: _, err } => Some(err),
        }
    }
}
