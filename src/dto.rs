//! Reading and writing the intermediate page-DTO JSON files. Each published
//! page lives in a `page{N}.json` file whose field names date back to the
//! blog's WordPress export; the numbering of the files is the chronological
//! order of publication, so directory reads sort by that number. Sorting is
//! numeric, not lexical: `page9.json` precedes `page10.json`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PageDto {
    #[serde(rename = "thumbImg", default)]
    pub thumb_img: String,

    #[serde(rename = "postImg", default)]
    pub post_img: String,

    #[serde(default)]
    pub filename: String,

    pub post: PostData,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PostData {
    #[serde(default)]
    pub post_id: u32,

    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub title_plain: String,

    #[serde(default)]
    pub excerpt: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub custom_fields: CustomFields,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CustomFields {
    #[serde(default)]
    pub dsq_thread_id: Vec<String>,
}

/// Reads all `page{N}.json` files directly under `dir`, ordered by `N`.
/// Other files are ignored. The resulting order is oldest-first, which the
/// bundling of navigation pages depends on.
pub fn read_pages_from_dir(dir: &Path) -> Result<Vec<PageDto>> {
    let mut numbered: Vec<(u32, PathBuf)> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy();
        if let Some(number) = page_number(&file_name) {
            numbered.push((number, entry.path().to_owned()));
        }
    }
    numbered.sort_by_key(|(number, _)| *number);

    let mut dtos = Vec::with_capacity(numbered.len());
    for (_, path) in numbered {
        dtos.push(read_page_dto(&path)?);
    }
    Ok(dtos)
}

/// Reads a single page-DTO file.
pub fn read_page_dto(path: &Path) -> Result<PageDto> {
    let file = File::open(path)?;
    serde_json::from_reader(file).map_err(|err| Error::Parse {
        path: path.to_owned(),
        err,
    })
}

/// Writes `dto` as pretty-printed JSON to `dir/filename`, creating `dir` if
/// necessary.
pub fn write_page_dto(dto: &PageDto, dir: &Path, filename: &str) -> Result<()> {
    create_dir_all(dir)?;
    let path = dir.join(filename);
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(file, dto).map_err(|err| Error::Parse { path, err })
}

/// The number the next `page{N}.json` file in `dir` should carry: one past
/// the highest existing number, or 1 for a fresh directory.
pub fn next_page_number(dir: &Path) -> Result<u32> {
    let mut highest = 0;
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if let Some(number) = page_number(&entry.file_name().to_string_lossy()) {
            if number > highest {
                highest = number;
            }
        }
    }
    Ok(highest + 1)
}

/// Rewrites every page DTO of `dir` into a `migrated` subdirectory, used to
/// migrate old exported data to the current field set. Returns the number of
/// migrated files.
pub fn rewrite_pages(dir: &Path) -> Result<usize> {
    let dtos = read_pages_from_dir(dir)?;
    let migrated = dir.join("migrated");
    for (i, dto) in dtos.iter().enumerate() {
        let filename = match dto.filename.is_empty() {
            false => dto.filename.clone(),
            true => format!("page{}.json", i + 1),
        };
        write_page_dto(dto, &migrated, &filename)?;
    }
    Ok(dtos.len())
}

fn page_number(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix("page")?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading or writing page-DTO files.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while listing, reading or writing files.
    Io(std::io::Error),

    /// Returned when a page file does not hold a valid page DTO.
    Parse {
        path: PathBuf,
        err: serde_json::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Parse { path, err } => {
                write!(f, "parsing page file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Parse { path: _, err } => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Error {
        Error::Io(err.into())
    }
}
