use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;

use super::parse::RawRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot infer the input format of {0}; pass --format csv or --format json")]
    UnsupportedFormat(PathBuf),
}

pub fn load_records(path: &Path, format: Option<InputFormat>) -> Result<Vec<RawRecord>, LoadError> {
    let format = format
        .or_else(|| InputFormat::from_path(path))
        .ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    match format {
        InputFormat::Csv => read_csv(reader).map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        }),
        InputFormat::Json => read_json(reader).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(super) fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    reader.deserialize::<RawRecord>().collect()
}

pub(super) fn read_json<R: Read>(reader: R) -> Result<Vec<RawRecord>, serde_json::Error> {
    serde_json::from_reader(reader)
}
