use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::bufread::GzDecoder;
use log::info;

use crate::errors::ModelUnavailable;
use crate::model::artifact::{CalorieModel, FORMAT_VERSION};
use crate::pipeline::features;

/// Environment override for the artifact location.
pub const MODEL_PATH_ENV: &str = "BURNWISE_MODEL_PATH";

/// Default location, relative to the app's working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/calories_model.json";

/// Where the loader will look, honoring the env override.
pub fn model_path() -> PathBuf {
    std::env::var(MODEL_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH))
}

/// Load and validate the artifact at `path`. If the unpacked form is absent
/// but a sibling `.gz` archive exists, the archive is unpacked first.
/// Deterministic and idempotent: repeated loads yield an equivalent model.
pub fn load_model(path: &Path) -> Result<CalorieModel, ModelUnavailable> {
    if !path.exists() {
        let archive = archive_path(path);
        if archive.exists() {
            unpack_archive(&archive, path)?;
        } else {
            return Err(ModelUnavailable::Missing {
                path: path.to_path_buf(),
            });
        }
    }

    let file = File::open(path).map_err(|source| ModelUnavailable::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let model: CalorieModel =
        serde_json::from_reader(BufReader::new(file)).map_err(|err| ModelUnavailable::Corrupt {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    if model.format_version != FORMAT_VERSION {
        return Err(ModelUnavailable::UnsupportedVersion {
            path: path.to_path_buf(),
            found: model.format_version,
            expected: FORMAT_VERSION,
        });
    }

    // The feature schema is a compile-time contract: an artifact fitted
    // against different column names or ordering never reaches inference.
    if model.feature_columns != features::COLUMNS {
        return Err(ModelUnavailable::SchemaMismatch {
            path: path.to_path_buf(),
            expected: features::COLUMNS.join(", "),
            found: model.feature_columns.join(", "),
        });
    }

    model
        .validate_structure()
        .map_err(|reason| ModelUnavailable::Corrupt {
            path: path.to_path_buf(),
            reason,
        })?;

    info!(
        "loaded {} from {} ({} trees)",
        model.model_type,
        path.display(),
        model.trees.len()
    );
    Ok(model)
}

fn archive_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".gz");
    path.with_file_name(name)
}

fn unpack_archive(archive: &Path, target: &Path) -> Result<(), ModelUnavailable> {
    info!("unpacking model archive {}", archive.display());

    let file = File::open(archive).map_err(|source| ModelUnavailable::Unreadable {
        path: archive.to_path_buf(),
        source,
    })?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut contents = Vec::new();
    decoder
        .read_to_end(&mut contents)
        .map_err(|err| ModelUnavailable::Corrupt {
            path: archive.to_path_buf(),
            reason: format!("gzip decode failed: {err}"),
        })?;

    fs::write(target, contents).map_err(|source| ModelUnavailable::Unreadable {
        path: target.to_path_buf(),
        source,
    })
}
