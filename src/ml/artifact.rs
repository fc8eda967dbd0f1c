//! Model artifact loading
//!
//! Artifacts are read straight from disk on every call; there is no cache, so
//! replacing the file is picked up by the next forecast run.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ForecastModel, ModelError, ModelLoader, SeasonalArModel};

/// On-disk encoding of a model artifact, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// `.json`
    Json,
    /// `.bin` / `.bincode`
    Bincode,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("bin") || ext.eq_ignore_ascii_case("bincode") => {
                Ok(Self::Bincode)
            }
            other => Err(ModelError::Invalid(format!(
                "unsupported artifact extension {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    pub fn decode(self, path: &Path, bytes: &[u8]) -> Result<SeasonalArModel, ModelError> {
        let decoded = match self {
            Self::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            Self::Bincode => bincode::deserialize(bytes).map_err(|e| e.to_string()),
        };
        decoded.map_err(|detail| ModelError::Decode {
            path: path.to_path_buf(),
            detail,
        })
    }

    pub fn encode(self, model: &SeasonalArModel) -> Result<Vec<u8>, ModelError> {
        match self {
            Self::Json => serde_json::to_vec_pretty(model).map_err(|e| ModelError::Invalid(e.to_string())),
            Self::Bincode => bincode::serialize(model).map_err(|e| ModelError::Invalid(e.to_string())),
        }
    }
}

/// Loads a [`SeasonalArModel`] from a fixed path.
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    path: PathBuf,
}

impl ArtifactLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load_model(&self) -> Result<SeasonalArModel, ModelError> {
        let format = ArtifactFormat::from_path(&self.path)?;
        let bytes = std::fs::read(&self.path).map_err(|source| ModelError::Artifact {
            path: self.path.clone(),
            source,
        })?;
        let model = format.decode(&self.path, &bytes)?;
        model.validate()?;

        debug!(
            path = %self.path.display(),
            model_id = %model.metadata.model_id,
            version = %model.metadata.version,
            "model artifact loaded"
        );
        Ok(model)
    }
}

impl ModelLoader for ArtifactLoader {
    fn load(&self) -> Result<Box<dyn ForecastModel>, ModelError> {
        Ok(Box::new(self.load_model()?))
    }
}
