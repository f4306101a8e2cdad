//! Resolution of the four trained artifacts to local file paths.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{ArtifactFileNames, ArtifactSource};
use crate::EmotionError;

/// Local paths of a complete artifact set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFiles {
    pub manifest: PathBuf,
    pub weights: PathBuf,
    pub vocabulary: PathBuf,
    pub labels: PathBuf,
}

impl ArtifactFiles {
    /// Paths inside `dir`; every file must exist.
    pub fn in_dir(dir: &Path, names: &ArtifactFileNames) -> Result<Self, EmotionError> {
        let files = Self {
            manifest: dir.join(&names.manifest),
            weights: dir.join(&names.weights),
            vocabulary: dir.join(&names.vocabulary),
            labels: dir.join(&names.labels),
        };
        for path in files.paths() {
            if !path.is_file() {
                return Err(EmotionError::artifact(path, "file not found"));
            }
        }
        Ok(files)
    }

    pub fn paths(&self) -> [&Path; 4] {
        [&self.manifest, &self.weights, &self.vocabulary, &self.labels]
    }
}

/// Resolve `source` to local files, downloading from the hub if needed.
pub fn resolve_artifacts(
    source: &ArtifactSource,
    data_path: &Path,
) -> Result<ArtifactFiles, EmotionError> {
    match source {
        ArtifactSource::Local { dir, files } => {
            let dir = dir.as_deref().unwrap_or(data_path);
            let resolved = ArtifactFiles::in_dir(dir, files)?;
            info!("Using local artifacts in {}", dir.display());
            Ok(resolved)
        }
        ArtifactSource::Hub {
            repo,
            revision,
            cache_dir,
            files,
        } => download_artifacts(repo, revision.as_deref(), cache_dir.as_deref(), files),
    }
}

/// Fetch every artifact from a HuggingFace Hub model repo.
pub fn download_artifacts(
    repo_id: &str,
    revision: Option<&str>,
    cache_dir: Option<&Path>,
    names: &ArtifactFileNames,
) -> Result<ArtifactFiles, EmotionError> {
    let mut builder = hf_hub::api::sync::ApiBuilder::new();
    if let Some(dir) = cache_dir {
        builder = builder.with_cache_dir(dir.to_path_buf());
    }
    let api = builder.build().map_err(|e| {
        EmotionError::Config(format!("Failed to initialize HuggingFace Hub API: {}", e))
    })?;

    let repo = match revision {
        Some(rev) => api.repo(hf_hub::Repo::with_revision(
            repo_id.to_string(),
            hf_hub::RepoType::Model,
            rev.to_string(),
        )),
        None => api.model(repo_id.to_string()),
    };

    let fetch = |name: &str| {
        repo.get(name).map_err(|e| {
            EmotionError::artifact(Path::new(repo_id).join(name), format!("download failed: {}", e))
        })
    };

    let files = ArtifactFiles {
        manifest: fetch(&names.manifest)?,
        weights: fetch(&names.weights)?,
        vocabulary: fetch(&names.vocabulary)?,
        labels: fetch(&names.labels)?,
    };
    info!("Artifacts fetched from hub repo {}", repo_id);
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch_all(dir: &Path, names: &ArtifactFileNames) {
        for name in [&names.manifest, &names.weights, &names.vocabulary, &names.labels] {
            std::fs::write(dir.join(name), b"{}").expect("write");
        }
    }

    #[test]
    fn test_local_defaults_to_data_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let names = ArtifactFileNames::default();
        touch_all(dir.path(), &names);

        let files = resolve_artifacts(&ArtifactSource::default(), dir.path()).expect("resolve");
        assert_eq!(files.weights, dir.path().join("model.safetensors"));
        assert_eq!(files.labels, dir.path().join("labels.json"));
    }

    #[test]
    fn test_local_explicit_dir_and_names() {
        let data = tempfile::tempdir().expect("tempdir");
        let artifacts = tempfile::tempdir().expect("tempdir");
        let names = ArtifactFileNames {
            vocabulary: "word_index.json".to_string(),
            ..ArtifactFileNames::default()
        };
        touch_all(artifacts.path(), &names);

        let source = ArtifactSource::Local {
            dir: Some(artifacts.path().to_path_buf()),
            files: names,
        };
        let files = resolve_artifacts(&source, data.path()).expect("resolve");
        assert_eq!(files.vocabulary, artifacts.path().join("word_index.json"));
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("model.json"), b"{}").expect("write");

        match resolve_artifacts(&ArtifactSource::default(), dir.path()) {
            Err(EmotionError::Artifact { path, .. }) => {
                assert_eq!(path, dir.path().join("model.safetensors"));
            }
            other => panic!("expected artifact error, got {:?}", other),
        }
    }
}
