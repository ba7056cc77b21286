use crate::error::Result;
use crate::hub::options::LoadOptions;
use hf_hub::api::sync::{ApiBuilder, ApiError};
use hf_hub::{Cache, Repo, RepoType};
use std::path::PathBuf;
use tracing::debug;

/// Resolves a filename inside a remote repository to a local path.
///
/// A missing file or an unreachable remote resolves to `Ok(None)`; errors
/// are reserved for local failures (client construction, disk I/O).
pub trait FileResolver {
    fn resolve(
        &self,
        source: &str,
        filename: &str,
        options: &LoadOptions,
    ) -> Result<Option<PathBuf>>;
}

#[derive(Debug, Default)]
pub struct HubResolver;

impl HubResolver {
    pub fn new() -> Self {
        HubResolver
    }

    fn repo(source: &str, options: &LoadOptions) -> Repo {
        // A pinned commit hash wins over a symbolic revision.
        match options.commit_hash.as_ref().or(options.revision.as_ref()) {
            Some(revision) => {
                Repo::with_revision(source.to_owned(), RepoType::Model, revision.clone())
            }
            None => Repo::model(source.to_owned()),
        }
    }

    fn cache(options: &LoadOptions) -> Cache {
        match &options.cache_dir {
            Some(cache_dir) => Cache::new(cache_dir.clone()),
            None => Cache::default(),
        }
    }

    fn qualified(filename: &str, options: &LoadOptions) -> String {
        match &options.subfolder {
            Some(subfolder) => format!("{}/{}", subfolder, filename),
            None => filename.to_owned(),
        }
    }
}

impl FileResolver for HubResolver {
    fn resolve(
        &self,
        source: &str,
        filename: &str,
        options: &LoadOptions,
    ) -> Result<Option<PathBuf>> {
        let filename = HubResolver::qualified(filename, options);
        let cache = HubResolver::cache(options);

        if options.local_files_only {
            return Ok(cache.repo(HubResolver::repo(source, options)).get(&filename));
        }

        if !options.force_download {
            if let Some(cached) = cache.repo(HubResolver::repo(source, options)).get(&filename) {
                debug!("Cache hit for {}/{}", source, filename);
                return Ok(Some(cached));
            }
        }

        let mut builder = ApiBuilder::new().with_progress(false);
        if let Some(cache_dir) = &options.cache_dir {
            builder = builder.with_cache_dir(cache_dir.clone());
        }
        if let Some(auth_token) = &options.auth_token {
            builder = builder.with_token(Some(auth_token.clone()));
        }
        let api = builder.build()?;
        let repo = api.repo(HubResolver::repo(source, options));

        let downloaded = if options.force_download {
            repo.download(&filename)
        } else {
            repo.get(&filename)
        };

        match downloaded {
            Ok(path) => Ok(Some(path)),
            Err(ApiError::RequestError(e)) => {
                // Missing entries and connection failures both mean "absent".
                debug!("Could not fetch {}/{}: {}", source, filename, e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_qualified_filename() {
        let options = LoadOptions::new().with_subfolder("awq");
        assert_eq!(
            HubResolver::qualified("config.json", &options),
            "awq/config.json"
        );
        assert_eq!(
            HubResolver::qualified("config.json", &LoadOptions::new()),
            "config.json"
        );
    }

    #[test]
    fn test_local_files_only_cache_miss() {
        let cache = TempDir::new().unwrap();
        let options = LoadOptions::new()
            .with_local_files_only(true)
            .with_cache_dir(cache.path());

        let resolved = HubResolver::new()
            .resolve("acme/empty-model", "config.json", &options)
            .unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_local_files_only_cache_hit() {
        let cache = TempDir::new().unwrap();
        let repo_dir = cache.path().join("models--acme--model");
        fs::create_dir_all(repo_dir.join("refs")).unwrap();
        fs::create_dir_all(repo_dir.join("snapshots/abc123")).unwrap();
        fs::write(repo_dir.join("refs/main"), "abc123").unwrap();
        fs::write(repo_dir.join("snapshots/abc123/config.json"), "{}").unwrap();

        let options = LoadOptions::new()
            .with_local_files_only(true)
            .with_cache_dir(cache.path());

        let resolved = HubResolver::new()
            .resolve("acme/model", "config.json", &options)
            .unwrap();
        assert_eq!(
            resolved,
            Some(repo_dir.join("snapshots/abc123/config.json"))
        );
    }

    #[test]
    fn test_commit_hash_pins_revision() {
        let cache = TempDir::new().unwrap();
        let repo_dir = cache.path().join("models--acme--model");
        fs::create_dir_all(repo_dir.join("refs")).unwrap();
        fs::create_dir_all(repo_dir.join("snapshots/fixed00")).unwrap();
        fs::write(repo_dir.join("refs/fixed00"), "fixed00").unwrap();
        fs::write(repo_dir.join("snapshots/fixed00/config.json"), "{}").unwrap();

        let options = LoadOptions::new()
            .with_local_files_only(true)
            .with_cache_dir(cache.path())
            .with_revision("main")
            .with_commit_hash("fixed00");

        let resolved = HubResolver::new()
            .resolve("acme/model", "config.json", &options)
            .unwrap();
        assert_eq!(
            resolved,
            Some(repo_dir.join("snapshots/fixed00/config.json"))
        );
    }
}
