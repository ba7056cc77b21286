use std::collections::HashMap;
use std::path::PathBuf;

/// Knobs forwarded to the file resolver when a config is fetched from a
/// remote repository. Retry pacing, partial-download resumption and proxy
/// selection are policies of the underlying hub client; `resume_download`
/// and `proxies` are carried so callers can persist the full option set.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub cache_dir: Option<PathBuf>,
    pub force_download: bool,
    pub resume_download: bool,
    pub proxies: Option<HashMap<String, String>>,
    pub local_files_only: bool,
    pub auth_token: Option<String>,
    pub revision: Option<String>,
    pub subfolder: Option<String>,
    pub commit_hash: Option<String>,
}

impl LoadOptions {
    pub fn new() -> Self {
        LoadOptions::default()
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    pub fn with_force_download(mut self, force_download: bool) -> Self {
        self.force_download = force_download;
        self
    }

    pub fn with_resume_download(mut self, resume_download: bool) -> Self {
        self.resume_download = resume_download;
        self
    }

    pub fn with_proxies(mut self, proxies: HashMap<String, String>) -> Self {
        self.proxies = Some(proxies);
        self
    }

    pub fn with_local_files_only(mut self, local_files_only: bool) -> Self {
        self.local_files_only = local_files_only;
        self
    }

    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    pub fn with_subfolder(mut self, subfolder: impl Into<String>) -> Self {
        self.subfolder = Some(subfolder.into());
        self
    }

    pub fn with_commit_hash(mut self, commit_hash: impl Into<String>) -> Self {
        self.commit_hash = Some(commit_hash.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LoadOptions::new();
        assert_eq!(options.cache_dir, None);
        assert!(!options.force_download);
        assert!(!options.local_files_only);
        assert_eq!(options.revision, None);
    }

    #[test]
    fn test_builder_sets_fields() {
        let options = LoadOptions::new()
            .with_cache_dir("/tmp/hub-cache")
            .with_force_download(true)
            .with_resume_download(true)
            .with_proxies(HashMap::from([(
                "https".to_owned(),
                "http://proxy:3128".to_owned(),
            )]))
            .with_local_files_only(true)
            .with_auth_token("hf_token")
            .with_revision("refs/pr/7")
            .with_subfolder("awq")
            .with_commit_hash("abc123");

        assert_eq!(options.cache_dir, Some(PathBuf::from("/tmp/hub-cache")));
        assert!(options.force_download);
        assert!(options.resume_download);
        assert_eq!(
            options.proxies.as_ref().and_then(|p| p.get("https")).map(String::as_str),
            Some("http://proxy:3128")
        );
        assert!(options.local_files_only);
        assert_eq!(options.auth_token.as_deref(), Some("hf_token"));
        assert_eq!(options.revision.as_deref(), Some("refs/pr/7"));
        assert_eq!(options.subfolder.as_deref(), Some("awq"));
        assert_eq!(options.commit_hash.as_deref(), Some("abc123"));
    }
}
