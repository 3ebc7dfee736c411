//! Catalog of known projects and their versioned doc sets.
//!
//! The registry is built once from configuration and is read-only
//! afterwards. Lookups fail with [`RegistryError`] rather than panicking, so
//! callers can tell an unknown project or version apart from a valid doc set
//! that simply lacks something (such as a "next" version).

use std::collections::BTreeMap;

use dv_config::{Config, ProjectConfig};
use dv_route::DocSetId;

/// Branch content is read from when a version names none.
pub const DEFAULT_BRANCH: &str = "master";

const GITHUB_HOST: &str = "://github.com/";
const RAW_GITHUB_HOST: &str = "://raw.githubusercontent.com/";

/// Error returned by registry lookups.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Unknown project: {0}")]
    ProjectNotFound(String),
    #[error("Unknown version {version} of project {project}")]
    VersionNotFound { project: String, version: String },
}

/// One version of one project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocSet {
    pub id: DocSetId,
    pub repository_url: String,
    pub content_base_url: Option<String>,
    pub branch: Option<String>,
    /// Markdown pages in menu order.
    pub pages: Vec<String>,
    pub api_data_path: Option<String>,
}

impl DocSet {
    #[must_use]
    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    fn repository(&self) -> &str {
        let url = self.repository_url.trim_end_matches('/');
        url.strip_suffix(".git").unwrap_or(url)
    }

    /// Base URL that page paths are appended to, always ending in `/`.
    ///
    /// Without an explicit content base, GitHub repository URLs are mapped
    /// to their raw content host and the branch is appended.
    #[must_use]
    pub fn base_content_url(&self) -> String {
        if let Some(base) = &self.content_base_url {
            return format!("{}/", base.trim_end_matches('/'));
        }
        let repository = self.repository().replacen(GITHUB_HOST, RAW_GITHUB_HOST, 1);
        format!("{repository}/{}/", self.branch())
    }

    /// URL browsing the repository sources at this version's branch.
    #[must_use]
    pub fn source_browse_url(&self) -> String {
        format!("{}/blob/{}/", self.repository(), self.branch())
    }

    /// "View source" URL of one page.
    #[must_use]
    pub fn page_source_url(&self, page: &str) -> String {
        format!("{}{}", self.source_browse_url(), page.trim_start_matches('/'))
    }

    #[must_use]
    pub fn page_url(&self, page: &str) -> String {
        join_url(&self.base_content_url(), page)
    }

    #[must_use]
    pub fn api_data_url(&self) -> Option<String> {
        self.api_data_path
            .as_deref()
            .map(|path| join_url(&self.base_content_url(), path))
    }

    #[must_use]
    pub fn has_page(&self, page: &str) -> bool {
        self.pages.iter().any(|p| p == page)
    }

    #[must_use]
    pub fn first_page(&self) -> Option<&str> {
        self.pages.first().map(String::as_str)
    }
}

/// Absolute paths are used as-is, relative ones are appended to `base`.
fn join_url(base: &str, path: &str) -> String {
    if path.contains("://") {
        path.to_owned()
    } else {
        format!("{base}{}", path.trim_start_matches('/'))
    }
}

#[derive(Clone, Debug)]
struct Project {
    latest: Option<String>,
    next: Option<String>,
    versions: BTreeMap<String, DocSet>,
}

/// Read-only catalog of projects and versions.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    projects: BTreeMap<String, Project>,
    default_project: Option<String>,
}

impl Registry {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let projects = config
            .projects
            .iter()
            .map(|(name, project)| (name.clone(), Self::project(name, project)))
            .collect();
        Self {
            projects,
            default_project: config.default_project().map(str::to_owned),
        }
    }

    fn project(name: &str, config: &ProjectConfig) -> Project {
        let versions = config
            .versions
            .iter()
            .map(|(version, v)| {
                let docset = DocSet {
                    id: DocSetId::new(name, version.as_str()),
                    repository_url: config.repository_url.clone(),
                    content_base_url: v.content_base_url.clone(),
                    branch: v.branch.clone(),
                    pages: v.pages.clone(),
                    api_data_path: v.api_data_path.clone(),
                };
                (version.clone(), docset)
            })
            .collect();
        Project {
            latest: config.latest_version.clone(),
            next: config.next_version.clone(),
            versions,
        }
    }

    fn get_project(&self, project: &str) -> Result<&Project, RegistryError> {
        self.projects
            .get(project)
            .ok_or_else(|| RegistryError::ProjectNotFound(project.to_owned()))
    }

    /// Look up a doc set.
    pub fn get_docset(&self, id: &DocSetId) -> Result<&DocSet, RegistryError> {
        self.get_project(&id.project)?
            .versions
            .get(&id.version)
            .ok_or_else(|| RegistryError::VersionNotFound {
                project: id.project.clone(),
                version: id.version.clone(),
            })
    }

    /// Latest version of `project`: the tagged one, else the highest key.
    pub fn latest_version(&self, project: &str) -> Result<&str, RegistryError> {
        let entry = self.get_project(project)?;
        entry
            .latest
            .as_deref()
            .filter(|v| entry.versions.contains_key(*v))
            .or_else(|| entry.versions.keys().next_back().map(String::as_str))
            .ok_or_else(|| RegistryError::VersionNotFound {
                project: project.to_owned(),
                version: "latest".to_owned(),
            })
    }

    /// Upcoming version of `project`, if any.
    ///
    /// Falls back to the key sorted right after latest.
    pub fn next_version(&self, project: &str) -> Result<Option<&str>, RegistryError> {
        let entry = self.get_project(project)?;
        if let Some(next) = entry
            .next
            .as_deref()
            .filter(|v| entry.versions.contains_key(*v))
        {
            return Ok(Some(next));
        }
        let latest = self.latest_version(project)?;
        Ok(entry
            .versions
            .keys()
            .map(String::as_str)
            .find(|v| *v > latest))
    }

    pub fn list_projects(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    pub fn list_versions(&self, project: &str) -> Result<Vec<&str>, RegistryError> {
        Ok(self
            .get_project(project)?
            .versions
            .keys()
            .map(String::as_str)
            .collect())
    }

    pub fn base_content_url(&self, id: &DocSetId) -> Result<String, RegistryError> {
        Ok(self.get_docset(id)?.base_content_url())
    }

    pub fn source_browse_url(&self, id: &DocSetId) -> Result<String, RegistryError> {
        Ok(self.get_docset(id)?.source_browse_url())
    }

    /// The default project's latest doc set.
    #[must_use]
    pub fn default_docset(&self) -> Option<DocSetId> {
        let project = self
            .default_project
            .as_deref()
            .filter(|p| self.projects.contains_key(*p))
            .or_else(|| self.list_projects().next())?;
        let version = self.latest_version(project).ok()?;
        Some(DocSetId::new(project, version))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"
[viewer]
default_project = "Intern"

[projects.Intern]
repository_url = "https://github.com/theintern/intern"

[projects.Intern.versions.3]
branch = "3.4"
pages = ["README.md"]

[projects.Intern.versions.4]
branch = "4.x"
api_data_path = "docs/api.json"
pages = ["README.md", "docs/getting_started.md"]

[projects.Intern.versions.5]
pages = ["README.md"]

[projects.Leadfoot]
repository_url = "https://github.com/theintern/leadfoot.git"
latest_version = "2"

[projects.Leadfoot.versions.1]
pages = ["README.md"]

[projects.Leadfoot.versions.2]
content_base_url = "https://cdn.example.com/leadfoot/2"
pages = ["README.md"]
"#;

    fn registry() -> Registry {
        Registry::from_config(&Config::from_toml(CONFIG).unwrap())
    }

    #[test]
    fn test_get_docset() {
        let registry = registry();
        let docset = registry.get_docset(&DocSetId::new("Intern", "4")).unwrap();
        assert_eq!(docset.pages.len(), 2);
        assert_eq!(docset.branch(), "4.x");
    }

    #[test]
    fn test_unknown_lookups() {
        let registry = registry();
        assert_eq!(
            registry.get_docset(&DocSetId::new("Dojo", "1")),
            Err(RegistryError::ProjectNotFound("Dojo".to_owned()))
        );
        assert_eq!(
            registry.get_docset(&DocSetId::new("Intern", "9")),
            Err(RegistryError::VersionNotFound {
                project: "Intern".to_owned(),
                version: "9".to_owned(),
            })
        );
        assert!(registry.list_versions("Dojo").is_err());
    }

    #[test]
    fn test_latest_falls_back_to_highest_key() {
        assert_eq!(registry().latest_version("Intern").unwrap(), "5");
    }

    #[test]
    fn test_tagged_latest() {
        assert_eq!(registry().latest_version("Leadfoot").unwrap(), "2");
    }

    #[test]
    fn test_next_version() {
        let registry = registry();
        assert_eq!(registry.next_version("Intern").unwrap(), None);
        assert_eq!(registry.next_version("Leadfoot").unwrap(), None);
        assert!(registry.next_version("Dojo").is_err());
    }

    #[test]
    fn test_next_falls_back_to_key_after_latest() {
        let config = Config::from_toml(
            r#"
[projects.Intern]
repository_url = "https://github.com/theintern/intern"
latest_version = "3"

[projects.Intern.versions.3]
pages = ["README.md"]

[projects.Intern.versions.4]
pages = ["README.md"]
"#,
        )
        .unwrap();
        let registry = Registry::from_config(&config);
        assert_eq!(registry.next_version("Intern").unwrap(), Some("4"));
    }

    #[test]
    fn test_list_projects_and_versions() {
        let registry = registry();
        assert_eq!(registry.list_projects().collect::<Vec<_>>(), ["Intern", "Leadfoot"]);
        assert_eq!(registry.list_versions("Intern").unwrap(), ["3", "4", "5"]);
    }

    #[test]
    fn test_base_content_url_from_github() {
        let registry = registry();
        assert_eq!(
            registry.base_content_url(&DocSetId::new("Intern", "4")).unwrap(),
            "https://raw.githubusercontent.com/theintern/intern/4.x/"
        );
        assert_eq!(
            registry.base_content_url(&DocSetId::new("Intern", "5")).unwrap(),
            "https://raw.githubusercontent.com/theintern/intern/master/"
        );
        assert_eq!(
            registry.base_content_url(&DocSetId::new("Leadfoot", "1")).unwrap(),
            "https://raw.githubusercontent.com/theintern/leadfoot/master/"
        );
    }

    #[test]
    fn test_explicit_content_base() {
        let registry = registry();
        let docset = registry.get_docset(&DocSetId::new("Leadfoot", "2")).unwrap();
        assert_eq!(
            docset.page_url("README.md"),
            "https://cdn.example.com/leadfoot/2/README.md"
        );
    }

    #[test]
    fn test_source_urls() {
        let registry = registry();
        let id = DocSetId::new("Intern", "4");
        assert_eq!(
            registry.source_browse_url(&id).unwrap(),
            "https://github.com/theintern/intern/blob/4.x/"
        );
        let docset = registry.get_docset(&id).unwrap();
        assert_eq!(
            docset.page_source_url("docs/getting_started.md"),
            "https://github.com/theintern/intern/blob/4.x/docs/getting_started.md"
        );
        assert_eq!(
            docset.api_data_url().as_deref(),
            Some("https://raw.githubusercontent.com/theintern/intern/4.x/docs/api.json")
        );
    }

    #[test]
    fn test_default_docset() {
        assert_eq!(
            registry().default_docset(),
            Some(DocSetId::new("Intern", "5"))
        );
        assert_eq!(Registry::default().default_docset(), None);
    }
}
