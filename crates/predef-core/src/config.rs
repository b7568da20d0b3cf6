//! Resolver and output settings, loadable from TOML

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Members whose resolution drags in most of the global scope again
pub const DEFAULT_EXCLUDED_MEMBERS: &[&str] = &["global", "globalThis"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredefConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which member set the interface builder reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberSet {
    /// Members declared on the type itself; falls back to effective members
    /// when the host does not track declarations separately
    #[default]
    Declared,
    /// Members including everything inherited from bases
    Effective,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Members resolved as `any` instead of being walked.
    /// Entries are `member` or `Owner.member`.
    #[serde(default = "default_excluded_members")]
    pub excluded_members: Vec<String>,
    #[serde(default)]
    pub member_set: MemberSet,
}

fn default_excluded_members() -> Vec<String> {
    DEFAULT_EXCLUDED_MEMBERS
        .iter()
        .map(|m| m.to_string())
        .collect()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            excluded_members: default_excluded_members(),
            member_set: MemberSet::default(),
        }
    }
}

impl ResolverConfig {
    pub fn with_excluded_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_members = members.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_member_set(mut self, member_set: MemberSet) -> Self {
        self.member_set = member_set;
        self
    }

    /// Check whether `member` of the type named `owner` is on the exclusion list
    pub fn is_excluded(&self, owner: Option<&str>, member: &str) -> bool {
        self.excluded_members.iter().any(|entry| match entry.rsplit_once('.') {
            Some((entry_owner, entry_member)) => {
                entry_member == member && owner == Some(entry_owner)
            }
            None => entry == member,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub pretty: bool,
}

impl PredefConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, CoreError> {
        let config: PredefConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        tracing::debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn check(&self) -> Result<(), CoreError> {
        if let Some(entry) = self
            .resolver
            .excluded_members
            .iter()
            .find(|entry| entry.is_empty() || entry.ends_with('.'))
        {
            return Err(CoreError::Config(format!(
                "excluded member entry '{}' names no member",
                entry
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = PredefConfig::from_toml_str("").unwrap();
        assert_eq!(config, PredefConfig::default());
        assert!(config.resolver.is_excluded(None, "globalThis"));
        assert_eq!(config.resolver.member_set, MemberSet::Declared);
    }

    #[test]
    fn test_parse_full_config() {
        let config = PredefConfig::from_toml_str(
            r#"
[resolver]
excluded_members = ["NodeJS.Process.env", "prototype"]
member_set = "effective"

[output]
pretty = true
"#,
        )
        .unwrap();

        assert_eq!(config.resolver.member_set, MemberSet::Effective);
        assert!(config.output.pretty);
        assert!(config.resolver.is_excluded(Some("NodeJS.Process"), "env"));
        assert!(!config.resolver.is_excluded(Some("Other"), "env"));
        assert!(config.resolver.is_excluded(Some("Anything"), "prototype"));
        assert!(!config.resolver.is_excluded(None, "globalThis"));
    }

    #[test]
    fn test_rejects_entry_without_member() {
        let result = PredefConfig::from_toml_str(
            r#"
[resolver]
excluded_members = ["NodeJS."]
"#,
        );
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predef.toml");
        std::fs::write(&path, "[output]\npretty = true\n").unwrap();

        let config = PredefConfig::load(&path).unwrap();
        assert!(config.output.pretty);
        assert_eq!(config.resolver, ResolverConfig::default());
    }
}
