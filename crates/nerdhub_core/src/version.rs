use serde::{Deserialize, Serialize};

/// Version reported by builds that are not cut from a release tag.
pub const DEV_PRERELEASE: &str = "dev-prerelease";

const RELEASES_BASE: &str = "https://github.com/TheNerdsHub";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    #[serde(default)]
    pub backend_version: Option<String>,
    #[serde(default)]
    pub latest_backend_git_tag: Option<String>,
    #[serde(default)]
    pub latest_frontend_git_tag: Option<String>,
    #[serde(default)]
    pub latest_discord_git_tag: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Frontend,
    Backend,
    Discord,
}

impl Component {
    pub fn repository(self) -> &'static str {
        match self {
            Component::Frontend => "NerdHub-Frontend",
            Component::Backend => "NerdHub-Backend",
            Component::Discord => "NerdHub-Discord",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Component::Frontend => "Frontend",
            Component::Backend => "Backend",
            Component::Discord => "Discord Bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionStatus {
    Development,
    UpToDate,
    UpdateAvailable(String),
    Unknown,
}

pub fn version_status(running: Option<&str>, latest: Option<&str>) -> VersionStatus {
    match (running, latest) {
        (Some(DEV_PRERELEASE), _) => VersionStatus::Development,
        (Some(running), Some(latest)) if running == latest => VersionStatus::UpToDate,
        (Some(_), Some(latest)) => VersionStatus::UpdateAvailable(latest.to_string()),
        _ => VersionStatus::Unknown,
    }
}

pub fn release_url(component: Component, tag: &str) -> String {
    format!(
        "{RELEASES_BASE}/{}/releases/tag/{tag}",
        component.repository()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_prerelease_never_needs_update() {
        assert_eq!(
            version_status(Some("dev-prerelease"), Some("v1.2.0")),
            VersionStatus::Development
        );
    }

    #[test]
    fn compares_running_against_latest() {
        assert_eq!(
            version_status(Some("v1.2.0"), Some("v1.2.0")),
            VersionStatus::UpToDate
        );
        assert_eq!(
            version_status(Some("v1.1.0"), Some("v1.2.0")),
            VersionStatus::UpdateAvailable("v1.2.0".to_string())
        );
        assert_eq!(version_status(None, Some("v1.2.0")), VersionStatus::Unknown);
        assert_eq!(version_status(Some("v1.2.0"), None), VersionStatus::Unknown);
    }

    #[test]
    fn builds_release_links() {
        assert_eq!(
            release_url(Component::Discord, "v3"),
            "https://github.com/TheNerdsHub/NerdHub-Discord/releases/tag/v3"
        );
    }
}
