use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;
use strum::{Display, EnumString, EnumVariantNames};

/// Grafeas vulnerability note, one per distinct vulnerability id. The resource
/// name (`projects/<project>/notes/<id>`) is assigned by the uploader, not
/// here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub short_description: String,
    pub long_description: String,
    pub related_url: Vec<RelatedUrl>,
    pub severity: Severity,
    pub cvss_version: CvssVersion,
    pub cvss_score: f32,
    pub source_update_time: DateTime<Utc>,
    pub details: Vec<Detail>,
}

/// One instance of a note being found in a scanned resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub resource_uri: String,
    pub note_name: String,
    pub short_description: String,
    pub long_description: String,
    pub related_urls: Vec<RelatedUrl>,
    pub severity: Severity,
    pub effective_severity: Severity,
    pub cvss_version: CvssVersion,
    pub cvss_score: f32,
    pub package_issue: Vec<PackageIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedUrl {
    pub url: String,
    pub label: String,
}

impl RelatedUrl {
    pub fn new(label: &str, url: &str) -> RelatedUrl {
        RelatedUrl {
            url: url.to_string(),
            label: label.to_string(),
        }
    }
}

/// Note-level package detail. Notes are vulnerability-level records, so no
/// meaningful package exists here and a sentinel is emitted instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    pub affected_cpe_uri: String,
    pub affected_package: String,
}

impl Detail {
    pub fn placeholder() -> Detail {
        Detail {
            affected_cpe_uri: "N/A".to_string(),
            affected_package: "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageIssue {
    pub package_type: PackageType,
    pub affected_cpe_uri: String,
    pub affected_package: String,
    pub affected_version: Version,
    pub fixed_cpe_uri: String,
    pub fixed_package: String,
    pub fixed_version: Version,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: VersionKind,
}

impl Version {
    pub fn normal(name: String) -> Version {
        Version {
            name: Some(name),
            kind: VersionKind::Normal,
        }
    }

    /// Trivy rarely knows the exact remediation version, so fixed versions
    /// are reported as an open upper bound.
    pub fn maximum() -> Version {
        Version {
            name: None,
            kind: VersionKind::Maximum,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VersionKind {
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "MAXIMUM")]
    Maximum,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString, EnumVariantNames,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    #[default]
    #[strum(serialize = "SEVERITY_UNSPECIFIED")]
    #[serde(rename = "SEVERITY_UNSPECIFIED")]
    Unspecified,
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Maps the scanner's severity vocabulary onto the canonical enum.
    /// Unknown strings (eg. trivy's `UNKNOWN`) and absent fields become
    /// `SEVERITY_UNSPECIFIED`, never an error.
    pub fn from_scanner(severity: Option<&str>) -> Severity {
        severity
            .and_then(|s| Severity::from_str(s).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CvssVersion {
    #[serde(rename = "CVSS_VERSION_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "CVSS_VERSION_2")]
    V2,
    #[serde(rename = "CVSS_VERSION_3")]
    V3,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString, EnumVariantNames,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PackageType {
    Os,
    Go,
    Maven,
    Npm,
    Nuget,
    Pypi,
    Composer,
    Rubygems,
    Rust,
    Unknown,
}

impl PackageType {
    /// Maps trivy's `Type` values for `lang-pkgs` groups to an ecosystem tag.
    pub fn from_trivy(r#type: Option<&str>) -> PackageType {
        match r#type {
            Some("gomod" | "gobinary") => PackageType::Go,
            Some("jar" | "pom" | "gradle") => PackageType::Maven,
            Some("npm" | "node-pkg" | "yarn" | "pnpm") => PackageType::Npm,
            Some("nuget" | "dotnet-core") => PackageType::Nuget,
            Some("pip" | "pipenv" | "poetry" | "python-pkg") => PackageType::Pypi,
            Some("composer") => PackageType::Composer,
            Some("gemspec" | "bundler") => PackageType::Rubygems,
            Some("cargo" | "rust-binary") => PackageType::Rust,
            _ => PackageType::Unknown,
        }
    }
}
