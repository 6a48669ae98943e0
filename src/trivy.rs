use crate::grafeas::PackageType;
use serde::Deserialize;

/// Top-level shape of a `trivy image --format json` report. Everything except
/// the vulnerability id is optional in practice, so absence is modelled
/// explicitly instead of cast at lookup time.
#[derive(Debug, Deserialize)]
pub struct Report {
    #[serde(rename = "Results")]
    pub results: Option<Vec<ResultGroup>>,
}

#[derive(Debug, Deserialize)]
pub struct ResultGroup {
    #[serde(rename = "Target")]
    pub target: Option<String>,
    #[serde(rename = "Class")]
    pub class: Option<String>,
    #[serde(rename = "Type")]
    pub r#type: Option<String>,
    #[serde(rename = "Vulnerabilities")]
    pub vulnerabilities: Option<Vec<Vulnerability>>,
}

impl ResultGroup {
    /// Trivy reports OS packages with `Class` values like `os-pkgs`. Only
    /// `lang-pkgs` groups carry an ecosystem in their `Type` field.
    pub fn package_type(&self) -> PackageType {
        if self.class.as_deref() != Some("lang-pkgs") {
            PackageType::Os
        } else {
            PackageType::from_trivy(self.r#type.as_deref())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Vulnerability {
    #[serde(rename = "VulnerabilityID")]
    pub vulnerability_id: String,
    #[serde(rename = "Severity")]
    pub severity: Option<String>,
    #[serde(rename = "SeveritySource")]
    pub severity_source: Option<String>,
    #[serde(rename = "PkgName")]
    pub pkg_name: Option<String>,
    #[serde(rename = "InstalledVersion")]
    pub installed_version: Option<String>,
    #[serde(rename = "PrimaryURL")]
    pub primary_url: Option<String>,
    #[serde(rename = "References")]
    pub references: Option<Vec<String>>,
    #[serde(rename = "LastModifiedDate")]
    pub last_modified_date: Option<String>,
    #[serde(rename = "CVSS")]
    pub cvss: Option<Cvss>,
}

impl Vulnerability {
    pub fn nvd(&self) -> Option<&CvssData> {
        self.cvss.as_ref().and_then(|cvss| cvss.nvd.as_ref())
    }
}

/// Trivy keys CVSS data by source (`nvd`, `redhat`, ...). Only the nvd entry
/// is consumed, other sources are ignored during deserialization.
#[derive(Debug, Deserialize)]
pub struct Cvss {
    pub nvd: Option<CvssData>,
}

/// Scores are kept as raw json values because scanners have emitted them as
/// floats, integers and strings. Coercion happens in `normalize::to_score`.
#[derive(Debug, Deserialize)]
pub struct CvssData {
    #[serde(rename = "V2Vector")]
    pub v2_vector: Option<String>,
    #[serde(rename = "V2Score")]
    pub v2_score: Option<serde_json::Value>,
    #[serde(rename = "V3Vector")]
    pub v3_vector: Option<String>,
    #[serde(rename = "V3Score")]
    pub v3_score: Option<serde_json::Value>,
}
