use crate::errors::*;
use crate::grafeas::{
    CvssVersion, Detail, Note, Occurrence, PackageIssue, PackageType, RelatedUrl, Severity,
    Version,
};
use crate::normalize;
use crate::trivy::{Report, Vulnerability};
use serde::Serialize;
use std::collections::BTreeMap;

/// Identity of the scanned image, supplied alongside the report.
#[derive(Debug, Clone)]
pub struct ScanTarget {
    /// Registry uri of the image, eg. `us-docker.pkg.dev/project/repo/image@sha256:...`
    pub uri: String,
    /// Project id used in note resource names
    pub project: String,
}

pub type NoteOccurrencesMap = BTreeMap<String, NoteOccurrences>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteOccurrences {
    pub note: Note,
    pub occurrences: Vec<Occurrence>,
}

/// Converts a trivy report into a map of deduplicated notes with their
/// occurrences. Findings without any CVSS data are excluded entirely. On note
/// id collisions the first finding wins, later findings only contribute
/// occurrences.
pub fn convert(target: &ScanTarget, report: &Report) -> Result<NoteOccurrencesMap> {
    let results = report
        .results
        .as_ref()
        .context("Unable to find Results in source data")?;

    let mut list = NoteOccurrencesMap::new();

    for group in results {
        let package_type = group.package_type();

        for vuln in group.vulnerabilities.as_deref().unwrap_or_default() {
            let note = match convert_note(target, vuln) {
                Some(note) => note,
                None => {
                    debug!("Skipping {:?}: no CVSS data", vuln.vulnerability_id);
                    continue;
                }
            };

            let note_id = normalize::note_id(&note.short_description);

            let entry = list
                .entry(note_id.clone())
                .or_insert_with(|| NoteOccurrences {
                    note,
                    occurrences: Vec::new(),
                });

            if let Some(occurrence) = convert_occurrence(target, vuln, &note_id, package_type) {
                entry.occurrences.push(occurrence);
            }
        }
    }

    Ok(list)
}

/// Builds the note for one finding, or `None` if the finding carries neither
/// a v2 nor a v3 vector. When both vectors are present the v3 data overwrites
/// the v2 data.
fn convert_note(target: &ScanTarget, vuln: &Vulnerability) -> Option<Note> {
    let nvd = vuln.nvd()?;
    if nvd.v2_vector.is_none() && nvd.v3_vector.is_none() {
        return None;
    }

    let mut related_url = vec![RelatedUrl::new("Registry", &target.uri)];
    if let Some(url) = &vuln.primary_url {
        related_url.push(RelatedUrl::new("PrimaryURL", url));
    }

    let mut note = Note {
        short_description: vuln.vulnerability_id.clone(),
        long_description: String::new(),
        related_url,
        severity: Severity::from_scanner(vuln.severity.as_deref()),
        cvss_version: CvssVersion::Unspecified,
        cvss_score: 0.0,
        source_update_time: normalize::to_timestamp(vuln.last_modified_date.as_deref()),
        // notes are vulnerability-level records, the full package list is
        // never known here
        details: vec![Detail::placeholder()],
    };

    if let Some(vector) = &nvd.v2_vector {
        note.long_description = vector.clone();
        note.cvss_version = CvssVersion::V2;
        note.cvss_score = normalize::to_score(nvd.v2_score.as_ref());
    }

    // v3 always wins over v2
    if let Some(vector) = &nvd.v3_vector {
        note.long_description = vector.clone();
        note.cvss_version = CvssVersion::V3;
        note.cvss_score = normalize::to_score(nvd.v3_score.as_ref());
    }

    for url in vuln.references.as_deref().unwrap_or_default() {
        note.related_url.push(RelatedUrl::new("Url", url));
    }

    Some(note)
}

/// Builds the occurrence for one finding, gated on the same CVSS condition as
/// `convert_note` so a finding yields either both records or neither.
fn convert_occurrence(
    target: &ScanTarget,
    vuln: &Vulnerability,
    note_id: &str,
    package_type: PackageType,
) -> Option<Occurrence> {
    let nvd = vuln.nvd()?;
    if nvd.v2_vector.is_none() && nvd.v3_vector.is_none() {
        return None;
    }

    let mut related_urls = vec![RelatedUrl::new("Registry", &target.uri)];
    if let Some(url) = &vuln.primary_url {
        related_urls.push(RelatedUrl::new("PrimaryURL", url));
    }

    let severity = Severity::from_scanner(vuln.severity.as_deref());

    let mut occurrence = Occurrence {
        resource_uri: format!("https://{}", target.uri),
        note_name: format!("projects/{}/notes/{}", target.project, note_id),
        short_description: vuln.vulnerability_id.clone(),
        long_description: String::new(),
        related_urls,
        severity,
        // passthrough until a rule for distro-specific adjustments exists
        effective_severity: severity,
        cvss_version: CvssVersion::Unspecified,
        cvss_score: 0.0,
        package_issue: vec![package_issue(vuln, package_type)],
    };

    if let Some(vector) = &nvd.v2_vector {
        occurrence.long_description = vector.clone();
        occurrence.cvss_version = CvssVersion::V2;
        occurrence.cvss_score = normalize::to_score(nvd.v2_score.as_ref());
    }

    if let Some(vector) = &nvd.v3_vector {
        occurrence.long_description = vector.clone();
        occurrence.cvss_version = CvssVersion::V3;
        occurrence.cvss_score = normalize::to_score(nvd.v3_score.as_ref());
    }

    for url in vuln.references.as_deref().unwrap_or_default() {
        occurrence
            .related_urls
            .push(RelatedUrl::new("Url", url));
    }

    Some(occurrence)
}

fn package_issue(vuln: &Vulnerability, package_type: PackageType) -> PackageIssue {
    let cpe = make_cpe(vuln);
    let pkg_name = vuln.pkg_name.clone().unwrap_or_default();

    PackageIssue {
        package_type,
        affected_cpe_uri: cpe.clone(),
        affected_package: pkg_name.clone(),
        affected_version: Version::normal(vuln.installed_version.clone().unwrap_or_default()),
        fixed_cpe_uri: cpe,
        fixed_package: pkg_name,
        fixed_version: Version::maximum(),
    }
}

/// Best-effort CPE since trivy does not generate one. Missing components
/// become the CPE wildcard. Good enough for identification, not a complete
/// CPE generator.
/// Ref: https://en.wikipedia.org/wiki/Common_Platform_Enumeration
fn make_cpe(vuln: &Vulnerability) -> String {
    format!(
        "cpe:2.3:a:{}:{}:{}:*:*:*:*:*:*:*",
        vuln.severity_source.as_deref().unwrap_or("*"),
        vuln.pkg_name.as_deref().unwrap_or("*"),
        vuln.installed_version.as_deref().unwrap_or("*"),
    )
}
