//! Checks run on the upload step before anything is sent to the gateway.

use thiserror::Error;

/// File extensions accepted by the bulk import, lower case.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["csv", "tsv", "xlsx"];

/// MIME types accepted by the bulk import.
pub const ALLOWED_MIME_TYPES: [&str; 4] = [
    "text/csv",
    "text/tab-separated-values",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Value of the `accept` attribute of the file input.
pub fn accept_attribute() -> String {
    ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .chain(ALLOWED_MIME_TYPES.iter().map(|mime| mime.to_string()))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Please select the repository to import into.")]
    MissingRepository,
    #[error("Please select a file to upload.")]
    MissingFile,
    #[error("Only one file can be uploaded at a time.")]
    TooManyFiles,
    #[error("{file_name} is not a CSV, TSV or Excel file.")]
    UnsupportedType { file_name: String },
    #[error("{file_name} is larger than the {limit} byte limit.")]
    TooLarge { file_name: String, limit: u64 },
}

/// What the browser reports about a picked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
}

impl UploadCandidate {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    /// Lower-cased extension after the last dot, if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    fn has_allowed_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
    }

    fn has_allowed_mime_type(&self) -> bool {
        // Browsers may append parameters such as `; charset=utf-8`.
        let essence = self
            .mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        ALLOWED_MIME_TYPES.contains(&essence.as_str())
    }

    /// Accepted when the extension or the MIME type is allowed.
    pub fn is_supported(&self) -> bool {
        self.has_allowed_extension() || self.has_allowed_mime_type()
    }
}

/// Validates an upload submission in order: repository, file count, type,
/// size. Returns the single accepted file.
pub fn validate_upload<'a>(
    repository_id: Option<&str>,
    files: &'a [UploadCandidate],
    max_size: u64,
) -> Result<&'a UploadCandidate, UploadError> {
    if repository_id.is_none_or(|id| id.trim().is_empty()) {
        return Err(UploadError::MissingRepository);
    }
    let file = match files {
        [] => return Err(UploadError::MissingFile),
        [file] => file,
        _ => return Err(UploadError::TooManyFiles),
    };
    if !file.is_supported() {
        return Err(UploadError::UnsupportedType {
            file_name: file.file_name.clone(),
        });
    }
    if file.size > max_size {
        return Err(UploadError::TooLarge {
            file_name: file.file_name.clone(),
            limit: max_size,
        });
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LIMIT: u64 = 1024;

    #[rstest]
    #[case("users.csv", "")]
    #[case("USERS.TSV", "application/octet-stream")]
    #[case("users.xlsx", "")]
    #[case("export", "text/csv")]
    #[case("users.txt", "text/csv; charset=utf-8")]
    #[case("users.bin", "application/vnd.ms-excel")]
    fn accepts_when_extension_or_mime_matches(#[case] name: &str, #[case] mime: &str) {
        let files = [UploadCandidate::new(name, mime, 10)];
        assert!(validate_upload(Some("repo-1"), &files, LIMIT).is_ok());
    }

    #[rstest]
    #[case("users.pdf", "application/pdf")]
    #[case("users", "")]
    #[case(".csv", "image/png")]
    fn rejects_when_both_checks_fail(#[case] name: &str, #[case] mime: &str) {
        let files = [UploadCandidate::new(name, mime, 10)];
        assert_eq!(
            validate_upload(Some("repo-1"), &files, LIMIT),
            Err(UploadError::UnsupportedType {
                file_name: name.to_string()
            })
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("  "))]
    fn repository_is_checked_first(#[case] repository: Option<&str>) {
        let files = [UploadCandidate::new("users.pdf", "application/pdf", 10)];
        assert_eq!(
            validate_upload(repository, &files, LIMIT),
            Err(UploadError::MissingRepository)
        );
    }

    #[test]
    fn requires_exactly_one_file() {
        let one = UploadCandidate::new("a.csv", "text/csv", 1);
        assert_eq!(
            validate_upload(Some("r"), &[], LIMIT),
            Err(UploadError::MissingFile)
        );
        assert_eq!(
            validate_upload(Some("r"), &[one.clone(), one], LIMIT),
            Err(UploadError::TooManyFiles)
        );
    }

    #[test]
    fn rejects_oversized_files() {
        let files = [UploadCandidate::new("big.csv", "text/csv", LIMIT + 1)];
        assert!(matches!(
            validate_upload(Some("r"), &files, LIMIT),
            Err(UploadError::TooLarge { limit: LIMIT, .. })
        ));
    }

    #[test]
    fn accept_attribute_lists_extensions_and_types() {
        let accept = accept_attribute();
        assert!(accept.starts_with(".csv,.tsv,.xlsx,text/csv"));
    }
}
