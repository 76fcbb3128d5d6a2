//! 作业文件的类型与大小规则
//!
//! MIME 类型与扩展名需要同时命中白名单，大小上限包含边界。

use crate::config::UploadConfig;
use crate::errors::{LearnHubError, Result};

pub const DEFAULT_MAX_SIZE: usize = 20 * 1024 * 1024;

pub const DEFAULT_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".odt", ".txt"];

pub const DEFAULT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.oasis.opendocument.text",
    "text/plain",
];

#[derive(Debug, Clone)]
pub struct SubmissionFileRules {
    pub max_size: usize,
    pub extensions: Vec<String>,
    pub mime_types: Vec<String>,
}

impl Default for SubmissionFileRules {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            mime_types: DEFAULT_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SubmissionFileRules {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            max_size: config.max_size,
            extensions: config
                .allowed_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            mime_types: config
                .allowed_mime_types
                .iter()
                .map(|m| normalize_mime(m))
                .collect(),
        }
    }

    /// 校验文件名与声明的 MIME 类型，返回小写扩展名（带点）
    pub fn check_type(&self, file_name: &str, mime_type: &str) -> Result<String> {
        let extension = extension_of(file_name)
            .ok_or_else(|| LearnHubError::invalid_file_type("File has no extension"))?;

        if !self.extensions.iter().any(|e| e == &extension) {
            return Err(LearnHubError::invalid_file_type(format!(
                "File extension {extension} is not allowed. Allowed: {}",
                self.extensions.join(", ")
            )));
        }

        let mime = normalize_mime(mime_type);
        if !self.mime_types.iter().any(|m| m == &mime) {
            return Err(LearnHubError::invalid_file_type(format!(
                "File type {mime} is not allowed"
            )));
        }

        Ok(extension)
    }

    /// 当前累计大小超过上限时返回 FileTooLarge
    pub fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_size {
            return Err(LearnHubError::file_too_large(format!(
                "File size exceeds the limit of {} bytes",
                self.max_size
            )));
        }
        Ok(())
    }
}

/// 去掉参数（如 charset）并转为小写
fn normalize_mime(mime: &str) -> String {
    mime.split(';').next().unwrap_or("").trim().to_lowercase()
}

fn extension_of(file_name: &str) -> Option<String> {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let dot = name.rfind('.')?;
    // ".txt" 这种只有扩展名的文件名不算有扩展名
    if dot == 0 || dot == name.len() - 1 {
        return None;
    }
    Some(name[dot..].to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_both_mime_and_extension() {
        let rules = SubmissionFileRules::default();
        assert_eq!(
            rules.check_type("report.pdf", "application/pdf").unwrap(),
            ".pdf"
        );
        // MIME 合法但扩展名不合法
        assert!(rules.check_type("report.exe", "application/pdf").is_err());
        // 扩展名合法但 MIME 不合法
        assert!(
            rules
                .check_type("report.pdf", "application/octet-stream")
                .is_err()
        );
    }

    #[test]
    fn test_extension_case_and_mime_parameters() {
        let rules = SubmissionFileRules::default();
        assert_eq!(
            rules
                .check_type("NOTES.TXT", "text/plain; charset=utf-8")
                .unwrap(),
            ".txt"
        );
        assert!(
            rules
                .check_type(
                    "essay.docx",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                )
                .is_ok()
        );
        assert!(
            rules
                .check_type("essay.odt", "application/vnd.oasis.opendocument.text")
                .is_ok()
        );
    }

    #[test]
    fn test_missing_extension() {
        let rules = SubmissionFileRules::default();
        assert!(rules.check_type("README", "text/plain").is_err());
        assert!(rules.check_type(".txt", "text/plain").is_err());
        assert!(rules.check_type("trailing.", "text/plain").is_err());
    }

    #[test]
    fn test_size_boundary_is_inclusive() {
        let rules = SubmissionFileRules::default();
        assert!(rules.check_size(20 * 1024 * 1024).is_ok());
        let err = rules.check_size(20 * 1024 * 1024 + 1).unwrap_err();
        assert_eq!(err.code(), "E017");
    }

    #[test]
    fn test_invalid_type_error_kind() {
        let rules = SubmissionFileRules::default();
        let err = rules.check_type("image.png", "image/png").unwrap_err();
        assert_eq!(err.code(), "E016");
    }
}
