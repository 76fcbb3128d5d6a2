//! 接收 multipart 中的作业文件
//!
//! 边读边写盘，类型、大小、魔术字节任一不符即删除已写入的部分。

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures_util::{StreamExt, TryStreamExt};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, warn};
use uuid::Uuid;

use crate::errors::LearnHubError;
use crate::models::submissions::entities::NewSubmissionFile;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::{SubmissionFileRules, validate_magic_bytes};

const FILE_FIELD: &str = "file";
/// 魔术字节检查读取的开头长度
const HEAD_LEN: usize = 512;

/// 已落盘但尚未入库的文件，未 `keep` 时析构即删除
pub struct ReceivedFile {
    path: PathBuf,
    stored_name: String,
    original_name: String,
    mime_type: String,
    size: usize,
    kept: bool,
}

impl ReceivedFile {
    pub fn to_new_file(&self) -> NewSubmissionFile {
        NewSubmissionFile {
            stored_name: self.stored_name.clone(),
            original_name: self.original_name.clone(),
            mime_type: self.mime_type.clone(),
            file_size: self.size as i64,
        }
    }

    /// 入库成功后保留文件
    pub fn keep(mut self) {
        self.kept = true;
    }
}

impl Drop for ReceivedFile {
    fn drop(&mut self) {
        if !self.kept
            && let Err(e) = fs::remove_file(&self.path)
        {
            warn!("Failed to remove rejected upload {:?}: {}", self.path, e);
        }
    }
}

fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

fn write_failed(e: std::io::Error) -> HttpResponse {
    error!("{}", LearnHubError::file_operation(e.to_string()));
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::FileUploadFailed,
        "Failed to store uploaded file",
    ))
}

/// 读取唯一的 `file` 字段并写入 `dir`
pub async fn receive_submission_file(
    mut payload: Multipart,
    rules: &SubmissionFileRules,
    dir: &Path,
) -> Result<ReceivedFile, HttpResponse> {
    let mut received: Option<ReceivedFile> = None;

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(bad_request(
                    ErrorCode::BadRequest,
                    format!("Malformed multipart payload: {e}"),
                ));
            }
        };

        let (name, original_name) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or_default().to_string(),
                cd.get_filename().unwrap_or_default().to_string(),
            ),
            None => (String::new(), String::new()),
        };
        if name != FILE_FIELD {
            continue;
        }
        if received.is_some() {
            return Err(bad_request(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be submitted at a time",
            ));
        }

        let mime_type = field
            .content_type()
            .map(|ct| ct.essence_str().to_string())
            .unwrap_or_default();
        let extension = rules
            .check_type(&original_name, &mime_type)
            .map_err(|e| e.to_http_response())?;

        fs::create_dir_all(dir).map_err(write_failed)?;
        let stored_name = format!("{}-{}.bin", chrono::Utc::now().timestamp(), Uuid::new_v4());
        let path = dir.join(&stored_name);
        let mut file = File::create(&path).map_err(write_failed)?;

        // 从这里开始出错会由 Drop 清理文件
        let mut upload = ReceivedFile {
            path,
            stored_name,
            original_name,
            mime_type,
            size: 0,
            kept: false,
        };

        let mut head: Vec<u8> = Vec::with_capacity(HEAD_LEN);
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| {
                bad_request(ErrorCode::BadRequest, format!("Upload interrupted: {e}"))
            })?;

            upload.size += data.len();
            rules
                .check_size(upload.size)
                .map_err(|e| e.to_http_response())?;

            if head.len() < HEAD_LEN {
                let take = (HEAD_LEN - head.len()).min(data.len());
                head.extend_from_slice(&data[..take]);
            }
            file.write_all(&data).map_err(write_failed)?;
        }
        file.flush().map_err(write_failed)?;

        if upload.size == 0 {
            return Err(bad_request(ErrorCode::ValidationFailed, "Uploaded file is empty"));
        }
        if !validate_magic_bytes(&head, &extension) {
            return Err(bad_request(
                ErrorCode::InvalidFileType,
                "File content does not match its extension",
            ));
        }

        received = Some(upload);
    }

    received.ok_or_else(|| {
        bad_request(
            ErrorCode::FileNotFound,
            "No file found in upload payload (expected field 'file')",
        )
    })
}
