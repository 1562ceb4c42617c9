// ==========================================
// 人事档案系统 - 上传受理与临时文件
// ==========================================
// 职责:
// - UploadIntake: MIME / 大小校验，暂存为 `<uuid>-<原文件名>`
// - TempUpload: 暂存文件守卫，删除且仅删除一次
// ==========================================

use crate::config::UploadLimits;
use crate::importer::error::{ImportError, ImportResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

// ==========================================
// TempUpload - 暂存文件守卫
// ==========================================
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    original_name: String,
    released: bool,
}

impl TempUpload {
    pub fn new(path: PathBuf, original_name: impl Into<String>) -> Self {
        Self {
            path,
            original_name: original_name.into(),
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 上传时的原始文件名（用于选择解码器）
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// 删除暂存文件；重复调用不会再次删除
    pub fn release(&mut self) -> ImportResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "临时文件已删除");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "临时文件已不存在");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.release() {
                warn!(path = %self.path.display(), error = %e, "临时文件删除失败");
            }
        }
    }
}

// ==========================================
// UploadIntake - 上传受理
// ==========================================
pub struct UploadIntake {
    limits: UploadLimits,
}

impl UploadIntake {
    pub fn new(limits: UploadLimits) -> Self {
        Self { limits }
    }

    /// 受理上传内容
    ///
    /// # 校验
    /// - MIME 类型必须在允许列表内
    /// - 大小不超过 max_bytes
    ///
    /// 校验失败时不写入任何文件
    pub fn accept(&self, original_name: &str, mime_type: &str, bytes: &[u8]) -> ImportResult<TempUpload> {
        self.check_mime(mime_type)?;
        self.check_size(bytes.len() as u64)?;

        let file_name = Path::new(original_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ImportError::UploadRejected(format!("invalid file name `{}`", original_name)))?;

        fs::create_dir_all(&self.limits.upload_dir)?;
        let path = self
            .limits
            .upload_dir
            .join(format!("{}-{}", Uuid::new_v4(), file_name));
        fs::write(&path, bytes)?;

        info!(
            file_name = %file_name,
            size = bytes.len(),
            path = %path.display(),
            "上传文件已暂存"
        );
        Ok(TempUpload::new(path, file_name))
    }

    /// 受理本地文件（复制暂存，原文件不受影响）
    pub fn accept_file(&self, source: &Path, mime_type: &str) -> ImportResult<TempUpload> {
        if !source.exists() {
            return Err(ImportError::FileNotFound(source.display().to_string()));
        }
        self.check_mime(mime_type)?;
        self.check_size(fs::metadata(source)?.len())?;

        let bytes = fs::read(source)?;
        let original_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        self.accept(original_name, mime_type, &bytes)
    }

    fn check_mime(&self, mime_type: &str) -> ImportResult<()> {
        if self.limits.allowed_mime_types.iter().any(|m| m == mime_type) {
            Ok(())
        } else {
            Err(ImportError::UploadRejected(mime_type.to_string()))
        }
    }

    fn check_size(&self, size: u64) -> ImportResult<()> {
        if size > self.limits.max_bytes {
            Err(ImportError::FileTooLarge {
                size,
                max: self.limits.max_bytes,
            })
        } else {
            Ok(())
        }
    }
}

/// 根据扩展名推断 MIME 类型
pub fn mime_for_file_name(file_name: &str) -> Option<&'static str> {
    match Path::new(file_name).extension()?.to_str()? {
        "xlsx" => Some(crate::config::MIME_XLSX),
        "csv" => Some(crate::config::MIME_CSV),
        _ => None,
    }
}
