// ==========================================
// 人事档案系统 - 导入层
// ==========================================
// 职责: 上传文件 → 员工档案批量落库
// 支持: Excel (.xlsx), CSV
// ==========================================

// 模块声明
pub mod bulk_commit;
pub mod employee_importer_impl;
pub mod employee_importer_trait;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod record_normalizer;
pub mod reference_validator;
pub mod temp_upload;

// 重导出核心类型
pub use bulk_commit::{primary_error, BulkCommitCoordinator};
pub use employee_importer_impl::EmployeeImporterImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, CsvRowStream, ExcelParser, FileFormat};
pub use record_normalizer::RecordNormalizer;
pub use reference_validator::ReferenceValidator;
pub use temp_upload::{mime_for_file_name, TempUpload, UploadIntake};

// 重导出 Trait 接口
pub use employee_importer_trait::{EmployeeImporter, FileParser, HeaderMapper};
