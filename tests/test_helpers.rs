// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、用户种子、上传文件构造等功能
// ==========================================

#![allow(dead_code)]

use hr_records::app::AppState;
use hr_records::config::{config_keys, ConfigManager};
use hr_records::db::{ensure_schema, open_sqlite_connection};
use hr_records::domain::UserAccount;
use hr_records::repository::{UserAccountRepository, UserAccountRepositoryImpl};
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("非 UTF-8 路径")?.to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 写入全局配置
pub fn insert_test_config(db_path: &str, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let config = ConfigManager::new(db_path)?;
    config.set_global_config_value(key, value)?;
    Ok(())
}

// ==========================================
// 测试环境（数据库 + 上传目录 + AppState）
// ==========================================
pub struct TestEnv {
    _db_file: NamedTempFile,
    pub db_path: String,
    pub upload_dir: TempDir,
    pub work_dir: TempDir,
    pub state: AppState,
}

impl TestEnv {
    pub async fn new() -> Self {
        let (db_file, db_path) = create_test_db().expect("创建测试数据库失败");
        let upload_dir = TempDir::new().expect("创建上传目录失败");
        let work_dir = TempDir::new().expect("创建工作目录失败");

        insert_test_config(
            &db_path,
            config_keys::UPLOAD_DIR,
            upload_dir.path().to_str().expect("非 UTF-8 路径"),
        )
        .expect("写入上传目录配置失败");

        let state = AppState::new(db_path.clone()).await.expect("初始化AppState失败");

        Self {
            _db_file: db_file,
            db_path,
            upload_dir,
            work_dir,
            state,
        }
    }

    /// 上传目录中残留的文件数
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.work_dir.path().join(name)
    }

    pub async fn seed_user(&self, id: &str) {
        seed_user(&self.state.user_repo, id).await;
    }
}

/// 插入指定 ID 的未验证账号
pub async fn seed_user(repo: &UserAccountRepositoryImpl, id: &str) {
    let mut account = UserAccount::new(&format!("user-{}", id), &format!("{}@accounts.test", id));
    account.id = id.to_string();
    repo.insert(account).await.expect("插入测试账号失败");
}

// ==========================================
// 上传文件构造
// ==========================================

/// 写入 CSV 文件
pub fn write_csv(path: &Path, content: &str) -> Result<(), Box<dyn Error>> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// xlsx 单元格
#[derive(Debug, Clone)]
pub enum XlsxCell {
    Text(String),
    Number(f64),
    Empty,
}

pub fn text(s: &str) -> XlsxCell {
    XlsxCell::Text(s.to_string())
}

pub fn number(n: f64) -> XlsxCell {
    XlsxCell::Number(n)
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Employees" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

/// 写入最小 xlsx（单个工作表，文本使用 inlineStr）
pub fn write_xlsx(path: &Path, rows: &[Vec<XlsxCell>]) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", ROOT_RELS_XML.to_string()),
        ("xl/workbook.xml", WORKBOOK_XML.to_string()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.to_string()),
        ("xl/worksheets/sheet1.xml", sheet_xml(rows)),
    ];
    for (name, content) in parts {
        writer.start_file(name, options)?;
        writer.write_all(content.as_bytes())?;
    }
    writer.finish()?;
    Ok(())
}

fn sheet_xml(rows: &[Vec<XlsxCell>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    for (r, row) in rows.iter().enumerate() {
        let row_ref = r + 1;
        xml.push_str(&format!(r#"<row r="{}">"#, row_ref));
        for (c, cell) in row.iter().enumerate() {
            let cell_ref = format!("{}{}", column_letter(c), row_ref);
            match cell {
                XlsxCell::Text(s) => xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    cell_ref,
                    escape_xml(s)
                )),
                XlsxCell::Number(n) => {
                    xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, cell_ref, n))
                }
                XlsxCell::Empty => {}
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
