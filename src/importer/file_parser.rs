// ==========================================
// 人事档案系统 - 文件解码器实现
// ==========================================
// 支持: Excel (.xlsx) / CSV (.csv)
// 约束: 保持行序；解码完整结束后才进入后续阶段
// ==========================================

use crate::domain::import::FlatRow;
use crate::domain::types::CellValue;
use crate::importer::employee_importer_trait::FileParser;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecordsIntoIter};
use std::fs::File;
use std::io::Read;
use std::path::Path;

// ==========================================
// FileFormat - 按扩展名选择解码器
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Xlsx,
    Csv,
}

impl FileFormat {
    /// 根据文件名扩展名判断格式（区分大小写）；其他扩展名直接拒绝
    pub fn from_file_name(file_name: &str) -> ImportResult<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match ext {
            "xlsx" => Ok(FileFormat::Xlsx),
            "csv" => Ok(FileFormat::Csv),
            _ => Err(ImportError::UnsupportedFormat(if ext.is_empty() {
                file_name.to_string()
            } else {
                format!(".{}", ext)
            })),
        }
    }

    pub fn parser(&self) -> Box<dyn FileParser> {
        match self {
            FileFormat::Xlsx => Box::new(ExcelParser),
            FileFormat::Csv => Box::new(CsvParser),
        }
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

/// CSV 惰性行流
///
/// 首行为表头，后续行按文件顺序逐条产出，读到流末尾结束
pub struct CsvRowStream<R: Read> {
    headers: Vec<String>,
    records: StringRecordsIntoIter<R>,
}

impl<R: Read> CsvRowStream<R> {
    pub fn new(reader: R) -> ImportResult<Self> {
        let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.to_string()).collect();

        Ok(Self {
            headers,
            records: csv_reader.into_records(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: Read> Iterator for CsvRowStream<R> {
    type Item = ImportResult<FlatRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };

        let row_number = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();

        let mut row = FlatRow::new(row_number);
        for (header, value) in self.headers.iter().zip(record.iter()) {
            row.push(header.clone(), CellValue::Text(value.to_string()));
        }
        Some(Ok(row))
    }
}

impl FileParser for CsvParser {
    fn parse_to_flat_rows(&self, file_path: &Path) -> ImportResult<Vec<FlatRow>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let file = File::open(file_path)?;
        let stream = CsvRowStream::new(file)?;

        // 任一行解析失败即整体失败（不返回部分结果）
        let rows = stream.collect::<ImportResult<Vec<FlatRow>>>()?;

        // 跳过完全空白的行
        Ok(rows.into_iter().filter(|r| !r.is_blank()).collect())
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_flat_rows(&self, file_path: &Path) -> ImportResult<Vec<FlatRow>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::InvalidWorksheet("workbook has no worksheets".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;
        if range.is_empty() {
            return Err(ImportError::InvalidWorksheet(format!(
                "worksheet `{}` is empty",
                sheet_name
            )));
        }

        // 区域起始行（0 起）；calamine 会裁掉开头的空行
        let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);
        let mut rows = range.rows();

        // 表头固定为工作表第 1 行；第 1 行为空时所有列均无法识别
        let (headers, data_start): (Vec<String>, usize) = if first_row == 0 {
            let header_row = rows.next().ok_or_else(|| {
                ImportError::InvalidWorksheet("worksheet has no header row".to_string())
            })?;
            let headers = header_row
                .iter()
                .map(|cell| cell_to_value(cell).to_string())
                .collect();
            (headers, 1)
        } else {
            (vec![String::new(); range.width()], first_row)
        };

        let mut records = Vec::new();
        for (offset, data_row) in rows.enumerate() {
            let values: Vec<CellValue> = data_row.iter().map(cell_to_value).collect();

            // 跳过完全空白的行
            if values.iter().all(CellValue::is_absent) {
                continue;
            }

            let mut row = FlatRow::new(data_start + offset + 1);
            for (header, value) in headers.iter().zip(values) {
                row.push(header.clone(), value);
            }
            records.push(row);
        }

        Ok(records)
    }
}

/// calamine 单元格 → 带标签标量
fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(_) => cell.as_date().map(CellValue::Date).unwrap_or(CellValue::Empty),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        // 错误单元格视为缺失
        Data::Error(_) | Data::Empty => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_format_by_extension() {
        assert_eq!(FileFormat::from_file_name("staff.xlsx").unwrap(), FileFormat::Xlsx);
        assert_eq!(FileFormat::from_file_name("staff.csv").unwrap(), FileFormat::Csv);

        let err = FileFormat::from_file_name("staff.txt").unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ref e) if e == ".txt"));
        assert!(FileFormat::from_file_name("staff.xls").is_err());
        assert!(FileFormat::from_file_name("staff").is_err());

        let err = FileFormat::from_file_name("STAFF.XLSX").unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ref e) if e == ".XLSX"));
    }

    #[test]
    fn test_csv_parser_preserves_order_and_raw_headers() {
        let file = csv_file("Employee ID,Full Name,Notes\nE001, Ada ,x\nE002,Grace,y\n");

        let rows = CsvParser.parse_to_flat_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Employee ID"), Some(&CellValue::Text("E001".to_string())));
        assert_eq!(rows[0].get("Full Name"), Some(&CellValue::Text(" Ada ".to_string())));
        assert_eq!(rows[1].get("Employee ID"), Some(&CellValue::Text("E002".to_string())));
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[1].row_number, 3);
    }

    #[test]
    fn test_csv_parser_skip_blank_rows() {
        let file = csv_file("Employee ID,Full Name\nE001,Ada\n,\nE002,Grace\n");

        let rows = CsvParser.parse_to_flat_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_csv_mid_stream_fault_aborts_decode() {
        // 第 3 行字段数不一致
        let file = csv_file("Employee ID,Full Name\nE001,Ada\nE002,Grace,extra\nE003,Linus\n");

        let err = CsvParser.parse_to_flat_rows(file.path()).unwrap_err();

        assert!(matches!(err, ImportError::ParseFailure { .. }), "{:?}", err);
    }

    #[test]
    fn test_csv_stream_is_lazy() {
        let data = "Employee ID\nE001\nE002\n";
        let mut stream = CsvRowStream::new(data.as_bytes()).unwrap();

        assert_eq!(stream.headers(), &["Employee ID".to_string()]);
        let first = stream.next().unwrap().unwrap();
        assert_eq!(first.get("Employee ID"), Some(&CellValue::Text("E001".to_string())));
        assert!(stream.next().is_some());
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_to_flat_rows(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_excel_parser_rejects_non_workbook() {
        let file = csv_file("not a zip archive");
        let result = ExcelParser.parse_to_flat_rows(file.path());
        assert!(matches!(result, Err(ImportError::ParseFailure { .. })));
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_to_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_to_value(&Data::Empty), CellValue::Empty);
        assert_eq!(
            cell_to_value(&Data::DateTimeIso("2024-02-29T00:00:00".to_string())),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert_eq!(cell_to_value(&Data::Bool(true)), CellValue::Text("true".to_string()));
    }
}
