//! 选课 CSV 导入解析
//!
//! 必需列：`matric_number` 或 `student_id` 之一，`course_code` 或 `course_id` 之一；
//! 可选列 `session_id`。表头大小写不敏感。

use std::collections::HashMap;
use std::io::Cursor;

use serde::Serialize;

use super::requests::CreateEnrollmentRequest;
use crate::models::ErrorCode;

/// 导入解析错误
#[derive(Debug, Clone, PartialEq)]
pub enum ImportParseError {
    MissingColumn(String),
    ParseFailed(String),
    TooManyRows(usize),
    Empty,
}

impl ImportParseError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingColumn(_) => ErrorCode::ImportFileMissingColumn,
            Self::ParseFailed(_) => ErrorCode::ImportFileParseFailed,
            Self::TooManyRows(_) | Self::Empty => ErrorCode::ImportFileDataInvalid,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::MissingColumn(col) => format!("Missing required column: {col}"),
            Self::ParseFailed(msg) => msg.clone(),
            Self::TooManyRows(max) => format!("At most {max} rows can be imported at once"),
            Self::Empty => "The file contains no data rows".to_string(),
        }
    }
}

/// 导入行，row 为文件中的行号（表头为第 1 行）
#[derive(Debug, Clone, Serialize)]
pub struct ImportRow {
    pub row: usize,
    #[serde(flatten)]
    pub request: CreateEnrollmentRequest,
}

/// 行内字段错误（非数字 ID 等），不阻止其他行
#[derive(Debug, Clone, Serialize)]
pub struct ImportRowError {
    pub row: usize,
    pub message: String,
}

pub struct ParsedImport {
    pub rows: Vec<ImportRow>,
    pub errors: Vec<ImportRowError>,
}

fn column(headers: &HashMap<String, usize>, name: &str) -> Option<usize> {
    headers.get(name).copied()
}

pub fn parse_enrollment_csv(data: &[u8], max_rows: usize) -> Result<ParsedImport, ImportParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(data));

    let headers = rdr
        .headers()
        .map_err(|e| ImportParseError::ParseFailed(format!("Failed to read header: {e}")))?;
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim_start_matches('\u{feff}').to_lowercase(), i))
        .collect();

    let matric_idx = column(&header_map, "matric_number");
    let student_idx = column(&header_map, "student_id");
    if matric_idx.is_none() && student_idx.is_none() {
        return Err(ImportParseError::MissingColumn(
            "matric_number or student_id".to_string(),
        ));
    }
    let code_idx = column(&header_map, "course_code");
    let course_idx = column(&header_map, "course_id");
    if code_idx.is_none() && course_idx.is_none() {
        return Err(ImportParseError::MissingColumn(
            "course_code or course_id".to_string(),
        ));
    }
    let session_idx = column(&header_map, "session_id");

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    // 空行会被 csv 跳过，行号取记录自身位置
    for result in rdr.records() {
        let record = result.map_err(|e| {
            let line = e.position().map_or(0, |p| p.line());
            ImportParseError::ParseFailed(format!("Row {line} is malformed: {e}"))
        })?;
        let row = record.position().map_or(0, |p| p.line() as usize);
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        if rows.len() + errors.len() >= max_rows {
            return Err(ImportParseError::TooManyRows(max_rows));
        }

        let text = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::to_string)
                .filter(|s| !s.is_empty())
        };
        let number = |idx: Option<usize>, name: &str| -> Result<Option<i64>, String> {
            match text(idx) {
                None => Ok(None),
                Some(v) => v
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| format!("{name} '{v}' is not a number")),
            }
        };

        let parsed = (|| -> Result<CreateEnrollmentRequest, String> {
            Ok(CreateEnrollmentRequest {
                student_id: number(student_idx, "student_id")?,
                matric_number: text(matric_idx),
                course_id: number(course_idx, "course_id")?,
                course_code: text(code_idx),
                session_id: number(session_idx, "session_id")?,
            })
        })();

        match parsed {
            Ok(request) => rows.push(ImportRow { row, request }),
            Err(message) => errors.push(ImportRowError { row, message }),
        }
    }

    if rows.is_empty() && errors.is_empty() {
        return Err(ImportParseError::Empty);
    }
    Ok(ParsedImport { rows, errors })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows_with_mixed_identifiers() {
        let csv = "Matric_Number,course_code,session_id\nCSC/001,CSC301,\n,CSC302,4\nCSC/003,MTH101,x\n\n";
        let parsed = parse_enrollment_csv(csv.as_bytes(), 100).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].row, 2);
        assert_eq!(parsed.rows[0].request.matric_number.as_deref(), Some("CSC/001"));
        assert_eq!(parsed.rows[0].request.session_id, None);
        assert_eq!(parsed.rows[1].request.matric_number, None);
        assert_eq!(parsed.rows[1].request.session_id, Some(4));
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].row, 4);
    }

    #[test]
    fn test_row_numbers_survive_blank_lines() {
        let csv = "student_id,course_id\n1,1\n\n\n2,x\n3,2\n";
        let parsed = parse_enrollment_csv(csv.as_bytes(), 100).unwrap();
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].row, 5);
        let rows: Vec<usize> = parsed.rows.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![2, 6]);
    }

    #[test]
    fn test_missing_columns() {
        let err = parse_enrollment_csv(b"name,course_code\nAda,CSC301\n", 100)
            .err()
            .unwrap();
        assert_eq!(err.error_code(), ErrorCode::ImportFileMissingColumn);

        let err = parse_enrollment_csv(b"student_id,title\n1,OS\n", 100).err().unwrap();
        assert!(matches!(err, ImportParseError::MissingColumn(_)));
    }

    #[test]
    fn test_row_limits() {
        let err = parse_enrollment_csv(b"student_id,course_id\n", 10).err().unwrap();
        assert_eq!(err, ImportParseError::Empty);

        let csv = "student_id,course_id\n1,1\n2,1\n3,1\n";
        let err = parse_enrollment_csv(csv.as_bytes(), 2).err().unwrap();
        assert_eq!(err, ImportParseError::TooManyRows(2));
    }
}
