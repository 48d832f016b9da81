//! 表格读写：上传文件解码为行、生成导入模板

use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use rust_xlsxwriter::{Format, Workbook};

use super::normalizer::{CellValue, RawRow};
use super::pipeline::ImportError;

pub const TEMPLATE_FILE_NAME: &str = "winners_template.xlsx";
pub const TEMPLATE_SHEET_NAME: &str = "Winners";

pub const TEMPLATE_HEADERS: [&str; 8] = [
    "Phone No",
    "Name",
    "Address",
    "Paid",
    "Product",
    "Prize Amount:",
    "Date:",
    "Status",
];

const TEMPLATE_SAMPLE_ROW: [&str; 8] = [
    "9876543210",
    "John Doe",
    "123 Main Street, City, State",
    "Yes",
    "Lucky Draw Prize",
    "1000",
    "2024-01-01",
    "Approved",
];

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(n) => CellValue::Int(*n),
        Data::Float(n) => CellValue::Float(*n),
        Data::Bool(b) => CellValue::Bool(*b),
        // 日期单元格统一为 YYYY-MM-DD
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::Text(ndt.format("%Y-%m-%d").to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#{e:?}")),
    }
}

/// 读取第一个工作表：首行为表头，其余每行按表头映射为一条记录
///
/// 完全空白的行跳过；表头为空的列忽略。
pub fn decode_workbook(path: &Path) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| ImportError::Decode(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| ImportError::Decode(e.to_string()))?,
        None => return Err(ImportError::EmptyFile),
    };

    let mut rows = range.rows();
    let headers: Vec<Option<String>> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| to_cell(cell).as_text())
            .collect(),
        None => return Ok(Vec::new()),
    };

    let records = rows
        .filter_map(|cells| {
            let record: RawRow = headers
                .iter()
                .zip(cells.iter())
                .filter_map(|(header, cell)| {
                    let header = header.as_ref()?;
                    let value = to_cell(cell);
                    value.as_text().map(|_| (header.clone(), value))
                })
                .collect();
            (!record.is_empty()).then_some(record)
        })
        .collect();

    Ok(records)
}

/// 生成导入模板（表头 + 一行示例）
pub fn winner_template() -> Result<Vec<u8>, rust_xlsxwriter::XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(TEMPLATE_SHEET_NAME)?;

    for (col, header) in TEMPLATE_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        worksheet.set_column_width(col as u16, 18)?;
    }
    for (col, value) in TEMPLATE_SAMPLE_ROW.iter().enumerate() {
        worksheet.write_string(1, col as u16, *value)?;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::normalizer::{ImportProfile, normalize_row};
    use std::io::Write;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".xlsx")
            .tempfile()
            .unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_template_decodes_to_sample_row() {
        let bytes = winner_template().unwrap();
        let file = write_temp(&bytes);

        let rows = decode_workbook(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].get("Phone No"),
            Some(&CellValue::Text("9876543210".into()))
        );
        assert_eq!(
            rows[0].get("Prize Amount:"),
            Some(&CellValue::Text("1000".into()))
        );

        let candidate = normalize_row(&rows[0], 0, &ImportProfile::admin("Active"));
        assert_eq!(candidate.phone, "9876543210");
        assert_eq!(candidate.date, "2024-01-01");
        assert_eq!(candidate.status, "Approved");
        assert!(!candidate.is_missing_required());
    }

    #[test]
    fn test_blank_rows_and_numbers() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Phone").unwrap();
        sheet.write_string(0, 1, "Name").unwrap();
        sheet.write_number(1, 0, 9876543210.0).unwrap();
        sheet.write_string(1, 1, "A").unwrap();
        // 第 3 行留空
        sheet.write_string(3, 1, "B").unwrap();
        let file = write_temp(&workbook.save_to_buffer().unwrap());

        let rows = decode_workbook(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("Phone").and_then(CellValue::as_text),
            Some("9876543210".to_string())
        );
        assert!(!rows[1].contains_key("Phone"));
        assert_eq!(
            rows[1].get("Name").and_then(CellValue::as_text),
            Some("B".to_string())
        );
    }

    #[test]
    fn test_header_only_sheet_has_no_rows() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Phone").unwrap();
        let file = write_temp(&workbook.save_to_buffer().unwrap());

        assert!(decode_workbook(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let file = write_temp(b"definitely not a zip archive");
        assert!(matches!(
            decode_workbook(file.path()),
            Err(ImportError::Decode(_))
        ));
    }
}
