//! 表格导出 - 业务能力层
//!
//! 列 = 学号、姓名、按字典序排列的全部科目名称、SGPA、结论。
//! 表头和结论字面量是下游表格工具依赖的固定约定。

use crate::error::AppResult;
use crate::models::StudentRecord;
use std::collections::BTreeSet;
use std::io::Write;

const MISSING_GRADE: &str = "N/A";

/// 导出表格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// 所有记录中出现过的科目名称，字典序
pub fn subject_titles(records: &[StudentRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.subjects.iter().map(|s| s.title.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 构建导出表格，行顺序与输入一致
pub fn build_table(records: &[StudentRecord]) -> ExportTable {
    let titles = subject_titles(records);

    let mut header = Vec::with_capacity(titles.len() + 4);
    header.push("Identifier".to_string());
    header.push("Name".to_string());
    header.extend(titles.iter().cloned());
    header.push("Score".to_string());
    header.push("Verdict".to_string());

    let rows = records
        .iter()
        .map(|record| {
            let mut row = Vec::with_capacity(header.len());
            row.push(record.identifier.to_string());
            row.push(record.name.clone());
            row.extend(
                titles
                    .iter()
                    .map(|title| record.grade_for(title).unwrap_or(MISSING_GRADE).to_string()),
            );
            row.push(record.score.clone());
            row.push(record.verdict().as_str().to_string());
            row
        })
        .collect();

    ExportTable { header, rows }
}

/// 以 CSV 写出
pub fn write_csv<W: Write>(records: &[StudentRecord], writer: W) -> AppResult<()> {
    let table = build_table(records);
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(&table.header)?;
    for row in &table.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// 导出文件名
pub fn export_file_name(section: &str) -> String {
    format!("{}_Results.csv", section)
}
