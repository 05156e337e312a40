//! 成绩页面解析 - 业务能力层
//!
//! 只负责"从一个页面里读出一条记录"，页面结构不稳定，
//! 任何意外都只影响当前学号，降级为 NotFound

use crate::models::record::ZERO_SCORE;
use crate::models::{Identifier, StudentRecord, SubjectEntry};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;

const NAME_LABEL: &str = "Student Name";
const SCORE_LABEL: &str = "SGPA";
const WITHHELD_MARKER: &str = "withheld";
const UNKNOWN_NAME: &str = "Unknown";
const MIN_SUBJECT_CELLS: usize = 6;

/// 页面解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// 正常成绩
    Record(StudentRecord),
    /// 成绩被扣留
    Withheld(StudentRecord),
    /// 该学号在本次考试中没有成绩
    NotFound(NotFoundReason),
}

impl Extraction {
    /// 正常和扣留都保留为记录
    pub fn into_record(self) -> Option<StudentRecord> {
        match self {
            Extraction::Record(r) | Extraction::Withheld(r) => Some(r),
            Extraction::NotFound(_) => None,
        }
    }
}

/// 判定为 NotFound 的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundReason {
    /// 页面中没有 "Student Name" 标签
    #[error("页面中没有学生姓名")]
    NoNameLabel,
    /// 页面结构和预期不符
    #[error("页面结构异常: {0}")]
    StructuralMismatch(&'static str),
}

enum LabelLookup {
    Missing,
    Orphan,
    Value(String),
}

/// 解析一个成绩页面
///
/// 顺序：
/// 1. 页面文字含 "withheld"（忽略大小写）→ 扣留
/// 2. 没有 "Student Name" 标签 → NotFound
/// 3. 姓名为空或为 "Unknown" → 扣留
/// 4. SGPA 标签后没有单元格 → NotFound；SGPA 缺失或为空 → "0.00"
/// 5. 成绩表逐行读取科目
pub fn extract(document: &str, identifier: &Identifier) -> Extraction {
    let html = Html::parse_document(document);

    if visible_text_lowercase(&html).contains(WITHHELD_MARKER) {
        debug!("{}: 页面标记为扣留", identifier);
        return Extraction::Withheld(StudentRecord::withheld(identifier.clone()));
    }

    let name = match labelled_value(&html, NAME_LABEL) {
        LabelLookup::Missing => return Extraction::NotFound(NotFoundReason::NoNameLabel),
        LabelLookup::Orphan => {
            return Extraction::NotFound(NotFoundReason::StructuralMismatch("姓名标签后没有单元格"))
        }
        LabelLookup::Value(name) => name,
    };

    if name.is_empty() || name == UNKNOWN_NAME {
        debug!("{}: 姓名缺失，按扣留处理", identifier);
        return Extraction::Withheld(StudentRecord::withheld(identifier.clone()));
    }

    let score = match labelled_value(&html, SCORE_LABEL) {
        LabelLookup::Orphan => {
            return Extraction::NotFound(NotFoundReason::StructuralMismatch("SGPA 标签后没有单元格"))
        }
        LabelLookup::Value(score) if !score.is_empty() => score,
        LabelLookup::Value(_) | LabelLookup::Missing => ZERO_SCORE.to_string(),
    };

    let subjects = match extract_subjects(&html) {
        Ok(subjects) => subjects,
        Err(reason) => return Extraction::NotFound(reason),
    };

    Extraction::Record(StudentRecord {
        identifier: identifier.clone(),
        name,
        score,
        subjects,
    })
}

/// 页面上可见的文字（不含 script / style），转小写
fn visible_text_lowercase(html: &Html) -> String {
    let mut out = String::new();
    for node in html.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(ElementRef::wrap)
            .is_some_and(|parent| matches!(parent.value().name(), "script" | "style"));
        if !hidden {
            out.push_str(&text.to_lowercase());
            out.push(' ');
        }
    }
    out
}

/// 找到包含标签文字的文本节点，取其后第一个 `<td>` 的文字
fn labelled_value(html: &Html, label: &str) -> LabelLookup {
    let mut nodes = html.tree.root().descendants();

    let found = nodes
        .by_ref()
        .any(|node| node.value().as_text().is_some_and(|t| t.contains(label)));
    if !found {
        return LabelLookup::Missing;
    }

    match nodes
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "td")
    {
        Some(cell) => LabelLookup::Value(stripped_text(cell).replace(':', "").trim().to_string()),
        None => LabelLookup::Orphan,
    }
}

/// 逐段去空白后拼接
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

fn cell_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// 读取成绩表
///
/// 取第一个含有合格数据行（至少 6 个单元格）的表格，跳过表头行；
/// 没有这样的表格时返回空列表
fn extract_subjects(html: &Html) -> Result<Vec<SubjectEntry>, NotFoundReason> {
    let selector = |css: &'static str| {
        Selector::parse(css).map_err(|_| NotFoundReason::StructuralMismatch("选择器无效"))
    };
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    for table in html.select(&table_sel) {
        let subjects: Vec<SubjectEntry> = table
            .select(&row_sel)
            .skip(1)
            .filter_map(|row| {
                let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).collect();
                if cells.len() < MIN_SUBJECT_CELLS {
                    return None;
                }
                Some(SubjectEntry::new(
                    cell_text(&cells[1]),
                    cell_text(&cells[2]),
                    cell_text(&cells[4]),
                    cell_text(cells.last()?),
                ))
            })
            .collect();

        if !subjects.is_empty() {
            return Ok(subjects);
        }
    }

    Ok(Vec::new())
}
