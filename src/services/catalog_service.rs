//! 考试目录服务 - 业务能力层
//!
//! 从首页脚本中发现考试列表，进程内只加载一次

use crate::error::CatalogError;
use crate::infrastructure::ResultSource;
use crate::models::{ExamCatalog, ExamEntry};
use regex::Regex;
use serde::Deserialize;
use scraper::{Html, Selector};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// 从首页 HTML 中解析考试目录，只保留名称含 `program_marker` 的考试
///
/// 正则只定位候选数组的起点，数组本身交给 serde_json 读取，
/// 考试名称里出现方括号也不影响
pub fn parse_catalog(page: &str, program_marker: &str) -> Result<ExamCatalog, CatalogError> {
    let array_start = Regex::new(r"\[\s*\{").map_err(|_| CatalogError::ScriptMissing)?;
    let script_sel = Selector::parse("script").map_err(|_| CatalogError::ScriptMissing)?;

    let html = Html::parse_document(page);
    let mut last_error = None;
    let mut found = None;

    'scripts: for script in html.select(&script_sel) {
        let body: String = script.text().collect();
        if !body.contains(EXAM_ID_KEY) {
            continue;
        }
        for candidate in array_start.find_iter(&body) {
            match leading_exam_array(&body[candidate.start()..]) {
                Ok(entries) => {
                    found = Some(entries);
                    break 'scripts;
                }
                Err(e) => last_error = Some(e),
            }
        }
    }

    let entries = match (found, last_error) {
        (Some(entries), _) => entries,
        (None, Some(e)) => return Err(CatalogError::Json(e)),
        (None, None) => return Err(CatalogError::ScriptMissing),
    };

    let catalog = ExamCatalog::from_entries(
        entries
            .into_iter()
            .filter(|e| e.exam_name.contains(program_marker)),
    );

    if catalog.is_empty() {
        return Err(CatalogError::NoMatchingExam {
            marker: program_marker.to_string(),
        });
    }
    Ok(catalog)
}

const EXAM_ID_KEY: &str = "\"examId\"";

// 只读开头的一个 JSON 数组，后面的脚本内容不管
fn leading_exam_array(text: &str) -> Result<Vec<ExamEntry>, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    Vec::<ExamEntry>::deserialize(&mut deserializer)
}

/// 请求首页并解析考试目录
pub async fn discover_catalog<S>(source: &S, program_marker: &str) -> Result<ExamCatalog, CatalogError>
where
    S: ResultSource + ?Sized,
{
    let page = source.fetch_landing_page().await?;
    parse_catalog(&page, program_marker)
}

/// 考试目录缓存
///
/// 第一次访问时加载，之后一直复用（包括兜底目录），
/// 只有显式调用 `invalidate` 才会重新发现
pub struct ExamCatalogStore {
    default_exam_id: String,
    program_marker: String,
    state: RwLock<Option<Arc<ExamCatalog>>>,
}

impl ExamCatalogStore {
    pub fn new(default_exam_id: impl Into<String>, program_marker: impl Into<String>) -> Self {
        Self {
            default_exam_id: default_exam_id.into(),
            program_marker: program_marker.into(),
            state: RwLock::new(None),
        }
    }

    /// 获取考试目录，必要时从远端发现
    pub async fn get<S>(&self, source: &S) -> Arc<ExamCatalog>
    where
        S: ResultSource + ?Sized,
    {
        if let Some(catalog) = self.state.read().await.as_ref() {
            return Arc::clone(catalog);
        }

        let mut state = self.state.write().await;
        if let Some(catalog) = state.as_ref() {
            return Arc::clone(catalog);
        }

        let catalog = match discover_catalog(source, &self.program_marker).await {
            Ok(catalog) => {
                info!("✓ 发现 {} 场考试", catalog.len());
                catalog
            }
            Err(e) => {
                warn!("⚠️ 考试目录不可用，使用兜底目录: {}", e);
                ExamCatalog::fallback(&self.default_exam_id, &self.program_marker)
            }
        };

        let catalog = Arc::new(catalog);
        *state = Some(Arc::clone(&catalog));
        catalog
    }

    /// 丢弃已加载的目录，下次访问时重新发现
    pub async fn invalidate(&self) {
        *self.state.write().await = None;
    }
}
