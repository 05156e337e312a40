//! 单个学号处理流程 - 流程层
//!
//! 流程顺序：获取页面 → 解析 → 分类结果
//!
//! 每个学号的失败都在这里收口，不会向上抛出

use tracing::{debug, warn};

use crate::error::TransportFailure;
use crate::infrastructure::ResultSource;
use crate::models::StudentRecord;
use crate::services::record_extractor::{self, Extraction, NotFoundReason};
use crate::workflow::student_ctx::StudentCtx;

/// 单个学号的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// 正常成绩
    Record(StudentRecord),
    /// 成绩被扣留
    Withheld(StudentRecord),
    /// 没有该学号的成绩
    NotFound(NotFoundReason),
    /// 网络获取失败
    TransportFailure(TransportFailure),
}

impl FetchOutcome {
    /// 保留的记录（正常 + 扣留）
    pub fn into_record(self) -> Option<StudentRecord> {
        match self {
            FetchOutcome::Record(r) | FetchOutcome::Withheld(r) => Some(r),
            FetchOutcome::NotFound(_) | FetchOutcome::TransportFailure(_) => None,
        }
    }
}

impl From<Extraction> for FetchOutcome {
    fn from(extraction: Extraction) -> Self {
        match extraction {
            Extraction::Record(r) => FetchOutcome::Record(r),
            Extraction::Withheld(r) => FetchOutcome::Withheld(r),
            Extraction::NotFound(reason) => FetchOutcome::NotFound(reason),
        }
    }
}

/// 单个学号处理流程
///
/// - 不持有任何资源（HTTP 客户端由调用方传入）
/// - 只依赖业务能力（services）
#[derive(Debug, Clone, Default)]
pub struct StudentFlow {
    verbose_logging: bool,
}

impl StudentFlow {
    pub fn new(verbose_logging: bool) -> Self {
        Self { verbose_logging }
    }

    pub async fn run<S>(&self, source: &S, ctx: &StudentCtx) -> FetchOutcome
    where
        S: ResultSource + ?Sized,
    {
        let document = match source.fetch_result(&ctx.identifier, &ctx.exam_id).await {
            Ok(document) => document,
            Err(e) => {
                warn!("{} 获取失败: {}", ctx, e);
                return FetchOutcome::TransportFailure(e);
            }
        };

        let outcome = FetchOutcome::from(record_extractor::extract(&document, &ctx.identifier));

        if self.verbose_logging {
            match &outcome {
                FetchOutcome::Record(r) => debug!("{} ✓ {} (SGPA {})", ctx, r.name, r.score),
                FetchOutcome::Withheld(_) => debug!("{} 成绩被扣留", ctx),
                FetchOutcome::NotFound(reason) => debug!("{} 无成绩: {}", ctx, reason),
                FetchOutcome::TransportFailure(_) => {}
            }
        }

        outcome
    }
}
