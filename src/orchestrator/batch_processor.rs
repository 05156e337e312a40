//! 批量学号处理器 - 编排层
//!
//! ## 职责
//!
//! 对一批学号并发执行"获取 + 解析"，汇总为 `BatchReport`。
//!
//! ## 设计特点
//!
//! - **并发上限**：Semaphore 限制同时在途的请求数，这是对远端服务的保护，不能去掉
//! - **失败隔离**：单个学号失败（网络、解析、任务 panic）不影响其他学号
//! - **顺序无关**：结果按完成顺序收集，最后恢复为提交顺序，
//!   之后的排名结果与完成顺序无关

use crate::infrastructure::ResultSource;
use crate::models::{Identifier, StudentRecord};
use crate::utils::logging::log_batch_complete;
use crate::workflow::{FetchOutcome, StudentCtx, StudentFlow};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::error;

/// 一批学号的处理结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// 保留下来的记录（正常 + 扣留），按提交顺序
    pub records: Vec<StudentRecord>,
    /// 提交的学号数
    pub total: usize,
    /// 正常成绩数
    pub found: usize,
    /// 扣留数
    pub withheld: usize,
    /// 无成绩数
    pub not_found: usize,
    /// 网络失败或任务异常数
    pub failed: usize,
}

impl BatchReport {
    /// 没有任何记录
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 本批是否有学号因为失败而缺失（区别于"确实没有成绩"）
    pub fn had_failures(&self) -> bool {
        self.failed > 0
    }
}

/// 批量处理器
pub struct BatchProcessor<S: ResultSource + ?Sized + 'static> {
    source: Arc<S>,
    flow: StudentFlow,
    max_concurrent: usize,
}

impl<S: ResultSource + ?Sized + 'static> BatchProcessor<S> {
    /// `max_concurrent` 至少为 1
    pub fn new(source: Arc<S>, max_concurrent: usize, verbose_logging: bool) -> Self {
        Self {
            source,
            flow: StudentFlow::new(verbose_logging),
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// 处理一批学号
    pub async fn run(&self, identifiers: Vec<Identifier>, exam_id: &str) -> BatchReport {
        let total = identifiers.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = FuturesUnordered::new();

        for (index, identifier) in identifiers.into_iter().enumerate() {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                error!("并发许可已关闭，停止提交");
                break;
            };

            let source = Arc::clone(&self.source);
            let flow = self.flow.clone();
            let ctx = StudentCtx::new(identifier, exam_id, index);

            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                let outcome = flow.run(source.as_ref(), &ctx).await;
                (ctx.index, outcome)
            }));
        }

        let mut report = BatchReport {
            total,
            ..Default::default()
        };
        let mut indexed: Vec<(usize, StudentRecord)> = Vec::new();

        while let Some(joined) = tasks.next().await {
            match joined {
                Ok((index, outcome)) => {
                    match &outcome {
                        FetchOutcome::Record(_) => report.found += 1,
                        FetchOutcome::Withheld(_) => report.withheld += 1,
                        FetchOutcome::NotFound(_) => report.not_found += 1,
                        FetchOutcome::TransportFailure(_) => report.failed += 1,
                    }
                    if let Some(record) = outcome.into_record() {
                        indexed.push((index, record));
                    }
                }
                Err(e) => {
                    error!("学号任务执行失败: {}", e);
                    report.failed += 1;
                }
            }
        }

        // 恢复提交顺序
        indexed.sort_by_key(|(index, _)| *index);
        report.records = indexed.into_iter().map(|(_, record)| record).collect();

        log_batch_complete(&report);
        report
    }
}
