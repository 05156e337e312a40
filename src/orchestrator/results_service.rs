//! 成绩查询门面 - 编排层
//!
//! 对展示层只暴露只读查询：班级排名列表、单个学号详情、导出、考试目录

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::ResultSource;
use crate::models::{ExamCatalog, Identifier, SectionTable, StudentRecord};
use crate::orchestrator::batch_processor::{BatchProcessor, BatchReport};
use crate::orchestrator::result_cache::{CacheKey, ResultCache, Uncached};
use crate::services::{exporter, ranker, ExamCatalogStore, RollGenerator};
use crate::workflow::{StudentCtx, StudentFlow};
use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn};

/// 成绩查询门面
///
/// 持有远端服务、学号生成器、批量处理器、结果缓存和考试目录
pub struct ResultsService<S: ResultSource + ?Sized + 'static> {
    source: Arc<S>,
    generator: RollGenerator,
    processor: BatchProcessor<S>,
    cache: ResultCache,
    catalog: ExamCatalogStore,
    flow: StudentFlow,
}

impl<S: ResultSource + ?Sized + 'static> ResultsService<S> {
    pub fn new(source: Arc<S>, sections: SectionTable, config: &Config) -> Self {
        Self {
            processor: BatchProcessor::new(
                Arc::clone(&source),
                config.max_concurrent_requests,
                config.verbose_logging,
            ),
            source,
            generator: RollGenerator::new(sections),
            cache: ResultCache::new(config.cache_capacity, config.cache_ttl()),
            catalog: ExamCatalogStore::new(config.exam_id.clone(), config.program_marker.clone()),
            flow: StudentFlow::new(config.verbose_logging),
        }
    }

    /// 所有班级名
    pub fn sections(&self) -> Vec<String> {
        self.generator.sections().keys().map(str::to_string).collect()
    }

    /// 考试目录（首次访问时发现）
    pub async fn exam_catalog(&self) -> Arc<ExamCatalog> {
        self.catalog.get(self.source.as_ref()).await
    }

    /// 不经过缓存，完整执行一次生成 + 批量获取，返回带统计的报告
    pub async fn section_report(&self, section: &str, year: &str, exam_id: &str) -> BatchReport {
        let identifiers = self.generator.generate(year, section);
        if identifiers.is_empty() {
            return BatchReport::default();
        }

        info!(
            "📦 开始获取 {} ({} 级) 考试 {}: {} 个学号，并发 {}",
            section,
            year,
            exam_id,
            identifiers.len(),
            self.processor.max_concurrent()
        );
        let report = self.processor.run(identifiers, exam_id).await;
        if report.had_failures() {
            warn!(
                "⚠️ {} 有 {} 个学号获取失败，结果不完整",
                section, report.failed
            );
        }
        report
    }

    /// 班级排名列表（带缓存）
    ///
    /// 有学号获取失败时本次结果照常返回，但不写入缓存，下次调用会重新获取
    pub async fn section_results(
        &self,
        section: &str,
        year: &str,
        exam_id: &str,
    ) -> Arc<Vec<StudentRecord>> {
        let key = CacheKey::new(section, year, exam_id);
        self.cache
            .get_or_compute(key, move || async move {
                let report = self.section_report(section, year, exam_id).await;
                let incomplete = report.had_failures();
                let records = ranker::ranked(report.records);
                if incomplete {
                    warn!("⚠️ {} 结果不完整，不写入缓存", section);
                    Err(Uncached(Arc::new(records)))
                } else {
                    Ok(records)
                }
            })
            .await
    }

    /// 单个学号详情（实时查询，不走缓存）
    pub async fn student_detail(&self, identifier: &Identifier, exam_id: &str) -> Option<StudentRecord> {
        let ctx = StudentCtx::new(identifier.clone(), exam_id, 0);
        self.flow.run(self.source.as_ref(), &ctx).await.into_record()
    }

    /// 导出班级成绩，返回写出的记录数
    pub async fn export_section<W: Write>(
        &self,
        section: &str,
        year: &str,
        exam_id: &str,
        writer: W,
    ) -> AppResult<usize> {
        let records = self.section_results(section, year, exam_id).await;
        exporter::write_csv(&records, writer)?;
        Ok(records.len())
    }

    /// 丢弃某个键的缓存结果
    pub async fn invalidate(&self, section: &str, year: &str, exam_id: &str) {
        self.cache
            .invalidate(&CacheKey::new(section, year, exam_id))
            .await;
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// 下次访问时重新发现考试目录
    pub async fn invalidate_catalog(&self) {
        self.catalog.invalidate().await;
    }
}
