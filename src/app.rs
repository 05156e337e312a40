use crate::config::Config;
use crate::infrastructure::HttpResultSource;
use crate::models::{load_section_table, SectionTable};
use crate::orchestrator::ResultsService;
use crate::services::exporter::export_file_name;
use crate::utils::logging::{log_ranking, log_startup, print_final_stats};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    service: ResultsService<HttpResultSource>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let sections = match &config.sections_file {
            Some(path) => load_section_table(Path::new(path)).await?,
            None => SectionTable::builtin(),
        };

        let source = Arc::new(HttpResultSource::new(&config)?);
        let service = ResultsService::new(source, sections, &config);

        Ok(Self { config, service })
    }

    /// 运行应用主逻辑：汇总一个班级的成绩并导出 CSV
    pub async fn run(&self) -> Result<()> {
        let Config {
            section,
            year,
            exam_id,
            ..
        } = &self.config;

        let catalog = self.service.exam_catalog().await;
        for (id, name) in catalog.iter() {
            debug!("   考试 {}: {}", id, name);
        }
        match catalog.name(exam_id) {
            Some(name) => info!("📝 考试 {}: {}", exam_id, name),
            None => warn!("⚠️ 考试 {} 不在考试目录中，仍按该编号查询", exam_id),
        }

        if !self.service.sections().iter().any(|s| s == section) {
            warn!("⚠️ 未知班级 {}，可用班级: {}", section, self.service.sections().join(", "));
            return Ok(());
        }

        let records = self.service.section_results(section, year, exam_id).await;
        if records.is_empty() {
            warn!("⚠️ {} 没有查到任何成绩", section);
        }
        log_ranking(&records, 10);

        let output_path = self.output_path();
        fs::create_dir_all(&self.config.output_dir)
            .with_context(|| format!("无法创建导出目录: {}", self.config.output_dir))?;
        let file = File::create(&output_path)
            .with_context(|| format!("无法创建导出文件: {}", output_path.display()))?;

        let written = self
            .service
            .export_section(section, year, exam_id, BufWriter::new(file))
            .await?;

        print_final_stats(written, &output_path.display().to_string());
        Ok(())
    }

    fn output_path(&self) -> PathBuf {
        Path::new(&self.config.output_dir).join(export_file_name(&self.config.section))
    }
}
