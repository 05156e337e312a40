//! # Roll Results
//!
//! 按班级枚举学号、并发抓取成绩页面、解析并汇总为排名和表格
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 HTTP 客户端，只暴露"取回页面"的能力
//! - `ResultSource` - 远端成绩服务抽象，`HttpResultSource` 为 reqwest 实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个对象
//! - `sequence` / `roll_generator` - 序号编码与学号生成
//! - `record_extractor` - 成绩页面解析
//! - `catalog_service` - 考试目录发现
//! - `ranker` / `exporter` - 排名与 CSV 导出
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个学号"的完整处理流程
//! - `StudentCtx` - 上下文封装（学号 + 考试编号 + 提交序号）
//! - `StudentFlow` - 流程编排（获取 → 解析 → 分类）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 有界并发的批量处理器
//! - `orchestrator/result_cache` - 排名结果缓存
//! - `orchestrator/results_service` - 对外只读查询门面
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult, TransportFailure};
pub use infrastructure::{HttpResultSource, ResultSource};
pub use models::{ExamCatalog, Identifier, SectionTable, StudentRecord, SubjectEntry};
pub use orchestrator::{BatchReport, ResultsService};
pub use workflow::{FetchOutcome, StudentCtx, StudentFlow};
