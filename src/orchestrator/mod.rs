//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理、缓存和对外查询，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量学号处理器
//! - 控制并发数量（Semaphore）
//! - 隔离单个学号的失败
//! - 汇总 `BatchReport`
//!
//! ### `result_cache` - 排名结果缓存
//! - 按 (班级, 年份, 考试) 缓存排好序的记录
//! - 同键并发未命中只计算一次
//!
//! ### `results_service` - 查询门面
//! - 学号生成 → 批量获取 → 排名 → 缓存
//! - 单个学号详情、CSV 导出、考试目录
//!
//! ## 层次关系
//!
//! ```text
//! results_service (班级 / 年份 / 考试)
//!     ↓
//! batch_processor (处理 Vec<Identifier>)
//!     ↓
//! workflow::StudentFlow (处理单个学号)
//!     ↓
//! services (能力层：解析 / 排名 / 导出 / 目录)
//!     ↓
//! infrastructure (基础设施：ResultSource)
//! ```

pub mod batch_processor;
pub mod result_cache;
pub mod results_service;

// 重新导出主要类型
pub use batch_processor::{BatchProcessor, BatchReport};
pub use result_cache::{CacheKey, ResultCache, Uncached};
pub use results_service::ResultsService;
