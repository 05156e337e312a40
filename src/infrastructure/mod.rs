//! 基础设施层
//!
//! 唯一持有 HTTP 客户端的地方，只暴露"取回页面"的能力

pub mod result_source;

pub use result_source::{HttpResultSource, ResultSource};
