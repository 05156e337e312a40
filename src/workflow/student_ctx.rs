//! 学号处理上下文
//!
//! 封装"我正在查哪次考试的第几个学号"这一信息

use crate::models::Identifier;
use std::fmt::Display;

/// 学号处理上下文
#[derive(Debug, Clone)]
pub struct StudentCtx {
    /// 学号
    pub identifier: Identifier,

    /// 考试编号
    pub exam_id: String,

    /// 在本批中的提交序号（从0开始），用于恢复提交顺序
    pub index: usize,
}

impl StudentCtx {
    pub fn new(identifier: Identifier, exam_id: impl Into<String>, index: usize) -> Self {
        Self {
            identifier,
            exam_id: exam_id.into(),
            index,
        }
    }
}

impl Display for StudentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[学号 {} 考试#{} 序号#{}]",
            self.identifier, self.exam_id, self.index
        )
    }
}
