//! 学生成绩记录

use crate::models::grade::GradePoint;
use crate::models::identifier::Identifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 成绩被扣留时使用的姓名
pub const WITHHELD_NAME: &str = "Result Withheld";
/// 成绩被扣留时使用的 SGPA 占位
pub const WITHHELD_SCORE: &str = "Withheld";
/// SGPA 缺失或为空时的占位
pub const ZERO_SCORE: &str = "0.00";
/// 科目结果中表示不及格的字面量
pub const FAIL_OUTCOME: &str = "FAIL";
/// 无法解析为数字的 SGPA 的排序键
pub const UNRANKED_KEY: f64 = -1.0;

/// 单科成绩
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectEntry {
    /// 科目代码
    pub code: String,
    /// 科目名称
    pub title: String,
    /// 等级（保持页面原文）
    pub grade: String,
    /// 由等级查表得到的绩点
    pub grade_point: GradePoint,
    /// 通过/不通过
    pub outcome: String,
}

impl SubjectEntry {
    pub fn new(code: String, title: String, grade: String, outcome: String) -> Self {
        let grade_point = GradePoint::from_letter(&grade);
        Self {
            code,
            title,
            grade,
            grade_point,
            outcome,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.outcome == FAIL_OUTCOME
    }
}

/// 学生成绩记录，构建完成后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub identifier: Identifier,
    pub name: String,
    /// SGPA 原文，或占位 "Withheld" / "0.00"
    pub score: String,
    pub subjects: Vec<SubjectEntry>,
}

impl StudentRecord {
    /// 成绩被扣留的记录
    pub fn withheld(identifier: Identifier) -> Self {
        Self {
            identifier,
            name: WITHHELD_NAME.to_string(),
            score: WITHHELD_SCORE.to_string(),
            subjects: Vec::new(),
        }
    }

    pub fn is_withheld(&self) -> bool {
        self.name == WITHHELD_NAME
    }

    /// 排序键：SGPA 数值，非数字（含 "Withheld"）为 -1.0
    pub fn rank_key(&self) -> f64 {
        match self.score.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => UNRANKED_KEY,
        }
    }

    pub fn verdict(&self) -> Verdict {
        if self.is_withheld() {
            Verdict::Withheld
        } else if self.subjects.iter().any(SubjectEntry::is_failed) {
            Verdict::Fail
        } else {
            Verdict::Pass
        }
    }

    /// 按科目名称查找等级，同名科目以最后一行为准
    pub fn grade_for(&self, title: &str) -> Option<&str> {
        self.subjects
            .iter()
            .rev()
            .find(|s| s.title == title)
            .map(|s| s.grade.as_str())
    }
}

/// 最终结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
    Withheld,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
            Verdict::Withheld => "WITHHELD",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
