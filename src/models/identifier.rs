//! 学号与序号
//!
//! 学号结构：`<年份两位><入学类型标记><专业代码><两位序号>`

use serde::{Deserialize, Serialize};
use std::fmt;

/// 序号的最大索引：99 个数字序号 + 22 个字母 × 10
pub const MAX_SEQUENCE_INDEX: u32 = 319;

/// 两位序号，例如 `07`、`A3`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceToken(String);

impl SequenceToken {
    pub(crate) fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SequenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 入学类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intake {
    /// 普通入学
    Primary,
    /// 插班入学（lateral entry），年份前缀 +1
    Lateral,
}

impl Intake {
    /// 学号中的入学类型标记
    pub fn tag(self) -> &'static str {
        match self {
            Intake::Primary => "071A",
            Intake::Lateral => "075A",
        }
    }

    /// 计算该入学类型使用的年份前缀
    ///
    /// 年份不是数字时返回 None
    pub fn year_prefix(self, year: &str) -> Option<String> {
        let year = year.trim();
        let value: u32 = year.parse().ok()?;
        match self {
            Intake::Primary => Some(format!("{:02}", value)),
            Intake::Lateral => Some(format!("{:02}", value.checked_add(1)?)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Intake::Primary => "普通",
            Intake::Lateral => "插班",
        }
    }
}

/// 学号
///
/// 只由学号生成器构造，同时作为缓存键和记录关联键
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// 由各组成部分拼接学号
    pub fn compose(year_prefix: &str, intake: Intake, branch_code: &str, token: &SequenceToken) -> Self {
        Self(format!(
            "{}{}{}{}",
            year_prefix,
            intake.tag(),
            branch_code,
            token
        ))
    }

    /// 直接包装一个外部给出的学号（单个学生查询用）
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self(raw.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
