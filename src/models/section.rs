//! 班级描述与班级表

use crate::error::ConfigError;
use crate::models::identifier::{Intake, MAX_SEQUENCE_INDEX};
use serde::Deserialize;
use std::collections::BTreeMap;

/// 序号区间（1 起始，两端包含）
///
/// 空区间写作 `start = end + 1`，例如 `1..=0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IndexRange {
    pub start: u32,
    pub end: u32,
}

impl IndexRange {
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate(&self, section: &str, intake: Intake) -> Result<(), ConfigError> {
        let invalid = |reason| ConfigError::InvalidRange {
            section: section.to_string(),
            intake: intake.label(),
            start: self.start,
            end: self.end,
            reason,
        };

        if self.start == 0 {
            return Err(invalid("序号从 1 开始"));
        }
        if self.end > MAX_SEQUENCE_INDEX {
            return Err(invalid("超出两位序号可表示的范围 (319)"));
        }
        if self.start > self.end + 1 {
            return Err(invalid("起点大于终点"));
        }
        Ok(())
    }
}

/// 班级描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDescriptor {
    /// 专业代码，例如 "32"
    pub branch_code: String,
    /// 普通入学序号区间
    pub primary: IndexRange,
    /// 插班入学序号区间
    pub lateral: IndexRange,
}

impl SectionDescriptor {
    pub fn new(
        section: &str,
        branch_code: impl Into<String>,
        primary: IndexRange,
        lateral: IndexRange,
    ) -> Result<Self, ConfigError> {
        primary.validate(section, Intake::Primary)?;
        lateral.validate(section, Intake::Lateral)?;
        Ok(Self {
            branch_code: branch_code.into(),
            primary,
            lateral,
        })
    }

    pub fn range(&self, intake: Intake) -> IndexRange {
        match intake {
            Intake::Primary => self.primary,
            Intake::Lateral => self.lateral,
        }
    }

    /// 该班级的学号总数
    pub fn roll_count(&self) -> usize {
        self.primary.len() + self.lateral.len()
    }
}

/// TOML 中的一条班级记录
#[derive(Debug, Clone, Deserialize)]
pub struct RawSection {
    pub code: String,
    pub reg_start: u32,
    pub reg_end: u32,
    pub lat_start: u32,
    pub lat_end: u32,
}

/// 班级表：班级名 → 描述
#[derive(Debug, Clone, Default)]
pub struct SectionTable {
    sections: BTreeMap<String, SectionDescriptor>,
}

impl SectionTable {
    /// 从原始记录构建，任一记录不合法则整体失败
    pub fn from_raw(raw: BTreeMap<String, RawSection>) -> Result<Self, ConfigError> {
        let mut sections = BTreeMap::new();
        for (key, r) in raw {
            let descriptor = SectionDescriptor::new(
                &key,
                r.code,
                IndexRange { start: r.reg_start, end: r.reg_end },
                IndexRange { start: r.lat_start, end: r.lat_end },
            )?;
            sections.insert(key, descriptor);
        }
        Ok(Self { sections })
    }

    /// 内置班级表
    pub fn builtin() -> Self {
        let sections = BUILTIN_SECTIONS
            .iter()
            .map(|&(key, code, reg_start, reg_end, lat_start, lat_end)| {
                (
                    key.to_string(),
                    SectionDescriptor {
                        branch_code: code.to_string(),
                        primary: IndexRange { start: reg_start, end: reg_end },
                        lateral: IndexRange { start: lat_start, end: lat_end },
                    },
                )
            })
            .collect();
        Self { sections }
    }

    pub fn get(&self, key: &str) -> Option<&SectionDescriptor> {
        self.sections.get(key)
    }

    /// 所有班级名（有序）
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

// (班级, 专业代码, 普通起, 普通止, 插班起, 插班止)
const BUILTIN_SECTIONS: &[(&str, &str, u32, u32, u32, u32)] = &[
    ("AE", "24", 1, 66, 1, 6),
    ("AIDS", "72", 1, 66, 1, 6),
    ("CE-1", "01", 1, 64, 1, 6),
    ("CE-2", "01", 65, 128, 7, 12),
    ("CSBS", "32", 1, 66, 1, 9),
    ("CSE-1", "05", 1, 68, 1, 6),
    ("CSE-2", "05", 69, 136, 7, 12),
    ("CSE-3", "05", 137, 204, 13, 18),
    ("CSE-4", "05", 205, 272, 19, 24),
    ("CSE-AIML-1", "66", 1, 66, 1, 6),
    ("CSE-AIML-2", "66", 67, 132, 7, 12),
    ("CSE-AIML-3", "66", 133, 198, 13, 18),
    ("CSE-CYS", "62", 1, 66, 1, 6),
    ("CSE-DS-1", "67", 1, 66, 1, 6),
    ("CSE-DS-2", "67", 67, 132, 7, 12),
    ("CSE-DS-3", "67", 133, 198, 13, 18),
    ("CSE-IoT", "69", 1, 66, 1, 6),
    ("ECE-1", "04", 1, 64, 1, 6),
    ("ECE-2", "04", 65, 128, 7, 12),
    ("ECE-3", "04", 129, 192, 13, 18),
    ("ECE-4", "04", 193, 256, 19, 24),
    ("EEE-1", "02", 1, 66, 1, 6),
    ("EEE-2", "02", 67, 132, 7, 12),
    ("EIE-1", "10", 1, 64, 1, 6),
    ("EIE-2", "10", 65, 128, 7, 12),
    ("IT-1", "12", 1, 66, 1, 6),
    ("IT-2", "12", 67, 132, 7, 12),
    ("IT-3", "12", 133, 200, 13, 18),
    ("ME-1", "03", 1, 64, 1, 6),
    ("ME-2", "03", 65, 128, 7, 12),
];
