//! 学号生成 - 业务能力层
//!
//! 只负责"某年某班有哪些学号"，不关心是否真的有成绩

use crate::models::{Identifier, Intake, SectionDescriptor, SectionTable};
use crate::services::sequence;
use tracing::warn;

/// 学号生成器
pub struct RollGenerator {
    sections: SectionTable,
}

impl RollGenerator {
    pub fn new(sections: SectionTable) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &SectionTable {
        &self.sections
    }

    /// 生成某年某班的全部学号
    ///
    /// 未知班级返回空列表，不报错
    pub fn generate(&self, year: &str, section_key: &str) -> Vec<Identifier> {
        match self.sections.get(section_key) {
            Some(section) => generate_for(year, section),
            None => {
                warn!("未知班级: {}", section_key);
                Vec::new()
            }
        }
    }
}

/// 按班级描述生成学号：先普通入学（升序），再插班入学（升序）
pub fn generate_for(year: &str, section: &SectionDescriptor) -> Vec<Identifier> {
    let mut rolls = Vec::with_capacity(section.roll_count());

    for intake in [Intake::Primary, Intake::Lateral] {
        let Some(prefix) = intake.year_prefix(year) else {
            warn!("年份 '{}' 不是数字，跳过{}入学学号", year, intake.label());
            continue;
        };
        let range = section.range(intake);
        rolls.extend(
            sequence::encode(range.start, range.end)
                .iter()
                .map(|token| Identifier::compose(&prefix, intake, &section.branch_code, token)),
        );
    }

    rolls
}

impl Default for RollGenerator {
    fn default() -> Self {
        Self::new(SectionTable::builtin())
    }
}
