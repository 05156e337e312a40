//! 排名 - 业务能力层

use crate::models::StudentRecord;

/// 按 SGPA 降序稳定排序
///
/// 非数字的 SGPA（包括 "Withheld"）排序键为 -1.0，排在最后，
/// 彼此之间保持输入顺序
pub fn rank(records: &mut [StudentRecord]) {
    records.sort_by(|a, b| b.rank_key().total_cmp(&a.rank_key()));
}

/// 返回排好序的新列表
pub fn ranked(mut records: Vec<StudentRecord>) -> Vec<StudentRecord> {
    rank(&mut records);
    records
}
