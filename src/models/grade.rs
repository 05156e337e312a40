use serde::{Deserialize, Serialize};
use std::fmt;

/// 等级 → 绩点对照表（键为大写）
static GRADE_POINTS: phf::Map<&'static str, u8> = phf::phf_map! {
    "O" => 10,
    "A+" => 9,
    "A" => 8,
    "B+" => 7,
    "B" => 6,
    "C" => 5,
    "F" => 0,
    "AB" => 0,
    "ABSENT" => 0,
};

/// 绩点
///
/// 不在对照表中的等级明确标记为 `Unmapped`，不会被当成 0 分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradePoint {
    Points(u8),
    Unmapped,
}

impl GradePoint {
    /// 按等级查表（忽略大小写和首尾空白）
    pub fn from_letter(letter: &str) -> Self {
        let key = letter.trim().to_ascii_uppercase();
        GRADE_POINTS
            .get(key.as_str())
            .copied()
            .map(GradePoint::Points)
            .unwrap_or(GradePoint::Unmapped)
    }

    pub fn points(self) -> Option<u8> {
        match self {
            GradePoint::Points(p) => Some(p),
            GradePoint::Unmapped => None,
        }
    }
}

impl fmt::Display for GradePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradePoint::Points(p) => write!(f, "{}", p),
            GradePoint::Unmapped => f.write_str("unknown"),
        }
    }
}
