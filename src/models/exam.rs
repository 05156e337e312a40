use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 首页脚本中的一条考试信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamEntry {
    #[serde(rename = "examId", deserialize_with = "deserialize_exam_id")]
    pub exam_id: String,
    #[serde(rename = "examName")]
    pub exam_name: String,
}

/// 考试目录：考试编号 → 显示名称
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExamCatalog {
    exams: BTreeMap<String, String>,
    /// 是否为发现失败后的兜底目录
    fallback: bool,
}

impl ExamCatalog {
    pub fn from_entries(entries: impl IntoIterator<Item = ExamEntry>) -> Self {
        Self {
            exams: entries
                .into_iter()
                .map(|e| (e.exam_id, e.exam_name))
                .collect(),
            fallback: false,
        }
    }

    /// 只含一个默认考试的兜底目录
    pub fn fallback(exam_id: &str, program_marker: &str) -> Self {
        let mut exams = BTreeMap::new();
        exams.insert(
            exam_id.to_string(),
            format!("Latest {} Results (catalog unavailable)", program_marker),
        );
        Self {
            exams,
            fallback: true,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn name(&self, exam_id: &str) -> Option<&str> {
        self.exams.get(exam_id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.exams.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.exams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }
}

// examId 在页面里有时是字符串，有时是整数
fn deserialize_exam_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct ExamIdVisitor;

    impl<'de> Visitor<'de> for ExamIdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer exam id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.trim().to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(ExamIdVisitor)
}
