use crate::error::ConfigError;
use crate::models::section::{RawSection, SectionTable};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Deserialize)]
struct SectionFile {
    #[serde(default)]
    sections: BTreeMap<String, RawSection>,
}

/// 解析班级表 TOML 文本
///
/// ```toml
/// [sections.CSBS]
/// code = "32"
/// reg_start = 1
/// reg_end = 66
/// lat_start = 1
/// lat_end = 9
/// ```
pub fn parse_section_table(content: &str, origin: &str) -> Result<SectionTable, ConfigError> {
    let file: SectionFile =
        toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: origin.to_string(),
            source,
        })?;
    SectionTable::from_raw(file.sections)
}

/// 从 TOML 文件加载班级表
pub async fn load_section_table(path: &Path) -> Result<SectionTable, ConfigError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

    let table = parse_section_table(&content, &path.display().to_string())?;
    tracing::info!("从 {} 加载了 {} 个班级", path.display(), table.len());
    Ok(table)
}
