//! 序号编码 - 业务能力层
//!
//! 1..=99 为两位数字，100..=319 为"字母 + 数字"，
//! 字母表去掉了容易和数字混淆的 I、L、O、S

use crate::models::identifier::{SequenceToken, MAX_SEQUENCE_INDEX};

const LETTERS: &[u8; 22] = b"ABCDEFGHJKMNPQRTUVWXYZ";

/// 单个索引编码，超出 1..=319 返回 None
pub fn encode_index(index: u32) -> Option<SequenceToken> {
    match index {
        1..=99 => Some(SequenceToken::new(format!("{:02}", index))),
        100..=MAX_SEQUENCE_INDEX => {
            let offset = index - 100;
            let letter = LETTERS[(offset / 10) as usize] as char;
            Some(SequenceToken::new(format!("{}{}", letter, offset % 10)))
        }
        _ => None,
    }
}

/// 编码 `[start, end]` 区间（两端包含）
///
/// `end < start` 得到空序列；区间超出 1..=319 的部分不产生序号，
/// 班级描述在构建时已经保证不会越界
pub fn encode(start: u32, end: u32) -> Vec<SequenceToken> {
    if end < start {
        return Vec::new();
    }
    (start..=end).filter_map(encode_index).collect()
}

/// `encode_index` 的逆映射
pub fn decode(token: &str) -> Option<u32> {
    let bytes = token.as_bytes();
    if bytes.len() != 2 || !bytes[1].is_ascii_digit() {
        return None;
    }
    let digit = (bytes[1] - b'0') as u32;

    if bytes[0].is_ascii_digit() {
        let index = (bytes[0] - b'0') as u32 * 10 + digit;
        return (index >= 1).then_some(index);
    }

    let position = LETTERS.iter().position(|&c| c == bytes[0])? as u32;
    Some(100 + position * 10 + digit)
}
