use super::error::RegistryError;
use regex::Regex;

/// 등록 시 받을 수 있는 패턴 표현이다.
#[derive(Debug, Clone)]
pub enum PatternSource {
    /// 이미 컴파일된 정규식.
    Compiled(Regex),
    /// 정규식 문자열.
    Text(String),
    /// 정규식 원시 바이트. UTF-8이어야 한다.
    Bytes(Vec<u8>),
}

impl PatternSource {
    /// 정규식으로 정규화한다.
    pub fn compile(self) -> Result<Regex, RegistryError> {
        let text = match self {
            PatternSource::Compiled(regex) => return Ok(regex),
            PatternSource::Text(text) => text,
            PatternSource::Bytes(bytes) => String::from_utf8(bytes)?,
        };
        Regex::new(&text).map_err(|source| RegistryError::InvalidPattern {
            pattern: text,
            source,
        })
    }
}

impl From<Regex> for PatternSource {
    fn from(regex: Regex) -> Self {
        PatternSource::Compiled(regex)
    }
}

impl From<&str> for PatternSource {
    fn from(text: &str) -> Self {
        PatternSource::Text(text.to_string())
    }
}

impl From<String> for PatternSource {
    fn from(text: String) -> Self {
        PatternSource::Text(text)
    }
}

impl From<&[u8]> for PatternSource {
    fn from(bytes: &[u8]) -> Self {
        PatternSource::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for PatternSource {
    fn from(bytes: Vec<u8>) -> Self {
        PatternSource::Bytes(bytes)
    }
}

/// 매칭된 캡처 그룹을 문자열 목록으로 뽑는다.
///
/// 참여하지 않은 선택 그룹은 빈 문자열이 된다.
pub(crate) fn extract_captures(regex: &Regex, text: &str) -> Option<Vec<String>> {
    let caps = regex.captures(text)?;
    Some(
        caps.iter()
            .skip(1)
            .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect(),
    )
}
