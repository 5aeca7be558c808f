use super::handler::{ArgKind, ReturnKind};

/// Step 정의 등록 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// 패턴 문자열이 정규식으로 컴파일되지 않는다.
    #[error("invalid step pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    /// 바이트 패턴이 UTF-8이 아니다.
    #[error("step pattern bytes are not valid UTF-8: {0}")]
    NonUtf8Pattern(#[from] std::string::FromUtf8Error),
    /// 반환 값이 정확히 하나가 아니다.
    #[error("expected handler to return only one value, but it has: {0}")]
    ReturnArity(usize),
    /// 지원하지 않는 반환 타입이다.
    #[error("expected handler to return an error or steps, but got: {0}")]
    UnsupportedReturn(ReturnKind),
    /// 구조화 인자 파라미터가 둘 이상이다.
    #[error("handler declares {0} structured parameters, at most one is allowed")]
    MultipleStructuredParams(usize),
    /// 구조화 인자 파라미터가 마지막 위치가 아니다.
    #[error("structured parameter {kind} at position {position} must be the last parameter")]
    StructuredParamNotLast { kind: ArgKind, position: usize },
}
