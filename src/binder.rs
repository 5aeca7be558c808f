//! 캡처 그룹과 첨부 인자를 핸들러 파라미터 값으로 변환한다.

use crate::registry::ArgKind;
use crate::scenario::{DocString, StepArgument, Table};
use std::num::{ParseFloatError, ParseIntError};

/// 파라미터 종류에 맞게 변환된 값이다.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),
    DocString(DocString),
    Table(Table),
}

/// 핸들러 호출에 넘겨지는 값 목록이다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepArgs {
    values: Vec<ArgValue>,
}

impl StepArgs {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ArgValue> {
        self.values.get(position)
    }
}

impl From<Vec<ArgValue>> for StepArgs {
    fn from(values: Vec<ArgValue>) -> Self {
        Self { values }
    }
}

impl IntoIterator for StepArgs {
    type Item = ArgValue;
    type IntoIter = std::vec::IntoIter<ArgValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// 바인딩 실패 사유이다.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    /// 인자 수가 파라미터 수보다 적다.
    #[error("func expects {expected} arguments, which is more than {found} matched from input")]
    Arity { expected: usize, found: usize },
    /// 정수 변환 실패.
    #[error("cannot convert argument #{position} \"{value}\" to {kind}: {source}")]
    Int {
        position: usize,
        value: String,
        kind: ArgKind,
        source: ParseIntError,
    },
    /// 실수 변환 실패.
    #[error("cannot convert argument #{position} \"{value}\" to {kind}: {source}")]
    Float {
        position: usize,
        value: String,
        kind: ArgKind,
        source: ParseFloatError,
    },
    /// 첨부 인자와 파라미터 종류가 맞지 않는다.
    #[error("cannot convert argument #{position} of type {found} to {kind}")]
    Mismatch {
        position: usize,
        found: &'static str,
        kind: ArgKind,
    },
}

/// 변환 전 원시 인자이다.
#[derive(Debug, Clone, Copy)]
enum RawArg<'a> {
    Capture(&'a str),
    Attached(&'a StepArgument),
}

impl RawArg<'_> {
    fn type_name(&self) -> &'static str {
        match self {
            RawArg::Capture(_) => "capture",
            RawArg::Attached(StepArgument::DocString(_)) => "DocString",
            RawArg::Attached(StepArgument::Table(_)) => "Table",
        }
    }
}

/// 선언된 파라미터 종류에 맞춰 인자 목록을 만든다.
///
/// 원시 인자는 캡처 값 뒤에 첨부 인자를 이어 붙인 순서이다. 원시 인자가 남는 것은
/// 허용하지만 모자라면 [`BindError::Arity`]를 반환한다.
pub fn bind(
    params: &[ArgKind],
    captures: &[String],
    argument: Option<&StepArgument>,
) -> Result<StepArgs, BindError> {
    let raw: Vec<RawArg<'_>> = captures
        .iter()
        .map(|c| RawArg::Capture(c.as_str()))
        .chain(argument.map(RawArg::Attached))
        .collect();
    if raw.len() < params.len() {
        return Err(BindError::Arity {
            expected: params.len(),
            found: raw.len(),
        });
    }
    let values = params
        .iter()
        .zip(raw)
        .enumerate()
        .map(|(position, (kind, arg))| convert(position, *kind, arg))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(StepArgs::from(values))
}

fn convert(position: usize, kind: ArgKind, arg: RawArg<'_>) -> Result<ArgValue, BindError> {
    let mismatch = || BindError::Mismatch {
        position,
        found: arg.type_name(),
        kind,
    };
    let int_error = |value: &str, source: ParseIntError| BindError::Int {
        position,
        value: value.to_string(),
        kind,
        source,
    };
    let float_error = |value: &str, source: ParseFloatError| BindError::Float {
        position,
        value: value.to_string(),
        kind,
        source,
    };
    match (kind, arg) {
        (ArgKind::Int8, RawArg::Capture(s)) => {
            s.parse().map(ArgValue::Int8).map_err(|e| int_error(s, e))
        }
        (ArgKind::Int16, RawArg::Capture(s)) => {
            s.parse().map(ArgValue::Int16).map_err(|e| int_error(s, e))
        }
        (ArgKind::Int32, RawArg::Capture(s)) => {
            s.parse().map(ArgValue::Int32).map_err(|e| int_error(s, e))
        }
        (ArgKind::Int64, RawArg::Capture(s)) => {
            s.parse().map(ArgValue::Int64).map_err(|e| int_error(s, e))
        }
        (ArgKind::Float32, RawArg::Capture(s)) => {
            s.parse().map(ArgValue::Float32).map_err(|e| float_error(s, e))
        }
        (ArgKind::Float64, RawArg::Capture(s)) => {
            s.parse().map(ArgValue::Float64).map_err(|e| float_error(s, e))
        }
        (ArgKind::String, RawArg::Capture(s)) => Ok(ArgValue::String(s.to_string())),
        (ArgKind::Bytes, RawArg::Capture(s)) => Ok(ArgValue::Bytes(s.as_bytes().to_vec())),
        // 문자열 계열 파라미터는 DocString 본문을 받을 수 있다.
        (ArgKind::String, RawArg::Attached(StepArgument::DocString(doc))) => {
            Ok(ArgValue::String(doc.content.clone()))
        }
        (ArgKind::Bytes, RawArg::Attached(StepArgument::DocString(doc))) => {
            Ok(ArgValue::Bytes(doc.content.as_bytes().to_vec()))
        }
        (ArgKind::DocString, RawArg::Attached(StepArgument::DocString(doc))) => {
            Ok(ArgValue::DocString(doc.clone()))
        }
        (ArgKind::Table, RawArg::Attached(StepArgument::Table(table))) => {
            Ok(ArgValue::Table(table.clone()))
        }
        _ => Err(mismatch()),
    }
}
