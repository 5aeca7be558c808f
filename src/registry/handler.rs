//! Step 핸들러의 정적 시그니처와 호출 래퍼.
//!
//! 타입이 지정된 클로저는 [`IntoStepHandler`]를 통해 [`StepHandler`]로 변환되며,
//! 이때 파라미터 종류와 반환 종류가 [`Signature`]로 기록된다. 등록 시점의 검증은
//! 이 시그니처만 보고 이루어진다.

use crate::binder::{ArgValue, StepArgs};
use crate::error::StepError;
use crate::scenario::{DocString, Table};
use std::fmt;
use std::sync::Arc;

/// 중첩 Step 핸들러가 돌려주는 Step 문장 목록이다.
pub type Steps = Vec<String>;

/// 핸들러 파라미터로 허용되는 변환 종류이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Bytes,
    DocString,
    Table,
}

impl ArgKind {
    /// 캡처가 아닌 첨부 인자에서만 값을 얻는 종류인지 여부.
    pub fn is_structured(self) -> bool {
        matches!(self, ArgKind::DocString | ArgKind::Table)
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Int8 => "i8",
            ArgKind::Int16 => "i16",
            ArgKind::Int32 => "i32",
            ArgKind::Int64 => "i64",
            ArgKind::Float32 => "f32",
            ArgKind::Float64 => "f64",
            ArgKind::String => "String",
            ArgKind::Bytes => "Vec<u8>",
            ArgKind::DocString => "DocString",
            ArgKind::Table => "Table",
        };
        f.write_str(name)
    }
}

/// 핸들러가 선언한 반환 종류이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnKind {
    /// 실패를 알리는 오류(또는 성공).
    Error,
    /// 중첩 Step 목록.
    Steps,
    /// 지원하지 않는 반환 타입 이름.
    Other(String),
}

impl fmt::Display for ReturnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnKind::Error => f.write_str("Result<(), StepError>"),
            ReturnKind::Steps => f.write_str("Steps"),
            ReturnKind::Other(name) => f.write_str(name),
        }
    }
}

/// 핸들러의 파라미터/반환 선언이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// 순서대로 나열한 파라미터 종류.
    pub params: Vec<ArgKind>,
    /// 반환 종류 목록. 유효한 핸들러는 정확히 하나를 가진다.
    pub returns: Vec<ReturnKind>,
}

impl Signature {
    pub fn new(params: Vec<ArgKind>, returns: Vec<ReturnKind>) -> Self {
        Self { params, returns }
    }

    /// 캡처 그룹에서 값을 받는 파라미터 수.
    pub fn capture_params(&self) -> usize {
        self.params.iter().filter(|kind| !kind.is_structured()).count()
    }
}

/// 핸들러 호출 결과이다.
#[derive(Debug)]
pub enum HandlerOutput {
    /// 직접 작업을 수행한 결과.
    Done(Result<(), StepError>),
    /// 대신 실행할 중첩 Step 문장 목록.
    Steps(Steps),
}

type HandlerFn = Arc<dyn Fn(StepArgs) -> HandlerOutput + Send + Sync>;

/// 시그니처와 호출 함수를 묶은 Step 핸들러이다.
#[derive(Clone)]
pub struct StepHandler {
    signature: Signature,
    func: HandlerFn,
}

impl StepHandler {
    /// 시그니처를 명시해 핸들러를 만든다.
    ///
    /// 동적으로 기술된 핸들러(스크립트 바인딩 등)를 위한 경로이며, 시그니처 검증은
    /// 등록 시점에 수행된다.
    pub fn from_signature<F>(signature: Signature, func: F) -> Self
    where
        F: Fn(StepArgs) -> HandlerOutput + Send + Sync + 'static,
    {
        Self {
            signature,
            func: Arc::new(func),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn call(&self, args: StepArgs) -> HandlerOutput {
        (self.func)(args)
    }
}

impl fmt::Debug for StepHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepHandler")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// 바인딩된 값에서 핸들러 파라미터를 꺼내는 변환이다.
pub trait FromArg: Sized {
    /// 바인더가 만들어야 할 값의 종류.
    const KIND: ArgKind;

    fn from_arg(value: ArgValue) -> Option<Self>;
}

macro_rules! impl_from_arg {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FromArg for $ty {
                const KIND: ArgKind = ArgKind::$kind;

                fn from_arg(value: ArgValue) -> Option<Self> {
                    match value {
                        ArgValue::$kind(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_arg! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Vec<u8> => Bytes,
    DocString => DocString,
    Table => Table,
}

/// 핸들러 반환 값을 실행 결과로 바꾸는 변환이다.
pub trait StepReturn {
    fn kind() -> ReturnKind;

    fn into_output(self) -> HandlerOutput;
}

impl<E> StepReturn for Result<(), E>
where
    E: Into<StepError>,
{
    fn kind() -> ReturnKind {
        ReturnKind::Error
    }

    fn into_output(self) -> HandlerOutput {
        HandlerOutput::Done(self.map_err(Into::into))
    }
}

impl StepReturn for Steps {
    fn kind() -> ReturnKind {
        ReturnKind::Steps
    }

    fn into_output(self) -> HandlerOutput {
        HandlerOutput::Steps(self)
    }
}

/// 타입이 지정된 클로저를 [`StepHandler`]로 변환한다.
///
/// `Args`는 파라미터 튜플이며 구현 선택에만 쓰인다.
pub trait IntoStepHandler<Args> {
    fn into_handler(self) -> StepHandler;
}

fn argument_mismatch(position: usize, kind: ArgKind) -> HandlerOutput {
    HandlerOutput::Done(Err(StepError::failed(format!(
        "argument #{position} is not a bound {kind} value"
    ))))
}

macro_rules! impl_into_step_handler {
    ($($arg:ident => $var:ident),*) => {
        impl<Func, Ret, $($arg,)*> IntoStepHandler<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Ret + Send + Sync + 'static,
            Ret: StepReturn,
            $($arg: FromArg,)*
        {
            #[allow(unused_mut, unused_variables, unused_assignments)]
            fn into_handler(self) -> StepHandler {
                let signature = Signature::new(vec![$($arg::KIND),*], vec![Ret::kind()]);
                StepHandler::from_signature(signature, move |args: StepArgs| {
                    let mut values = args.into_iter();
                    let mut position = 0usize;
                    $(
                        let $var = match values.next().map($arg::from_arg) {
                            Some(Some(inner)) => inner,
                            _ => return argument_mismatch(position, $arg::KIND),
                        };
                        position += 1;
                    )*
                    (self)($($var),*).into_output()
                })
            }
        }
    };
}

impl_into_step_handler!();
impl_into_step_handler!(A1 => a1);
impl_into_step_handler!(A1 => a1, A2 => a2);
impl_into_step_handler!(A1 => a1, A2 => a2, A3 => a3);
impl_into_step_handler!(A1 => a1, A2 => a2, A3 => a3, A4 => a4);
impl_into_step_handler!(A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5);
impl_into_step_handler!(A1 => a1, A2 => a2, A3 => a3, A4 => a4, A5 => a5, A6 => a6);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_closure_records_signature() {
        let handler =
            (|_: i32, _: String, _: Table| -> Result<(), StepError> { Ok(()) }).into_handler();
        assert_eq!(
            handler.signature(),
            &Signature::new(
                vec![ArgKind::Int32, ArgKind::String, ArgKind::Table],
                vec![ReturnKind::Error],
            )
        );
        assert_eq!(handler.signature().capture_params(), 2);
    }

    #[test]
    fn nested_closure_declares_steps_return() {
        let handler = (|name: String| -> Steps { vec![format!("user {name} exists")] })
            .into_handler();
        assert_eq!(handler.signature().returns, vec![ReturnKind::Steps]);
        match handler.call(StepArgs::from(vec![ArgValue::String("bob".into())])) {
            HandlerOutput::Steps(steps) => assert_eq!(steps, vec!["user bob exists"]),
            other => panic!("중첩 Step이 아님: {other:?}"),
        }
    }

    /// 바인딩된 값의 종류가 선언과 다르면 핸들러 본문을 실행하지 않는다.
    #[test]
    fn mismatched_value_fails_without_running_body() {
        let handler = (|_: i64| -> Result<(), StepError> { panic!("호출되면 안 됨") })
            .into_handler();
        match handler.call(StepArgs::from(vec![ArgValue::String("x".into())])) {
            HandlerOutput::Done(Err(err)) => {
                assert_eq!(err.to_string(), "argument #0 is not a bound i64 value")
            }
            other => panic!("실패가 아님: {other:?}"),
        }
    }

    /// 값이 모자라면 비어 있는 파라미터의 실제 위치를 알린다.
    #[test]
    fn missing_value_reports_its_parameter_position() {
        let handler = (|_: String, _: i32, _: Table| -> Result<(), StepError> {
            panic!("호출되면 안 됨")
        })
        .into_handler();
        let args = StepArgs::from(vec![ArgValue::String("a".into()), ArgValue::Int32(1)]);
        match handler.call(args) {
            HandlerOutput::Done(Err(err)) => {
                assert_eq!(err.to_string(), "argument #2 is not a bound Table value")
            }
            other => panic!("실패가 아님: {other:?}"),
        }
    }
}
