//! Step 패턴과 핸들러 바인딩을 등록 순서대로 보관한다.
//!
//! 매칭은 등록 순서대로 선형 탐색하며 처음 매칭된 정의가 선택된다. 여러 정의가
//! 같은 문장에 매칭되더라도 모호성을 검사하거나 보고하지 않는다.

mod error;
mod handler;
mod pattern;

pub use error::RegistryError;
pub use handler::{
    ArgKind, FromArg, HandlerOutput, IntoStepHandler, ReturnKind, Signature, StepHandler,
    StepReturn, Steps,
};
pub use pattern::PatternSource;

use pattern::extract_captures;
use regex::Regex;

/// 등록된 Step 정의이다. 생성 이후 변경되지 않는다.
#[derive(Debug, Clone)]
pub struct StepDefinition {
    index: usize,
    pattern: Regex,
    handler: StepHandler,
    nested: bool,
}

impl StepDefinition {
    /// 등록 순서상 위치.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn signature(&self) -> &Signature {
        self.handler.signature()
    }

    /// 중첩 Step 목록을 반환하는 핸들러인지 여부.
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    pub(crate) fn handler(&self) -> &StepHandler {
        &self.handler
    }
}

/// 매칭 결과로, 선택된 정의와 캡처 값을 담는다.
#[derive(Debug, Clone)]
pub struct StepMatch<'a> {
    pub definition: &'a StepDefinition,
    pub captures: Vec<String>,
}

/// Step 정의 레지스트리이다.
///
/// 실행 전 단일 스레드 설정 단계에서만 변경하고 실행 중에는 읽기 전용으로 쓴다.
#[derive(Debug, Default, Clone)]
pub struct StepRegistry {
    definitions: Vec<StepDefinition>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 패턴과 핸들러를 검증한 뒤 정의 목록 끝에 추가한다.
    ///
    /// 패턴 컴파일 실패나 잘못된 핸들러 시그니처는 즉시 오류로 반환되며 정의는
    /// 추가되지 않는다. 오류를 받은 쪽은 어떤 시나리오도 실행하기 전에 설정을
    /// 중단해야 한다.
    pub fn register(
        &mut self,
        pattern: impl Into<PatternSource>,
        handler: StepHandler,
    ) -> Result<&StepDefinition, RegistryError> {
        let pattern = pattern.into().compile()?;
        let nested = validate_signature(handler.signature())?;
        let capture_groups = pattern.captures_len() - 1;
        let capture_params = handler.signature().capture_params();
        if capture_groups != capture_params {
            tracing::warn!(
                pattern = pattern.as_str(),
                capture_groups,
                capture_params,
                "capture group count differs from handler parameters"
            );
        }
        let index = self.definitions.len();
        tracing::debug!(index, pattern = pattern.as_str(), nested, "step registered");
        self.definitions.push(StepDefinition {
            index,
            pattern,
            handler,
            nested,
        });
        Ok(&self.definitions[index])
    }

    /// 타입이 지정된 클로저를 등록한다.
    ///
    /// ```
    /// use stepwise::{StepError, StepRegistry};
    ///
    /// let mut registry = StepRegistry::new();
    /// registry
    ///     .step(r"^I have (\d+) cukes$", |count: i32| -> Result<(), StepError> {
    ///         if count < 0 {
    ///             return Err("negative cukes".into());
    ///         }
    ///         Ok(())
    ///     })
    ///     .expect("valid step");
    /// assert!(registry.lookup("I have 3 cukes").is_some());
    /// ```
    pub fn step<Args, H>(
        &mut self,
        pattern: impl Into<PatternSource>,
        handler: H,
    ) -> Result<&StepDefinition, RegistryError>
    where
        H: IntoStepHandler<Args>,
    {
        self.register(pattern, handler.into_handler())
    }

    /// 문장과 처음 매칭되는 정의를 찾는다.
    pub fn lookup(&self, text: &str) -> Option<StepMatch<'_>> {
        self.definitions.iter().find_map(|definition| {
            extract_captures(&definition.pattern, text).map(|captures| StepMatch {
                definition,
                captures,
            })
        })
    }

    pub fn definitions(&self) -> &[StepDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// 시그니처를 검증하고 중첩 핸들러 여부를 돌려준다.
fn validate_signature(signature: &Signature) -> Result<bool, RegistryError> {
    if signature.returns.len() != 1 {
        return Err(RegistryError::ReturnArity(signature.returns.len()));
    }
    let nested = match &signature.returns[0] {
        ReturnKind::Error => false,
        ReturnKind::Steps => true,
        other => return Err(RegistryError::UnsupportedReturn(other.clone())),
    };
    let structured: Vec<(usize, ArgKind)> = signature
        .params
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, kind)| kind.is_structured())
        .collect();
    if structured.len() > 1 {
        return Err(RegistryError::MultipleStructuredParams(structured.len()));
    }
    if let Some(&(position, kind)) = structured.first() {
        if position + 1 != signature.params.len() {
            return Err(RegistryError::StructuredParamNotLast { kind, position });
        }
    }
    Ok(nested)
}
