//! 미정의 Step에 대한 등록 코드 제안을 만든다.

use crate::scenario::{Step, StepArgument};
use once_cell::sync::Lazy;
use regex::Regex;

/// 따옴표 문자열 또는 정수 토큰.
static PARAM_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]*"|\d+"#).expect("정규식 컴파일 실패"));

/// Step 문장에서 정규식 패턴과 파라미터 타입 목록을 추론한다.
///
/// 따옴표 문자열은 `String`, 정수는 `i64` 캡처가 되고 나머지는 이스케이프된
/// 리터럴이 된다.
pub fn infer_pattern(text: &str) -> (String, Vec<&'static str>) {
    let mut pattern = String::from("^");
    let mut params = Vec::new();
    let mut last = 0;
    for token in PARAM_TOKEN.find_iter(text) {
        pattern.push_str(&regex::escape(&text[last..token.start()]));
        if token.as_str().starts_with('"') {
            pattern.push_str(r#""([^"]*)""#);
            params.push("String");
        } else {
            pattern.push_str(r"(\d+)");
            params.push("i64");
        }
        last = token.end();
    }
    pattern.push_str(&regex::escape(&text[last..]));
    pattern.push('$');
    (pattern, params)
}

/// 내용 안의 `"#…` 연속보다 긴 `#` 구분자로 원시 문자열 리터럴을 만든다.
fn raw_string_literal(content: &str) -> String {
    let longest = content
        .split('"')
        .skip(1)
        .map(|rest| rest.chars().take_while(|c| *c == '#').count())
        .max()
        .unwrap_or(0);
    let hashes = "#".repeat(longest + 1);
    format!("r{hashes}\"{content}\"{hashes}")
}

/// 미정의 Step을 등록하는 코드 조각을 만든다.
pub fn undefined_snippet(step: &Step) -> String {
    let (pattern, mut params) = infer_pattern(&step.text);
    match &step.argument {
        Some(StepArgument::DocString(_)) => params.push("DocString"),
        Some(StepArgument::Table(_)) => params.push("Table"),
        None => {}
    }
    let args = params
        .iter()
        .enumerate()
        .map(|(i, ty)| format!("arg{}: {ty}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let pattern = raw_string_literal(&pattern);
    format!(
        "registry.step({pattern}, |{args}| -> Result<(), StepError> {{\n    Err(StepError::Pending)\n}})?;"
    )
}
