use std::any::Any;

/// 패닉 페이로드를 로그용 문자열로 변환한다.
///
/// `String`이나 `&'static str`이면 그대로, 아니면 `Debug` 표현을 쓴다.
pub(super) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else {
        format!("{payload:?}")
    }
}

/// 반환 종류 이름.
pub(super) fn return_name(nested: bool) -> &'static str {
    if nested { "steps" } else { "an error" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_common_payloads() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("boom")), "boom");
        assert!(panic_message(&5_u32).contains("Any"));
    }
}
