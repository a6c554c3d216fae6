use serde::Serialize;
use utoipa::ToSchema;

/// API 공통 응답 구조체
///
/// 형식:
/// ```json
/// {
///   "isSuccess": true,
///   "code": "COMMON200",
///   "message": "성공입니다.",
///   "result": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T: Serialize> {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: Option<T>,
}

impl<T: Serialize> BaseResponse<T> {
    /// 성공 응답 생성
    pub fn success(result: T) -> Self {
        Self {
            is_success: true,
            code: "COMMON200".to_string(),
            message: "성공입니다.".to_string(),
            result: Some(result),
        }
    }

    /// 생성 성공 응답 (201과 함께 사용)
    pub fn created(result: T) -> Self {
        Self {
            is_success: true,
            code: "COMMON201".to_string(),
            message: "생성되었습니다.".to_string(),
            result: Some(result),
        }
    }
}

impl BaseResponse<()> {
    /// 결과 없이 메시지만 전달하는 성공 응답
    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            is_success: true,
            code: "COMMON200".to_string(),
            message: message.into(),
            result: None,
        }
    }
}

/// 필드 단위 검증 실패 항목
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// 에러 응답 구조체
///
/// 검증 실패 시에만 `result`에 필드별 에러 목록이 담깁니다.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    /// 에러 응답 생성
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            code: code.into(),
            message: message.into(),
            result: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldError>) -> Self {
        self.result = Some(fields);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_success_response_in_camel_case() {
        let response = BaseResponse::success(42);

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["isSuccess"], true);
        assert_eq!(json["code"], "COMMON200");
        assert_eq!(json["result"], 42);
    }

    #[test]
    fn should_serialize_error_response_with_null_result() {
        let response = ErrorResponse::new("REG4092", "정원이 가득 찼습니다.");

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["isSuccess"], false);
        assert_eq!(json["code"], "REG4092");
        assert!(json["result"].is_null());
    }

    #[test]
    fn should_include_field_errors_when_present() {
        let response = ErrorResponse::new("COMMON400", "입력값이 올바르지 않습니다.").with_fields(
            vec![FieldError {
                field: "title".to_string(),
                message: "제목은 필수입니다.".to_string(),
            }],
        );

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["result"][0]["field"], "title");
    }
}
