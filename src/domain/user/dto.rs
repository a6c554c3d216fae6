use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::entity::department;
use super::entity::user::{self, UserRole};

// ============== 사용자 ==============

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub user_id: i64,
    /// 학번
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub department_id: Option<i64>,
    pub is_active: bool,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
}

impl From<user::Model> for UserProfileResponse {
    fn from(model: user::Model) -> Self {
        Self {
            user_id: model.user_id,
            username: model.username,
            email: model.email,
            full_name: model.full_name,
            role: model.role,
            phone_number: model.phone_number,
            department_id: model.department_id,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "이름은 1~100자여야 합니다."))]
    pub full_name: Option<String>,
    #[validate(length(min = 7, max = 20, message = "전화번호는 7~20자여야 합니다."))]
    pub phone_number: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleRequest {
    pub role: UserRole,
}

// ============== 학과 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    #[validate(length(min = 1, max = 100, message = "학과명은 1~100자여야 합니다."))]
    pub name: String,
    #[validate(length(min = 1, max = 10, message = "학과 코드는 1~10자여야 합니다."))]
    pub code: String,
    #[validate(length(max = 100, message = "학과장 이름은 100자 이하여야 합니다."))]
    pub head_of_department: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub department_id: i64,
    pub name: String,
    pub code: String,
    pub head_of_department: Option<String>,
}

impl From<department::Model> for DepartmentResponse {
    fn from(model: department::Model) -> Self {
        Self {
            department_id: model.department_id,
            name: model.name,
            code: model.code,
            head_of_department: model.head_of_department,
        }
    }
}

/// 프로필 조회 성공 응답 (Swagger 문서용)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessProfileResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: UserProfileResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_profile_should_reject_empty_name() {
        let req = UpdateProfileRequest {
            full_name: Some(String::new()),
            phone_number: None,
        };

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("full_name"));
    }

    #[test]
    fn change_role_should_parse_snake_case_role() {
        let req: ChangeRoleRequest =
            serde_json::from_value(serde_json::json!({ "role": "organizer" })).unwrap();
        assert_eq!(req.role, UserRole::Organizer);
    }
}
