use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::AppError;

const ACCESS_TOKEN_TYPE: &str = "access";

/// JWT Claims 구조체
///
/// 토큰은 외부 인증 서버가 발급하며, 이 서버는 검증만 수행합니다.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (User ID)
    pub sub: String,
    /// Issued At
    pub iat: usize,
    /// Expiration
    pub exp: usize,
    /// Token Type (access, refresh)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Access Token 생성
///
/// 발급 서버와 같은 형식의 토큰을 만들 때 사용합니다. (테스트, 로컬 개발)
pub fn encode_access_token(
    user_id: i64,
    secret: &str,
    expiration_seconds: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::seconds(expiration_seconds))
        .ok_or_else(|| AppError::InternalError("Invalid token expiration".into()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: expiration,
        token_type: Some(ACCESS_TOKEN_TYPE.to_string()),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Token creation failed: {}", e)))
}

/// Access Token 검증
///
/// `token_type`이 지정된 경우 access 토큰만 허용합니다.
pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("토큰이 만료되었습니다.".into())
        }
        _ => AppError::Unauthorized("유효하지 않은 토큰입니다.".into()),
    })?;

    match claims.token_type.as_deref() {
        None | Some(ACCESS_TOKEN_TYPE) => Ok(claims),
        Some(_) => Err(AppError::Unauthorized(
            "access 토큰만 사용할 수 있습니다.".into(),
        )),
    }
}
