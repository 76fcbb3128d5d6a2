use crate::config::AppConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型，目前只签发 "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 生成 Access Token，有效期取自配置（分钟）
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_token_with_secret(
            user_id,
            role,
            ACCESS_TOKEN_TYPE,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
            &config.jwt.secret,
        )
    }

    // 使用指定密钥与有效期签发 token
    pub fn generate_token_with_secret(
        user_id: i64,
        role: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
        secret: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_with_secret(token, ACCESS_TOKEN_TYPE, &AppConfig::get().jwt.secret)
    }

    // 验证签名、有效期与 token 类型
    pub fn verify_with_secret(
        token: &str,
        expected_type: &str,
        secret: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|token_data| token_data.claims)?;

        if claims.token_type != expected_type {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issue_and_verify() {
        let token = JwtUtils::generate_token_with_secret(
            42,
            "student",
            ACCESS_TOKEN_TYPE,
            chrono::Duration::minutes(5),
            SECRET,
        )
        .unwrap();

        let claims = JwtUtils::verify_with_secret(&token, ACCESS_TOKEN_TYPE, SECRET).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "student");
    }

    #[test]
    fn test_wrong_secret_or_type_rejected() {
        let token = JwtUtils::generate_token_with_secret(
            1,
            "teacher",
            "refresh",
            chrono::Duration::minutes(5),
            SECRET,
        )
        .unwrap();

        assert!(JwtUtils::verify_with_secret(&token, ACCESS_TOKEN_TYPE, SECRET).is_err());
        assert!(JwtUtils::verify_with_secret(&token, "refresh", "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // 超出默认 60 秒容差
        let token = JwtUtils::generate_token_with_secret(
            1,
            "student",
            ACCESS_TOKEN_TYPE,
            chrono::Duration::minutes(-10),
            SECRET,
        )
        .unwrap();
        assert!(JwtUtils::verify_with_secret(&token, ACCESS_TOKEN_TYPE, SECRET).is_err());
    }
}
