use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{PasswordValidator, StringValidator, ValidationError, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Creator,
    Actor,
    Admin,
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Creator => write!(f, "creator"),
            UserType::Actor => write!(f, "actor"),
            UserType::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creator" => Ok(UserType::Creator),
            "actor" => Ok(UserType::Actor),
            "admin" => Ok(UserType::Admin),
            _ => Err(ValidationError::InvalidUserType(s.to_string())),
        }
    }
}

/// 用户资料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub user_type: String,
    pub avatar_url: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 注册表单；密码只做校验，凭据由外部认证服务保存
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub user_type: String,
    #[serde(default)]
    pub terms_accepted: bool,
    #[serde(default)]
    pub privacy_accepted: bool,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

impl Validator for SignupRequest {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        StringValidator::validate_name(&self.name, 2, 50)?;
        StringValidator::validate_email(&self.email)?;
        StringValidator::validate_phone(&self.phone)?;
        PasswordValidator::validate(&self.password)?;
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        // 注册入口只允许创作者和演员
        match self.user_type.parse::<UserType>()? {
            UserType::Creator | UserType::Actor => {}
            UserType::Admin => return Err(ValidationError::InvalidUserType(self.user_type.clone())),
        }
        if !self.terms_accepted {
            return Err(ValidationError::NotAccepted("terms and conditions"));
        }
        if !self.privacy_accepted {
            return Err(ValidationError::NotAccepted("privacy policy"));
        }
        Ok(())
    }
}

impl Profile {
    pub fn from_signup(request: SignupRequest) -> Result<Self, ValidationError> {
        request.validate()?;

        let now = Utc::now();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            full_name: request.name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            phone: Some(request.phone),
            user_type: request.user_type,
            avatar_url: None,
            verified: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, request: UpdateProfileRequest) -> Result<(), ValidationError> {
        if let Some(name) = request.full_name {
            StringValidator::validate_name(&name, 2, 50)?;
            self.full_name = name.trim().to_string();
        }
        if let Some(phone) = request.phone {
            StringValidator::validate_phone(&phone)?;
            self.phone = Some(phone);
        }
        if let Some(avatar_url) = request.avatar_url {
            StringValidator::validate_url(&Some(avatar_url.clone()))?;
            self.avatar_url = Some(avatar_url);
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
