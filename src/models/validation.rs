use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern");
    static ref PHONE_PATTERN: Regex =
        Regex::new(r"^\+?[1-9]\d{1,14}$").expect("valid phone pattern");
}

/// 验证错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name must be between {min} and {max} characters")]
    NameLength { min: usize, max: usize },

    #[error("Invalid ID format (must be a valid UUID)")]
    InvalidId,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid phone number format: {0}")]
    InvalidPhone(String),

    #[error("Password must be between 8 and 72 characters")]
    PasswordLength,

    #[error("Password must contain at least one {0}")]
    PasswordMissing(&'static str),

    #[error("Passwords don't match")]
    PasswordMismatch,

    #[error("You must accept the {0}")]
    NotAccepted(&'static str),

    #[error("Invalid user type: {0}")]
    InvalidUserType(String),

    #[error("Invalid rating: {0} (must be between 0.0 and 5.0)")]
    InvalidRating(f64),

    #[error("Price cannot be negative: {0}")]
    NegativePrice(f64),

    #[error("Invalid delivery time: {0} (must be between 1 and 365 days)")]
    InvalidDeliveryTime(i32),

    #[error("{0} cannot be negative")]
    NegativeCount(&'static str),

    #[error("Delivery date is out of range")]
    DeliveryDateOutOfRange,

    #[error("Tagline is too long (max 200 characters)")]
    TaglineTooLong,

    #[error("Bio is too long (max 2000 characters)")]
    BioTooLong,

    #[error("Too many tags in {0} (max 20)")]
    TooManyTags(&'static str),

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Message is too long (max 2000 characters)")]
    MessageTooLong,

    #[error("Comment is too long (max 2000 characters)")]
    CommentTooLong,

    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    #[error("Express delivery is not offered by this actor")]
    ExpressUnavailable,

    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    #[error("Cannot move order from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("No revisions left on this order")]
    NoRevisionsLeft,

    #[error("Cannot start a conversation with yourself")]
    SelfConversation,
}

/// 验证器trait
pub trait Validator {
    type Error;

    fn validate(&self) -> Result<(), Self::Error>;
}

/// 字符串验证工具
pub struct StringValidator;

impl StringValidator {
    pub fn validate_name(name: &str, min: usize, max: usize) -> Result<(), ValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let len = trimmed.chars().count();
        if len < min || len > max {
            return Err(ValidationError::NameLength { min, max });
        }

        Ok(())
    }

    pub fn validate_tagline(tagline: &str) -> Result<(), ValidationError> {
        if tagline.chars().count() > 200 {
            return Err(ValidationError::TaglineTooLong);
        }
        Ok(())
    }

    pub fn validate_bio(bio: &str) -> Result<(), ValidationError> {
        if bio.chars().count() > 2000 {
            return Err(ValidationError::BioTooLong);
        }
        Ok(())
    }

    pub fn validate_url(url: &Option<String>) -> Result<(), ValidationError> {
        if let Some(url_str) = url {
            if !url_str.is_empty() && !url_str.starts_with("http") {
                return Err(ValidationError::InvalidUrl(url_str.clone()));
            }
        }
        Ok(())
    }

    pub fn validate_email(email: &str) -> Result<(), ValidationError> {
        let len = email.len();
        if !(5..=254).contains(&len) || !EMAIL_PATTERN.is_match(email) {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }
        Ok(())
    }

    pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
        if !PHONE_PATTERN.is_match(phone) {
            return Err(ValidationError::InvalidPhone(phone.to_string()));
        }
        Ok(())
    }

    /// 聊天消息：去除首尾空白后返回
    pub fn normalize_message(content: &str) -> Result<String, ValidationError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if trimmed.chars().count() > 2000 {
            return Err(ValidationError::MessageTooLong);
        }
        Ok(trimmed.to_string())
    }

    pub fn validate_comment(comment: &str) -> Result<(), ValidationError> {
        if comment.chars().count() > 2000 {
            return Err(ValidationError::CommentTooLong);
        }
        Ok(())
    }
}

/// 交付天数上限
pub const MAX_DELIVERY_DAYS: i32 = 365;

/// 数值验证工具
pub struct NumberValidator;

impl NumberValidator {
    pub fn validate_rating(rating: f64) -> Result<(), ValidationError> {
        if !(0.0..=5.0).contains(&rating) {
            return Err(ValidationError::InvalidRating(rating));
        }
        Ok(())
    }

    pub fn validate_price(price: f64) -> Result<(), ValidationError> {
        if price < 0.0 || price.is_nan() {
            return Err(ValidationError::NegativePrice(price));
        }
        Ok(())
    }

    pub fn validate_delivery_time(days: i32) -> Result<(), ValidationError> {
        if !(1..=MAX_DELIVERY_DAYS).contains(&days) {
            return Err(ValidationError::InvalidDeliveryTime(days));
        }
        Ok(())
    }

    pub fn validate_count(field: &'static str, count: i32) -> Result<(), ValidationError> {
        if count < 0 {
            return Err(ValidationError::NegativeCount(field));
        }
        Ok(())
    }
}

/// 标签集合验证工具
pub struct TagValidator;

impl TagValidator {
    pub fn validate_tags(dimension: &'static str, tags: &[String]) -> Result<(), ValidationError> {
        if tags.len() > 20 {
            return Err(ValidationError::TooManyTags(dimension));
        }
        Ok(())
    }
}

/// 注册表单密码规则
pub struct PasswordValidator;

impl PasswordValidator {
    pub fn validate(password: &str) -> Result<(), ValidationError> {
        let len = password.chars().count();
        if !(8..=72).contains(&len) {
            return Err(ValidationError::PasswordLength);
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::PasswordMissing("uppercase letter"));
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(ValidationError::PasswordMissing("lowercase letter"));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ValidationError::PasswordMissing("number"));
        }
        if password.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::PasswordMissing("special character"));
        }
        Ok(())
    }
}
