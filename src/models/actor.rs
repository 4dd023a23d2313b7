use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{
    NumberValidator, StringValidator, TagValidator, ValidationError, Validator,
};

/// 未在套餐特性中声明修改次数时的默认值
pub const DEFAULT_REVISIONS: i32 = 2;

/// 服务套餐
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePackage {
    pub name: String,
    pub price: f64,
    pub delivery_time: i32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

impl ServicePackage {
    /// 从特性描述中解析可修改次数，`None` 表示不限次数
    pub fn revision_allowance(&self) -> Option<i32> {
        for feature in &self.features {
            let lower = feature.to_lowercase();
            if !lower.contains("revision") {
                continue;
            }
            if lower.contains("unlimited") {
                return None;
            }
            let digits: String = lower.chars().take_while(|c| c.is_ascii_digit()).collect();
            if let Ok(count) = digits.parse::<i32>() {
                return Some(count);
            }
        }
        Some(DEFAULT_REVISIONS)
    }
}

/// 演员档案（搜索候选项）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorProfile {
    pub id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub avatar_url: Option<String>,
    pub tagline: String,
    pub bio: String,
    pub languages: Vec<String>,
    pub video_types: Vec<String>,
    pub tones: Vec<String>,
    pub base_price: f64,
    pub express_delivery_price: Option<f64>,
    pub express_delivery_time: Option<i32>,
    pub standard_delivery_time: i32,
    pub rating: f64,
    pub review_count: i32,
    pub featured: bool,
    pub verified: bool,
    pub completed_orders: i32,
    pub average_response_time: Option<String>,
    pub next_available: Option<String>,
    pub working_hours: Option<String>,
    pub timezone: Option<String>,
    pub packages: Vec<ServicePackage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// actors 表中的原始行，标签与套餐以 JSON 字符串保存
#[derive(Debug, Clone, FromRow)]
pub struct ActorRow {
    pub id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub avatar_url: Option<String>,
    pub tagline: String,
    pub bio: String,
    pub languages: String,
    pub video_types: String,
    pub tones: String,
    pub base_price: f64,
    pub express_delivery_price: Option<f64>,
    pub express_delivery_time: Option<i32>,
    pub standard_delivery_time: i32,
    pub rating: f64,
    pub review_count: i32,
    pub featured: bool,
    pub verified: bool,
    pub completed_orders: i32,
    pub average_response_time: Option<String>,
    pub next_available: Option<String>,
    pub working_hours: Option<String>,
    pub timezone: Option<String>,
    pub packages: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ActorRow> for ActorProfile {
    type Error = serde_json::Error;

    fn try_from(row: ActorRow) -> Result<Self, Self::Error> {
        Ok(Self {
            languages: serde_json::from_str(&row.languages)?,
            video_types: serde_json::from_str(&row.video_types)?,
            tones: serde_json::from_str(&row.tones)?,
            packages: serde_json::from_str(&row.packages)?,
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            avatar_url: row.avatar_url,
            tagline: row.tagline,
            bio: row.bio,
            base_price: row.base_price,
            express_delivery_price: row.express_delivery_price,
            express_delivery_time: row.express_delivery_time,
            standard_delivery_time: row.standard_delivery_time,
            rating: row.rating,
            review_count: row.review_count,
            featured: row.featured,
            verified: row.verified,
            completed_orders: row.completed_orders,
            average_response_time: row.average_response_time,
            next_available: row.next_available,
            working_hours: row.working_hours,
            timezone: row.timezone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// 创建演员请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActorRequest {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub name: String,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub video_types: Vec<String>,
    #[serde(default)]
    pub tones: Vec<String>,
    pub base_price: f64,
    pub express_delivery_price: Option<f64>,
    pub express_delivery_time: Option<i32>,
    pub standard_delivery_time: i32,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<i32>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub completed_orders: Option<i32>,
    pub average_response_time: Option<String>,
    pub next_available: Option<String>,
    pub working_hours: Option<String>,
    pub timezone: Option<String>,
    #[serde(default)]
    pub packages: Vec<ServicePackage>,
}

/// 更新演员请求
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActorRequest {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub tagline: Option<String>,
    pub bio: Option<String>,
    pub languages: Option<Vec<String>>,
    pub video_types: Option<Vec<String>>,
    pub tones: Option<Vec<String>>,
    pub base_price: Option<f64>,
    pub express_delivery_price: Option<f64>,
    pub express_delivery_time: Option<i32>,
    pub standard_delivery_time: Option<i32>,
    pub featured: Option<bool>,
    pub verified: Option<bool>,
    pub average_response_time: Option<String>,
    pub next_available: Option<String>,
    pub working_hours: Option<String>,
    pub timezone: Option<String>,
    pub packages: Option<Vec<ServicePackage>>,
}

/// 演员评价
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub actor_id: String,
    pub creator_id: String,
    pub creator_name: String,
    pub creator_avatar_url: Option<String>,
    pub rating: f64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// 创建评价请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub creator_id: String,
    pub creator_name: String,
    pub creator_avatar_url: Option<String>,
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
}

/// 作品集条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: String,
    pub actor_id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub video_type: String,
    pub language: String,
    pub tone: String,
    pub created_at: DateTime<Utc>,
}

/// 演员详情响应（包含评价与作品集）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorDetailResponse {
    #[serde(flatten)]
    pub actor: ActorProfile,
    pub reviews: Vec<Review>,
    pub portfolio: Vec<PortfolioItem>,
}

/// 演员列表过滤器
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ActorListFilters {
    pub featured: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ActorProfile {
    pub fn from_create_request(request: CreateActorRequest) -> Result<Self, ValidationError> {
        // 如果请求包含 ID，使用客户端提供的 ID；否则生成新 ID
        let id = match request.id {
            Some(id) => {
                uuid::Uuid::parse_str(&id).map_err(|_| ValidationError::InvalidId)?;
                id
            }
            None => uuid::Uuid::new_v4().to_string(),
        };

        let now = Utc::now();
        let actor = Self {
            id,
            user_id: request.user_id,
            name: request.name.trim().to_string(),
            avatar_url: request.avatar_url,
            tagline: request.tagline,
            bio: request.bio,
            languages: request.languages,
            video_types: request.video_types,
            tones: request.tones,
            base_price: request.base_price,
            express_delivery_price: request.express_delivery_price,
            express_delivery_time: request.express_delivery_time,
            standard_delivery_time: request.standard_delivery_time,
            rating: request.rating.unwrap_or(0.0),
            review_count: request.review_count.unwrap_or(0),
            featured: request.featured,
            verified: request.verified,
            completed_orders: request.completed_orders.unwrap_or(0),
            average_response_time: request.average_response_time,
            next_available: request.next_available,
            working_hours: request.working_hours,
            timezone: request.timezone,
            packages: request.packages,
            created_at: now,
            updated_at: now,
        };

        actor.validate()?;
        Ok(actor)
    }

    pub fn apply_update(&mut self, request: UpdateActorRequest) -> Result<(), ValidationError> {
        if let Some(name) = request.name {
            self.name = name.trim().to_string();
        }
        if let Some(avatar_url) = request.avatar_url {
            self.avatar_url = Some(avatar_url);
        }
        if let Some(tagline) = request.tagline {
            self.tagline = tagline;
        }
        if let Some(bio) = request.bio {
            self.bio = bio;
        }
        if let Some(languages) = request.languages {
            self.languages = languages;
        }
        if let Some(video_types) = request.video_types {
            self.video_types = video_types;
        }
        if let Some(tones) = request.tones {
            self.tones = tones;
        }
        if let Some(base_price) = request.base_price {
            self.base_price = base_price;
        }
        if let Some(price) = request.express_delivery_price {
            self.express_delivery_price = Some(price);
        }
        if let Some(days) = request.express_delivery_time {
            self.express_delivery_time = Some(days);
        }
        if let Some(days) = request.standard_delivery_time {
            self.standard_delivery_time = days;
        }
        if let Some(featured) = request.featured {
            self.featured = featured;
        }
        if let Some(verified) = request.verified {
            self.verified = verified;
        }
        if let Some(value) = request.average_response_time {
            self.average_response_time = Some(value);
        }
        if let Some(value) = request.next_available {
            self.next_available = Some(value);
        }
        if let Some(value) = request.working_hours {
            self.working_hours = Some(value);
        }
        if let Some(value) = request.timezone {
            self.timezone = Some(value);
        }
        if let Some(packages) = request.packages {
            self.packages = packages;
        }

        self.validate()?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 按名称查找套餐，未指定时取第一个
    pub fn find_package(&self, name: Option<&str>) -> Result<Option<&ServicePackage>, ValidationError> {
        match name {
            Some(name) => self
                .packages
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(name))
                .map(Some)
                .ok_or_else(|| ValidationError::UnknownPackage(name.to_string())),
            None => Ok(self.packages.first()),
        }
    }

    pub fn languages_json(&self) -> String {
        serde_json::to_string(&self.languages).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn video_types_json(&self) -> String {
        serde_json::to_string(&self.video_types).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn tones_json(&self) -> String {
        serde_json::to_string(&self.tones).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn packages_json(&self) -> String {
        serde_json::to_string(&self.packages).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Validator for ActorProfile {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        StringValidator::validate_name(&self.name, 1, 100)?;
        StringValidator::validate_tagline(&self.tagline)?;
        StringValidator::validate_bio(&self.bio)?;
        StringValidator::validate_url(&self.avatar_url)?;
        TagValidator::validate_tags("languages", &self.languages)?;
        TagValidator::validate_tags("videoTypes", &self.video_types)?;
        TagValidator::validate_tags("tones", &self.tones)?;
        NumberValidator::validate_price(self.base_price)?;
        NumberValidator::validate_delivery_time(self.standard_delivery_time)?;
        NumberValidator::validate_rating(self.rating)?;
        NumberValidator::validate_count("reviewCount", self.review_count)?;
        NumberValidator::validate_count("completedOrders", self.completed_orders)?;

        if let Some(price) = self.express_delivery_price {
            NumberValidator::validate_price(price)?;
        }
        if let Some(days) = self.express_delivery_time {
            NumberValidator::validate_delivery_time(days)?;
        }
        for package in &self.packages {
            StringValidator::validate_name(&package.name, 1, 50)?;
            NumberValidator::validate_price(package.price)?;
            NumberValidator::validate_delivery_time(package.delivery_time)?;
        }

        Ok(())
    }
}

impl Review {
    pub fn from_create_request(actor_id: String, request: CreateReviewRequest) -> Result<Self, ValidationError> {
        NumberValidator::validate_rating(request.rating)?;
        StringValidator::validate_name(&request.creator_name, 1, 100)?;
        StringValidator::validate_comment(&request.comment)?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            actor_id,
            creator_id: request.creator_id,
            creator_name: request.creator_name,
            creator_avatar_url: request.creator_avatar_url,
            rating: request.rating,
            comment: request.comment,
            created_at: Utc::now(),
        })
    }
}
