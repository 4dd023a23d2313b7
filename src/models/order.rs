use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::ValidationError;

/// 订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Delivered,
    Completed,
    Revision,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::InProgress => write!(f, "in-progress"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Revision => write!(f, "revision"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "in-progress" => Ok(OrderStatus::InProgress),
            "delivered" => Ok(OrderStatus::Delivered),
            "completed" => Ok(OrderStatus::Completed),
            "revision" => Ok(OrderStatus::Revision),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(ValidationError::InvalidStatus(s.to_string())),
        }
    }
}

impl OrderStatus {
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, target),
            (Pending, InProgress)
                | (Pending, Cancelled)
                | (InProgress, Delivered)
                | (InProgress, Cancelled)
                | (Delivered, Completed)
                | (Delivered, Revision)
                | (Revision, Delivered)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// 订单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub creator_id: String,
    pub actor_id: String,
    pub package_name: Option<String>,
    pub status: String,
    pub project_title: Option<String>,
    pub instructions: Option<String>,
    pub script_url: Option<String>,
    pub assets_url: Option<String>,
    pub video_url: Option<String>,
    pub express_delivery: bool,
    pub price: f64,
    /// `None` 表示不限修改次数
    pub revisions_left: Option<i32>,
    pub delivery_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 报价请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub actor_id: String,
    pub package_name: Option<String>,
    #[serde(default)]
    pub express_delivery: bool,
}

/// 报价结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuote {
    pub actor_id: String,
    pub package_name: Option<String>,
    pub express_delivery: bool,
    pub price: f64,
    pub delivery_days: i32,
    pub delivery_date: DateTime<Utc>,
    pub revisions: Option<i32>,
}

/// 下单请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub creator_id: String,
    pub actor_id: String,
    pub package_name: Option<String>,
    #[serde(default)]
    pub express_delivery: bool,
    pub project_title: Option<String>,
    pub instructions: Option<String>,
    pub script_url: Option<String>,
    pub assets_url: Option<String>,
}

/// 更新订单状态请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    pub video_url: Option<String>,
}

/// 订单列表过滤器
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct OrderListFilters {
    pub creator_id: Option<String>,
    pub actor_id: Option<String>,
}

impl Order {
    pub fn from_quote(request: CreateOrderRequest, quote: OrderQuote) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            creator_id: request.creator_id,
            actor_id: request.actor_id,
            package_name: quote.package_name,
            status: OrderStatus::Pending.to_string(),
            project_title: request.project_title,
            instructions: request.instructions,
            script_url: request.script_url,
            assets_url: request.assets_url,
            video_url: None,
            express_delivery: quote.express_delivery,
            price: quote.price,
            revisions_left: quote.revisions,
            delivery_date: quote.delivery_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_status(&self) -> Result<OrderStatus, ValidationError> {
        self.status.parse()
    }

    /// 按状态机推进订单；进入 revision 会消耗一次修改机会
    pub fn transition(&mut self, target: OrderStatus) -> Result<(), ValidationError> {
        let current = self.get_status()?;
        if !current.can_transition_to(target) {
            return Err(ValidationError::InvalidStatusTransition {
                from: current.to_string(),
                to: target.to_string(),
            });
        }

        if target == OrderStatus::Revision {
            match self.revisions_left {
                Some(0) => return Err(ValidationError::NoRevisionsLeft),
                Some(n) => self.revisions_left = Some(n - 1),
                None => {}
            }
        }

        self.status = target.to_string();
        self.updated_at = Utc::now();
        Ok(())
    }
}
