use chrono::{DateTime, Duration, Utc};

use crate::models::{ActorProfile, OrderQuote, ValidationError, DEFAULT_REVISIONS};

/// 计算订单报价
///
/// 未指定套餐时取第一个；没有套餐的演员按基础价格与标准交付时间报价。
/// 加急费用叠加在套餐价格之上，交付天数改用加急天数。
pub fn quote(
    actor: &ActorProfile,
    package_name: Option<&str>,
    express: bool,
    now: DateTime<Utc>,
) -> Result<OrderQuote, ValidationError> {
    let (name, mut price, mut days, revisions) = match actor.find_package(package_name)? {
        Some(package) => (
            Some(package.name.clone()),
            package.price,
            package.delivery_time,
            package.revision_allowance(),
        ),
        None => (None, actor.base_price, actor.standard_delivery_time, Some(DEFAULT_REVISIONS)),
    };

    if express {
        match (actor.express_delivery_price, actor.express_delivery_time) {
            (Some(fee), Some(express_days)) => {
                price += fee;
                days = express_days.min(days);
            }
            _ => return Err(ValidationError::ExpressUnavailable),
        }
    }

    let delivery_date = now
        .checked_add_signed(Duration::days(i64::from(days)))
        .ok_or(ValidationError::DeliveryDateOutOfRange)?;

    Ok(OrderQuote {
        actor_id: actor.id.clone(),
        package_name: name,
        express_delivery: express,
        price,
        delivery_days: days,
        delivery_date,
        revisions,
    })
}
