//! Order book used for live queue-depth counts

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::grid::GridError;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Verified,
    Picking,
    Packed,
    Dispatched,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether this order still occupies the pharmacy's fulfillment queue.
    ///
    /// Packed and later statuses no longer consume picking capacity.
    pub fn is_queued(self) -> bool {
        matches!(
            self,
            OrderStatus::Pending
                | OrderStatus::Confirmed
                | OrderStatus::Verified
                | OrderStatus::Picking
        )
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "verified" => Ok(OrderStatus::Verified),
            "picking" => Ok(OrderStatus::Picking),
            "packed" => Ok(OrderStatus::Packed),
            "dispatched" => Ok(OrderStatus::Dispatched),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Verified => "verified",
            OrderStatus::Picking => "picking",
            OrderStatus::Packed => "packed",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// An order assigned to a pharmacy node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_uid: String,
    pub pharmacy: String,
    pub status: OrderStatus,
}

/// Orders grouped by assigned pharmacy, supporting queue-depth queries.
pub struct OrderBook {
    orders: DashMap<String, OrderRecord>,
}

impl OrderBook {
    /// Create an empty order book.
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
        }
    }

    /// Record a new order against a pharmacy; returns the generated order uid.
    pub fn open(&self, pharmacy: &str, status: OrderStatus) -> String {
        let order_uid = Uuid::new_v4().to_string();
        self.orders.insert(
            order_uid.clone(),
            OrderRecord {
                order_uid: order_uid.clone(),
                pharmacy: pharmacy.to_string(),
                status,
            },
        );
        order_uid
    }

    /// Advance an order to a new status.
    pub fn set_status(&self, order_uid: &str, status: OrderStatus) -> Result<(), GridError> {
        let mut order = self
            .orders
            .get_mut(order_uid)
            .ok_or_else(|| GridError::OrderNotFound(order_uid.to_string()))?;
        order.status = status;
        Ok(())
    }

    /// Count of orders still occupying a pharmacy's fulfillment queue.
    ///
    /// Counts statuses pending, confirmed, verified, and picking.
    pub fn queue_depth(&self, pharmacy: &str) -> u32 {
        self.orders
            .iter()
            .filter(|entry| entry.value().pharmacy == pharmacy && entry.value().status.is_queued())
            .count() as u32
    }

    /// Total orders recorded across the grid.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
