//! RxGrid - Pharmacy grid routing optimizer
//!
//! This library selects the best-fit pharmacy node for an order by applying
//! hard eligibility gates (activity, load ceiling, per-item stock, delivery
//! SLA) followed by a weighted multi-factor score over proximity, load,
//! stock health, and cost.

pub mod config;
pub mod grid;
pub mod logging;
pub mod pipeline;
pub mod scheduling;
