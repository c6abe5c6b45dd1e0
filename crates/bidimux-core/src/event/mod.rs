//! Event delivery: subscriptions and the event manager.

pub mod manager;
pub mod subscription;

pub use manager::EventManager;
pub use subscription::{EventScope, Subscription, SubscriptionManager};
