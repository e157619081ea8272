//! Delivery module
//!
//! Out-of-band delivery of issued codes: a bounded job queue drained by a
//! background worker that retries each SMS under a per-attempt timeout.

pub mod queued_dispatcher;


pub use queued_dispatcher::{DeliveryJob, DeliveryPolicy, QueuedDeliveryDispatcher};
