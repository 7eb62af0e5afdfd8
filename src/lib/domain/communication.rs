//! Outbound email: addresses, messages, delivery backends and campaign dispatch.

pub mod dispatch;
pub mod email_addresses;
pub mod mailer;
