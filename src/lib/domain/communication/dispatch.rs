//! Campaign dispatch: bulk sending over a [`Mailer`](super::mailer::Mailer) in
//! fixed-size, throttled batches.

mod outcome;
mod service;

pub use outcome::BulkOutcome;
pub use service::{
    panic_message, DispatchConfig, DispatchService, DispatchServiceImpl, BATCH_DELAY, BATCH_SIZE,
};
