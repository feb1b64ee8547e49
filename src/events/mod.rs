pub mod types;

pub use types::{CtaEvent, CtaEventPayload, CtaEventType};
