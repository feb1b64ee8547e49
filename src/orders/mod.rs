pub mod stop_order;

pub use stop_order::{is_stop_order_id, StopOrder, StopOrderIdGenerator};
