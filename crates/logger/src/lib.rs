//! Process-wide tracing setup shared by the inspector binaries.

mod subscriber;

pub use subscriber::{init_tracing, init_tracing_with_level, try_init_tracing};
