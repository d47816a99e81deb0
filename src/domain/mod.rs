pub mod context;
pub mod event;

pub use context::{Identity, RequestContext};
pub use event::{Level, LogEvent};
