pub mod handler;

pub use handler::{handler_fn, EventHandler, FnHandler, HandlerOutput, HandlerResult, StopSignal};
