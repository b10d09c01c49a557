/// Reserved event name for pure-delay steps. Its handler is pre-registered by the engine.
pub const DELAY_EVENT_NAME: &str = "chain.sleep";
/// Parameter carrying a delay step's length in milliseconds.
pub const DURATION_KEY: &str = "duration";
/// Key under which a step receives the previous step's carry-forward context.
pub const PREV_KEY: &str = "prev";
/// Key under which a scalar handler result is wrapped.
pub const VALUE_KEY: &str = "value";
/// Batch event names translated into delay steps when no aliases are configured.
pub const DEFAULT_DELAY_ALIASES: &[&str] = &["sleep", "delay"];
