// Conversational resume synchronization.
// Implements: at-most-once tool result application, lenient payload decoding,
// the per-session engine that owns the canonical document, and its HTTP surface.

pub mod dedup;
pub mod engine;
pub mod handlers;
pub mod payload;
pub mod session;

pub use session::SessionRegistry;
