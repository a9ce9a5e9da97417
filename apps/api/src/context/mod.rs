// Conversation context: append-only summary history per session and the
// persistence seam for the externally stored records.

pub mod handlers;
pub mod store;
pub mod versioning;

pub use store::InMemoryContextStore;
