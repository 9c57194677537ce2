pub mod store;
pub mod types;

pub use store::{SessionStore, StoreState};
pub use types::Record;
