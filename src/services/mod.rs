mod store;
mod redis_service;
mod memory_store;
mod credentials;
mod users;
mod labels;
mod tasks;

pub use store::{DocumentStore, Keys};
pub use redis_service::RedisStore;
pub use memory_store::MemoryStore;
pub use credentials::{Claims, Credentials};
pub use users::UserStore;
pub use labels::LabelStore;
pub use tasks::TaskStore;
