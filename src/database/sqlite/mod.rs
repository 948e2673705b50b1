mod query;
mod sqlite_pool;

pub use sqlite_pool::SqliteDBPool;
