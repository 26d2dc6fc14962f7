pub mod ancestors;
pub mod config;
pub mod detail;
pub mod error;
pub mod storage;
pub mod store;
pub mod tree;
pub mod types;

pub use ancestors::ancestors;
pub use config::BuildLimits;
pub use detail::assemble;
pub use error::{CategoryError, CategoryResult};
pub use storage::{CategoryStorage, SqliteCategoryStorage};
pub use store::CategoryStore;
pub use tree::build;
pub use types::{Category, CategoryDetail, CategorySpec, MAX_NAME_LEN};
