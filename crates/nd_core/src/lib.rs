pub mod error;
pub mod storage;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use storage::{ArticleStore, StoreSnapshot};
pub use text::{normalize_link, similarity, tokenize};
pub use types::*;

pub mod prelude {
    pub use crate::storage::{ArticleStore, StoreSnapshot};
    pub use crate::types::*;
    pub use crate::{Error, Result};
}
