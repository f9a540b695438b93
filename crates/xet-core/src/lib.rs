pub mod config;
pub mod error;
pub mod types;

pub use config::XetConfig;
pub use error::{XetError, XetResult};
pub use types::{Chunk, MerkleHash, HASH_LEN};
