//! CLTV (OP_CHECKLOCKTIMEVERIFY) でロックされたステーキング用の未署名トランザクションを構築する。
//!
//! 署名・ブロードキャスト・手数料計算は行わない。結果は BIP-174 の PSBT として
//! シリアライズされる。

pub mod config;
pub mod error;
pub mod network;
pub mod script;
pub mod transaction;
pub mod types;

pub use error::AppError;
pub use network::NetworkParams;
pub use script::{build_locking_script, LockingScript};
pub use transaction::{
    build_from_request, build_unsigned_psbt, build_unsigned_transaction,
    build_unsigned_transaction_hex, encode_psbt, OutputFormat,
};
pub use types::{InputDescriptor, InputProvenance, OutputDescriptor};
