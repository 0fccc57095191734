use bitcoin::address::ParseError as BitcoinAddressError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/Oエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSONパースエラー ({source_name}): {source}")]
    JsonParse {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("不明なネットワークが指定されました: {0}")]
    UnknownNetwork(String),

    #[error("入力検証エラー: {0}")]
    InvalidInput(String),

    #[error("アドレスの形式エラーまたはネットワーク不整合 ({address}): {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: BitcoinAddressError,
    },

    #[error("無効な公開鍵: {0}")]
    InvalidPublicKey(String),

    #[error("シリアライズエラー: {0}")]
    SerializationFailure(String),
}
