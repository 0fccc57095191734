use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, Network as BitcoinNetwork};

use crate::error::AppError;

/// アドレスのデコードに使うネットワークパラメータ。
///
/// ビルド1回ごとに呼び出し側から渡され、ビルド中は変更されない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParams {
    network: BitcoinNetwork,
}

impl NetworkParams {
    pub fn new(network: BitcoinNetwork) -> Self {
        Self { network }
    }

    /// ネットワーク名 ("bitcoin", "testnet", "signet", "regtest") から解決する。
    pub fn from_name(network_str: &str) -> Result<Self, AppError> {
        let network = match network_str.to_lowercase().as_str() {
            "bitcoin" | "mainnet" => BitcoinNetwork::Bitcoin,
            "testnet" => BitcoinNetwork::Testnet,
            "signet" => BitcoinNetwork::Signet,
            "regtest" => BitcoinNetwork::Regtest,
            _ => return Err(AppError::UnknownNetwork(network_str.to_string())),
        };
        Ok(Self::new(network))
    }

    pub fn network(&self) -> BitcoinNetwork {
        self.network
    }

    /// このネットワークのアドレスとしてデコードする。別ネットワークのアドレスはエラー。
    pub fn parse_address(&self, address: &str) -> Result<Address, AppError> {
        address
            .parse::<Address<NetworkUnchecked>>()
            .and_then(|addr| addr.require_network(self.network))
            .map_err(|source| AppError::InvalidAddress {
                address: address.to_string(),
                source,
            })
    }
}
