use std::str::FromStr;

use bitcoin::consensus::encode;
use bitcoin::{Amount, ScriptBuf, Sequence, Transaction, TxOut, Txid};
use serde::Deserialize;

use crate::error::AppError;
use crate::types::{DEFAULT_SEQUENCE, InputDescriptor, InputProvenance, OutputDescriptor};

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub network: String, // "bitcoin", "testnet", "signet", "regtest"
    pub lock_time: u32,
    pub inputs: Vec<InputDef>,
    pub outputs: Vec<OutputDef>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct InputDef {
    pub tx_id: String,
    pub vout: u32,
    #[serde(default)]
    pub sequence: Option<u32>,
    #[serde(default)]
    pub raw_transaction: Option<String>,
    #[serde(default)]
    pub script_pub_key: Option<String>,
    #[serde(default)]
    pub amount: Option<u64>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct OutputDef {
    pub amount: u64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub public_key: Option<String>,
}

impl BuildRequest {
    pub fn input_descriptors(&self) -> Result<Vec<InputDescriptor>, AppError> {
        self.inputs.iter().map(InputDescriptor::try_from).collect()
    }

    pub fn output_descriptors(&self) -> Result<Vec<OutputDescriptor>, AppError> {
        self.outputs.iter().map(OutputDescriptor::try_from).collect()
    }
}

impl TryFrom<&InputDef> for InputDescriptor {
    type Error = AppError;

    fn try_from(def: &InputDef) -> Result<Self, Self::Error> {
        let previous_txid = Txid::from_str(&def.tx_id)
            .map_err(|e| AppError::InvalidInput(format!("無効なTXID形式 ({}): {}", def.tx_id, e)))?;

        let provenance = match (&def.raw_transaction, &def.script_pub_key, def.amount) {
            (Some(raw_hex), None, None) => {
                let raw = hex::decode(raw_hex).map_err(|e| {
                    AppError::InvalidInput(format!("rawTransactionのデコード失敗 ({}): {}", def.tx_id, e))
                })?;
                let previous_tx: Transaction = encode::deserialize(&raw).map_err(|e| {
                    AppError::InvalidInput(format!("rawTransactionのパース失敗 ({}): {}", def.tx_id, e))
                })?;
                InputProvenance::FullTransaction(previous_tx)
            }
            (None, Some(script_hex), Some(amount)) => {
                let script_bytes = hex::decode(script_hex).map_err(|e| {
                    AppError::InvalidInput(format!("scriptPubKeyのデコード失敗 ({}): {}", def.tx_id, e))
                })?;
                InputProvenance::Witness(TxOut {
                    value: Amount::from_sat(amount),
                    script_pubkey: ScriptBuf::from_bytes(script_bytes),
                })
            }
            (None, Some(_), None) => {
                return Err(AppError::InvalidInput(format!(
                    "scriptPubKeyを指定した入力にはamountが必要です ({}:{})",
                    def.tx_id, def.vout
                )));
            }
            (None, None, _) => {
                return Err(AppError::InvalidInput(format!(
                    "rawTransactionまたはscriptPubKey/amountのどちらかが必要です ({}:{})",
                    def.tx_id, def.vout
                )));
            }
            (Some(_), _, _) => {
                return Err(AppError::InvalidInput(format!(
                    "rawTransactionとscriptPubKey/amountは同時に指定できません ({}:{})",
                    def.tx_id, def.vout
                )));
            }
        };

        Ok(InputDescriptor {
            previous_txid,
            previous_index: def.vout,
            sequence: def.sequence.map(Sequence).unwrap_or(DEFAULT_SEQUENCE),
            provenance,
        })
    }
}

impl TryFrom<&OutputDef> for OutputDescriptor {
    type Error = AppError;

    fn try_from(def: &OutputDef) -> Result<Self, Self::Error> {
        let amount = Amount::from_sat(def.amount);
        match (&def.address, &def.public_key) {
            (Some(address), None) => Ok(OutputDescriptor::Payment {
                address: address.clone(),
                amount,
            }),
            (None, Some(key_hex)) => {
                let public_key = hex::decode(key_hex).map_err(|e| {
                    AppError::InvalidPublicKey(format!("publicKeyのデコード失敗 ({}): {}", key_hex, e))
                })?;
                Ok(OutputDescriptor::Stake { public_key, amount })
            }
            (Some(_), Some(_)) => Err(AppError::InvalidInput(
                "出力にaddressとpublicKeyは同時に指定できません".to_string(),
            )),
            (None, None) => Err(AppError::InvalidInput(
                "出力にはaddressまたはpublicKeyが必要です".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P2WPKH_SCRIPT: &str = "0014751e76e8199196d454941c45d1b3a323f1433bd6";
    const COMPRESSED_KEY: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn witness_input() -> InputDef {
        InputDef {
            tx_id: "aa".repeat(32),
            vout: 0,
            script_pub_key: Some(P2WPKH_SCRIPT.to_string()),
            amount: Some(100_000),
            ..Default::default()
        }
    }

    #[test]
    fn parses_camel_case_request() {
        let json = format!(
            r#"{{
                "network": "testnet",
                "lockTime": 500000,
                "inputs": [{{"txId": "{}", "vout": 1, "sequence": 4294967294,
                             "scriptPubKey": "{}", "amount": 100000}}],
                "outputs": [{{"amount": 90000, "publicKey": "{}"}},
                            {{"amount": 5000, "address": "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx"}}]
            }}"#,
            "aa".repeat(32),
            P2WPKH_SCRIPT,
            COMPRESSED_KEY
        );
        let request: BuildRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.lock_time, 500_000);

        let inputs = request.input_descriptors().unwrap();
        assert_eq!(inputs[0].previous_index, 1);
        assert_eq!(inputs[0].sequence, Sequence(0xffff_fffe));
        assert!(matches!(inputs[0].provenance, InputProvenance::Witness(ref out) if out.value == Amount::from_sat(100_000)));

        let outputs = request.output_descriptors().unwrap();
        assert!(outputs[0].is_stake());
        assert!(!outputs[1].is_stake());
        assert_eq!(outputs[1].amount(), Amount::from_sat(5_000));
    }

    #[test]
    fn omitted_sequence_defaults_to_final() {
        let input = InputDescriptor::try_from(&witness_input()).unwrap();
        assert_eq!(input.sequence, Sequence::MAX);
    }

    #[test]
    fn both_provenance_forms_are_rejected() {
        let def = InputDef {
            raw_transaction: Some("00".to_string()),
            ..witness_input()
        };
        assert!(matches!(
            InputDescriptor::try_from(&def),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn missing_provenance_is_rejected() {
        let def = InputDef {
            tx_id: "aa".repeat(32),
            ..Default::default()
        };
        assert!(matches!(
            InputDescriptor::try_from(&def),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn witness_provenance_requires_amount() {
        let def = InputDef {
            amount: None,
            ..witness_input()
        };
        assert!(matches!(
            InputDescriptor::try_from(&def),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn bad_hex_fields_are_rejected() {
        let bad_script = InputDef {
            script_pub_key: Some("zz".to_string()),
            ..witness_input()
        };
        assert!(matches!(
            InputDescriptor::try_from(&bad_script),
            Err(AppError::InvalidInput(_))
        ));

        let bad_txid = InputDef {
            tx_id: "1234".to_string(),
            ..witness_input()
        };
        assert!(matches!(
            InputDescriptor::try_from(&bad_txid),
            Err(AppError::InvalidInput(_))
        ));

        let bad_raw = InputDef {
            raw_transaction: Some("0200".to_string()),
            script_pub_key: None,
            amount: None,
            ..witness_input()
        };
        assert!(matches!(
            InputDescriptor::try_from(&bad_raw),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn output_needs_exactly_one_destination() {
        let both = OutputDef {
            amount: 1,
            address: Some("tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx".to_string()),
            public_key: Some(COMPRESSED_KEY.to_string()),
        };
        assert!(matches!(
            OutputDescriptor::try_from(&both),
            Err(AppError::InvalidInput(_))
        ));

        let neither = OutputDef {
            amount: 1,
            ..Default::default()
        };
        assert!(matches!(
            OutputDescriptor::try_from(&neither),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn non_hex_public_key_is_rejected() {
        let def = OutputDef {
            amount: 1,
            public_key: Some("not-hex".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            OutputDescriptor::try_from(&def),
            Err(AppError::InvalidPublicKey(_))
        ));
    }
}
