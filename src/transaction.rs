use bitcoin::absolute::LockTime;
use bitcoin::consensus::encode;
use bitcoin::psbt::Psbt;
use bitcoin::transaction::Version;
use bitcoin::{ScriptBuf, Transaction, TxIn, TxOut, Witness};
use clap::ValueEnum;

use crate::config::BuildRequest;
use crate::error::AppError;
use crate::network::NetworkParams;
use crate::script::build_locking_script;
use crate::types::{InputDescriptor, InputProvenance, OutputDescriptor};

/// 未署名トランザクションのバージョン
pub const TX_VERSION: Version = Version::TWO;

/// ロックタイム 0 はコンテナのロックタイムを設定しない状態として扱う
pub const UNSET_LOCK_TIME: LockTime = LockTime::ZERO;

/// 構築結果の出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// PSBT (BIP-174) の16進数
    #[default]
    PsbtHex,
    /// PSBT の base64
    PsbtBase64,
    /// PSBT に含まれる未署名トランザクションの16進数
    RawTx,
}

/// 入力・出力・ロックタイムから未署名の PSBT を組み立てる。
///
/// 入力と出力は記述子の順序どおりに1対1で追加される。ステーキング出力の
/// redeem script は PSBT の出力マップにも記録する。いずれかの段階で失敗した場合は
/// 途中までの結果を返さずにエラーを返す。
pub fn build_unsigned_psbt(
    params: &NetworkParams,
    lock_time: u32,
    inputs: &[InputDescriptor],
    outputs: &[OutputDescriptor],
) -> Result<Psbt, AppError> {
    let mut tx_inputs = Vec::with_capacity(inputs.len());
    for (input_index, input) in inputs.iter().enumerate() {
        if let InputProvenance::FullTransaction(previous_tx) = &input.provenance {
            let actual_txid = previous_tx.compute_txid();
            if actual_txid != input.previous_txid {
                return Err(AppError::InvalidInput(format!(
                    "入力 {} のrawTransactionのTXID ({}) がtxId ({}) と一致しません",
                    input_index, actual_txid, input.previous_txid
                )));
            }
        }
        tx_inputs.push(TxIn {
            previous_output: input.out_point(),
            script_sig: ScriptBuf::new(),
            sequence: input.sequence,
            witness: Witness::new(),
        });
    }

    let mut tx_outputs = Vec::with_capacity(outputs.len());
    let mut redeem_scripts = Vec::with_capacity(outputs.len());
    for output in outputs {
        match output {
            OutputDescriptor::Payment { address, amount } => {
                let address = params.parse_address(address)?;
                tx_outputs.push(TxOut {
                    value: *amount,
                    script_pubkey: address.script_pubkey(),
                });
                redeem_scripts.push(None);
            }
            OutputDescriptor::Stake { public_key, amount } => {
                let locking_script = build_locking_script(lock_time, public_key)?;
                tx_outputs.push(TxOut {
                    value: *amount,
                    script_pubkey: locking_script.script_pubkey().clone(),
                });
                redeem_scripts.push(Some(locking_script.redeem_script().clone()));
            }
        }
    }

    let mut transaction = Transaction {
        version: TX_VERSION,
        lock_time: UNSET_LOCK_TIME,
        input: tx_inputs,
        output: tx_outputs,
    };
    if lock_time != 0 {
        transaction.lock_time = LockTime::from_consensus(lock_time);
    }

    let mut psbt = Psbt::from_unsigned_tx(transaction)
        .map_err(|e| AppError::SerializationFailure(format!("PSBTの作成に失敗: {}", e)))?;

    for (psbt_input, input) in psbt.inputs.iter_mut().zip(inputs) {
        match &input.provenance {
            InputProvenance::FullTransaction(previous_tx) => {
                psbt_input.non_witness_utxo = Some(previous_tx.clone());
            }
            InputProvenance::Witness(previous_out) => {
                psbt_input.witness_utxo = Some(previous_out.clone());
            }
        }
    }
    for (psbt_output, redeem_script) in psbt.outputs.iter_mut().zip(redeem_scripts) {
        psbt_output.redeem_script = redeem_script;
    }

    Ok(psbt)
}

/// 未署名の PSBT を組み立て、正規のバイト列にシリアライズする。
pub fn build_unsigned_transaction(
    params: &NetworkParams,
    lock_time: u32,
    inputs: &[InputDescriptor],
    outputs: &[OutputDescriptor],
) -> Result<Vec<u8>, AppError> {
    let psbt = build_unsigned_psbt(params, lock_time, inputs, outputs)?;
    Ok(psbt.serialize())
}

pub fn build_unsigned_transaction_hex(
    params: &NetworkParams,
    lock_time: u32,
    inputs: &[InputDescriptor],
    outputs: &[OutputDescriptor],
) -> Result<String, AppError> {
    let psbt = build_unsigned_psbt(params, lock_time, inputs, outputs)?;
    Ok(encode_psbt(&psbt, OutputFormat::PsbtHex))
}

pub fn encode_psbt(psbt: &Psbt, format: OutputFormat) -> String {
    match format {
        OutputFormat::PsbtHex => psbt.serialize_hex(),
        OutputFormat::PsbtBase64 => psbt.to_string(),
        OutputFormat::RawTx => encode::serialize_hex(&psbt.unsigned_tx),
    }
}

/// JSON のビルド要求からネットワークを解決し、指定形式の文字列を返す。
pub fn build_from_request(request: &BuildRequest, format: OutputFormat) -> Result<String, AppError> {
    let params = NetworkParams::from_name(&request.network)?;
    let inputs = request.input_descriptors()?;
    let outputs = request.output_descriptors()?;
    let psbt = build_unsigned_psbt(&params, request.lock_time, &inputs, &outputs)?;
    Ok(encode_psbt(&psbt, format))
}
