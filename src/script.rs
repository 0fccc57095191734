use bitcoin::absolute::LockTime;
use bitcoin::opcodes::all::{OP_CHECKSIG, OP_CLTV, OP_DROP};
use bitcoin::script::Builder;
use bitcoin::{Address, PublicKey, ScriptBuf};

use crate::error::AppError;
use crate::network::NetworkParams;

const COMPRESSED_KEY_LEN: usize = 33;
const UNCOMPRESSED_KEY_LEN: usize = 65;

/// ステーキング出力のロックスクリプト。
///
/// `redeem_script` は `<locktime> OP_CHECKLOCKTIMEVERIFY OP_DROP <pubkey> OP_CHECKSIG`、
/// `script_pubkey` はそのハッシュへの P2SH コミットメント。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockingScript {
    redeem_script: ScriptBuf,
    script_pubkey: ScriptBuf,
}

impl LockingScript {
    pub fn redeem_script(&self) -> &ScriptBuf {
        &self.redeem_script
    }

    pub fn script_pubkey(&self) -> &ScriptBuf {
        &self.script_pubkey
    }

    /// 出力の P2SH アドレス。
    pub fn address(&self, params: &NetworkParams) -> Result<Address, AppError> {
        Address::p2sh(&self.redeem_script, params.network())
            .map_err(|e| AppError::SerializationFailure(format!("P2SHアドレスの導出に失敗: {}", e)))
    }
}

/// ロックタイムと公開鍵から CLTV ロックスクリプトを構築する。
///
/// ロックタイムは最小のスクリプト数値エンコーディングで push される
/// (0 は `OP_0`、1..=16 は `OP_1`..`OP_16`)。
pub fn build_locking_script(lock_time: u32, public_key: &[u8]) -> Result<LockingScript, AppError> {
    if public_key.len() != COMPRESSED_KEY_LEN && public_key.len() != UNCOMPRESSED_KEY_LEN {
        return Err(AppError::InvalidPublicKey(format!(
            "公開鍵の長さが不正です: {} バイト (33 または 65 バイトが必要)",
            public_key.len()
        )));
    }
    let key = PublicKey::from_slice(public_key)
        .map_err(|e| AppError::InvalidPublicKey(format!("{} ({})", e, hex::encode(public_key))))?;

    let redeem_script = Builder::new()
        .push_lock_time(LockTime::from_consensus(lock_time))
        .push_opcode(OP_CLTV)
        .push_opcode(OP_DROP)
        .push_key(&key)
        .push_opcode(OP_CHECKSIG)
        .into_script();
    let script_pubkey = ScriptBuf::new_p2sh(&redeem_script.script_hash());

    Ok(LockingScript {
        redeem_script,
        script_pubkey,
    })
}
