use bitcoin::{Amount, OutPoint, Sequence, Transaction, TxOut, Txid};

/// `sequence` 省略時の値 (0xffffffff、相対ロックタイムなしのファイナル)。
pub const DEFAULT_SEQUENCE: Sequence = Sequence::MAX;

/// 入力が参照する直前の出力の証明方法。必ずどちらか一方だけを持つ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputProvenance {
    /// レガシー形式: 直前のトランザクション全体
    FullTransaction(Transaction),
    /// ウィットネス形式: 直前の出力の scriptPubKey と金額
    Witness(TxOut),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDescriptor {
    pub previous_txid: Txid,
    pub previous_index: u32,
    pub sequence: Sequence,
    pub provenance: InputProvenance,
}

impl InputDescriptor {
    pub fn out_point(&self) -> OutPoint {
        OutPoint::new(self.previous_txid, self.previous_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDescriptor {
    /// アドレス宛ての通常の支払い出力
    Payment { address: String, amount: Amount },
    /// ビルド共通のロックタイムと公開鍵で CLTV ロックされるステーキング出力
    Stake { public_key: Vec<u8>, amount: Amount },
}

impl OutputDescriptor {
    pub fn amount(&self) -> Amount {
        match self {
            OutputDescriptor::Payment { amount, .. } | OutputDescriptor::Stake { amount, .. } => {
                *amount
            }
        }
    }

    pub fn is_stake(&self) -> bool {
        matches!(self, OutputDescriptor::Stake { .. })
    }
}
