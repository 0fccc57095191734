use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stake_tx::OutputFormat;

#[derive(Parser, Debug)]
#[clap(author, version, about = "CLTVロック付きステーキング用の未署名トランザクションを生成します", long_about = None)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// コマンドライン引数から未署名トランザクションを生成する
    CreateRaw {
        /// 使用するネットワーク ("bitcoin", "testnet", "signet", "regtest")
        #[clap(short, long)]
        network: String,

        /// ステーキング出力とトランザクションに設定するロックタイム
        #[clap(short, long)]
        locktime: u32,

        /// 入力のJSON配列
        #[clap(short, long)]
        inputs: String,

        /// 出力のJSON配列
        #[clap(short, long)]
        outputs: String,

        #[clap(short, long, value_enum, default_value_t = OutputFormat::PsbtHex)]
        format: OutputFormat,

        /// 結果を保存するファイルへのパス
        #[clap(long, value_parser)]
        output_file: Option<PathBuf>,
    },

    /// ビルド要求を記述したJSONファイルから未署名トランザクションを生成する
    CreateRawFromFile {
        /// network, lockTime, inputs, outputs を含むJSONファイルへのパス
        #[clap(short, long, value_parser)]
        input_file: PathBuf,

        #[clap(short, long, value_enum, default_value_t = OutputFormat::PsbtHex)]
        format: OutputFormat,

        /// 結果を保存するファイルへのパス
        #[clap(long, value_parser)]
        output_file: Option<PathBuf>,
    },
}
