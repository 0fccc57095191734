use std::fs;
use std::path::Path;

use clap::Parser;
use serde::de::DeserializeOwned;

mod cli;

use cli::{CliArgs, Command};
use stake_tx::config::BuildRequest;
use stake_tx::{build_from_request, build_locking_script, AppError, NetworkParams, OutputDescriptor};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("トランザクションの生成に失敗しました: {:?}", e);
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = CliArgs::parse();
    log::info!("アプリケーションを開始します。引数: {:?}", args);

    let (request, format, output_file) = match args.command {
        Command::CreateRaw {
            network,
            locktime,
            inputs,
            outputs,
            format,
            output_file,
        } => {
            let request = BuildRequest {
                network,
                lock_time: locktime,
                inputs: parse_json("--inputs", &inputs)?,
                outputs: parse_json("--outputs", &outputs)?,
            };
            (request, format, output_file)
        }
        Command::CreateRawFromFile {
            input_file,
            format,
            output_file,
        } => {
            let content = fs::read_to_string(&input_file).map_err(|e| {
                log::error!("入力ファイルの読み込みに失敗しました: {:?}", input_file);
                AppError::Io(e)
            })?;
            let request: BuildRequest = parse_json(&input_file.display().to_string(), &content)?;
            (request, format, output_file)
        }
    };
    log::debug!("ビルド要求のパース成功: {:?}", request);

    if request.lock_time == 0 {
        log::warn!("ロックタイムが0です。トランザクションのロックタイムは設定されません。");
    }
    log_stake_addresses(&request);

    let encoded = build_from_request(&request, format)?;
    log::info!("未署名トランザクションの生成に成功しました (形式: {:?})。", format);

    println!("{}", encoded);

    if let Some(path) = output_file {
        write_output(&path, &encoded)?;
    }

    log::info!("処理が正常に完了しました。");
    Ok(())
}

fn parse_json<T: DeserializeOwned>(source_name: &str, content: &str) -> Result<T, AppError> {
    serde_json::from_str(content).map_err(|e| {
        log::error!("JSONのパースに失敗しました: {}", source_name);
        AppError::JsonParse {
            source_name: source_name.to_string(),
            source: e,
        }
    })
}

// ステーキング出力の P2SH アドレスをデバッグ用に表示する。失敗はビルド本体で報告される。
fn log_stake_addresses(request: &BuildRequest) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    let (Ok(params), Ok(outputs)) = (
        NetworkParams::from_name(&request.network),
        request.output_descriptors(),
    ) else {
        return;
    };
    for (index, output) in outputs.iter().enumerate() {
        if let OutputDescriptor::Stake { public_key, amount } = output {
            if let Ok(address) = build_locking_script(request.lock_time, public_key)
                .and_then(|script| script.address(&params))
            {
                log::debug!("ステーキング出力 {}: address={}, value={}", index, address, amount);
            }
        }
    }
}

fn write_output(path: &Path, encoded: &str) -> Result<(), AppError> {
    fs::write(path, encoded).map_err(|e| {
        log::error!("出力ファイルへの書き込みに失敗しました: {:?}", path);
        AppError::Io(e)
    })?;
    log::info!("結果を {:?} に保存しました。", path);
    Ok(())
}
