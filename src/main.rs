// ==========================================
// 人事档案系统 - 命令行入口
// ==========================================
// 用法: hr-records <file> [--mime <type>] [--db <path>]
// 说明: 文件先复制到上传目录再导入，原文件不会被删除
// ==========================================

use anyhow::{anyhow, bail, Context};
use hr_records::app::{get_default_db_path, AppState};
use hr_records::importer::mime_for_file_name;
use hr_records::logging;
use std::path::PathBuf;

struct CliArgs {
    file: PathBuf,
    mime: Option<String>,
    db_path: Option<String>,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut file = None;
    let mut mime = None;
    let mut db_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mime" => mime = Some(args.next().ok_or_else(|| anyhow!("--mime 需要参数"))?),
            "--db" => db_path = Some(args.next().ok_or_else(|| anyhow!("--db 需要参数"))?),
            "-h" | "--help" => bail!("用法: hr-records <file> [--mime <type>] [--db <path>]"),
            _ if file.is_none() => file = Some(PathBuf::from(arg)),
            other => bail!("无法识别的参数: {}", other),
        }
    }

    Ok(CliArgs {
        file: file.ok_or_else(|| anyhow!("用法: hr-records <file> [--mime <type>] [--db <path>]"))?,
        mime,
        db_path,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args = parse_args()?;

    tracing::info!("人事档案系统 v{}", hr_records::VERSION);

    let db_path = args.db_path.unwrap_or_else(get_default_db_path);
    let state = AppState::new(db_path).await.map_err(|e| anyhow!(e))?;

    // 未指定 MIME 时按扩展名推断；无法推断时交给上传受理拒绝
    let mime = match args.mime {
        Some(m) => m,
        None => args
            .file
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(mime_for_file_name)
            .unwrap_or("application/octet-stream")
            .to_string(),
    };

    let response = state.employee_api.import_local_file(&args.file, &mime).await;
    let output = serde_json::to_string_pretty(&response).context("序列化响应失败")?;
    println!("{}", output);

    if !response.success {
        std::process::exit(1);
    }
    Ok(())
}
