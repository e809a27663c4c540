use clap::Parser;
use dict_prep::config::cli::{Command, ConvertArgs, EnrichArgs};
use dict_prep::utils::{logger, validation::Validate};
use dict_prep::{convert_file, enrich_directory, CliConfig, PrepConfig, PrepError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 載入可選的 TOML 配置
    let file_config = match &cli.config {
        Some(path) => match PrepConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(e.exit_code().max(1));
            }
        },
        None => PrepConfig::default(),
    };

    // 初始化日誌
    logger::init_cli_logger(cli.verbose || file_config.verbose());
    tracing::debug!("CLI config: {:?}", cli);

    // 執行子命令
    let result = match &cli.command {
        Command::Convert(args) => run_convert(args, &file_config),
        Command::Enrich(args) => run_enrich(args, &file_config),
    };

    if let Err(e) = result {
        // 記錄詳細錯誤信息並輸出用戶友好的訊息
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn run_convert(args: &ConvertArgs, file_config: &PrepConfig) -> Result<(), PrepError> {
    // 合併配置：命令列 > TOML > 預設值
    let settings = args.apply(file_config.convert_settings());

    // 驗證配置
    settings.validate()?;

    tracing::info!("Converting {} -> {}", settings.input, settings.output);

    // 轉換並寫出 JSONL
    let report = convert_file(&settings)?;

    tracing::info!(
        "✅ Wrote {} lines to {}",
        report.lines_written,
        report.output_path
    );
    println!("✅ Conversion succeeded! Output saved to: {}", report.output_path);
    Ok(())
}

fn run_enrich(args: &EnrichArgs, file_config: &PrepConfig) -> Result<(), PrepError> {
    // 合併配置：命令列 > TOML > 預設值
    let settings = args.apply(file_config.enrich_settings());

    // 驗證配置
    settings.validate()?;

    tracing::info!(
        "Enriching {} from {} (fields: {})",
        settings.dir,
        settings.reference_file,
        settings.tracked_fields.join(", ")
    );

    // 補全目錄中的所有 JSON 檔案
    let report = enrich_directory(settings)?;

    // 預演模式只顯示結果，不寫回檔案
    if report.dry_run {
        for file in &report.files {
            println!(
                "  {}: {} records, {} enriched, {} fields would be filled",
                file.file_name, file.records, file.records_enriched, file.fields_filled
            );
        }
    }
    println!("✅ All files processed.");
    Ok(())
}
