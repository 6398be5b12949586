// ==========================================
// 客户与抄表导入系统 - 命令行入口
// ==========================================
// 命令: template / check / import
// 输出: 结果 JSON 写 stdout，日志写 stderr
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use meter_import::api::{ApiError, ImportApi, ImportPreview};
use meter_import::db::get_default_db_path;
use meter_import::importer::{template_file_name, template_for, write_rejected_csv};
use meter_import::{logging, ImportType};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "meter-import")]
#[command(about = "Validate and import customer / meter-reading CSV files")]
#[command(version)]
struct Cli {
    /// SQLite database file (roster source and import target)
    #[arg(long, global = true, env = "METER_IMPORT_DB_PATH")]
    db: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the CSV template for an import type
    #[command(after_help = "\
Examples:
  meter-import template customers > customers_template.csv
  meter-import template readings --file-name")]
    Template {
        /// customers | readings
        import_type: ImportType,

        /// Print the suggested file name instead of the content
        #[arg(long)]
        file_name: bool,
    },

    /// Validate a CSV file without importing
    #[command(after_help = "\
Examples:
  meter-import check customers customers.csv
  meter-import check readings readings.csv --report rejected.csv")]
    Check {
        /// customers | readings
        import_type: ImportType,

        /// Input CSV file
        file: PathBuf,

        /// Write rejected rows with their errors to this CSV file
        #[arg(long, value_name = "OUT")]
        report: Option<PathBuf>,
    },

    /// Validate a CSV file and submit the valid rows
    Import {
        /// customers | readings
        import_type: ImportType,

        /// Input CSV file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Template {
            import_type,
            file_name,
        } => {
            if file_name {
                println!("{}", template_file_name(import_type));
            } else {
                print!("{}", template_for(import_type));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check {
            import_type,
            file,
            report,
        } => {
            let api = open_api(cli.db)?;
            let preview = api.preview_file(import_type, &file).await?;

            print_rejected(&preview);
            if let Some(path) = report {
                write_report(&preview, &path)?;
            }
            println!("{}", serde_json::to_string_pretty(&preview.summary())?);

            Ok(if preview.summary().error_count == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Commands::Import { import_type, file } => {
            let api = open_api(cli.db)?;
            let preview = api.preview_file(import_type, &file).await?;
            print_rejected(&preview);

            let submitted = match &preview {
                ImportPreview::Customers(outcome) => api.submit_customers(outcome).await,
                ImportPreview::Readings(outcome) => api.submit_readings(outcome).await,
            };
            let report = match submitted {
                Ok(report) => report,
                Err(ApiError::NothingToImport) => {
                    eprintln!("{}", ApiError::NothingToImport);
                    return Ok(ExitCode::from(1));
                }
                Err(e) => return Err(e.into()),
            };

            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(if report.is_complete() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
    }
}

fn open_api(db: Option<String>) -> Result<ImportApi> {
    let db_path = db
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(get_default_db_path);
    info!(db_path = %db_path, "使用数据库");

    ImportApi::from_db_path(&db_path).with_context(|| format!("无法打开数据库: {}", db_path))
}

/// 拒绝行逐行输出到 stderr
fn print_rejected(preview: &ImportPreview) {
    let lines: Vec<String> = match preview {
        ImportPreview::Customers(outcome) => outcome
            .rejected_rows
            .iter()
            .map(|row| format!("row {}: {}", row.raw.row_number(), row.error_text()))
            .collect(),
        ImportPreview::Readings(outcome) => outcome
            .rejected_rows
            .iter()
            .map(|row| format!("row {}: {}", row.raw.row_number(), row.error_text()))
            .collect(),
    };
    for line in lines {
        eprintln!("{}", line);
    }
}

fn write_report(preview: &ImportPreview, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("无法创建报告文件: {}", path.display()))?;
    let writer = BufWriter::new(file);

    let written = match preview {
        ImportPreview::Customers(outcome) => {
            write_rejected_csv(ImportType::Customers, &outcome.rejected_rows, writer)?
        }
        ImportPreview::Readings(outcome) => {
            write_rejected_csv(ImportType::Readings, &outcome.rejected_rows, writer)?
        }
    };
    info!(path = %path.display(), rows = written, "拒绝行报告已写出");
    Ok(())
}
