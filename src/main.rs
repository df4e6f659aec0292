use anyhow::Context;
use clap::Parser;
use excel_csv::{ExcelCsvInput, process_csv};

pub fn main() -> anyhow::Result<()> {
    env_logger::init();
    let input = ExcelCsvInput::parse();
    process_csv(&input)
        .with_context(|| format!("failed to convert {}", input.file.display()))?;

    Ok(())
}
