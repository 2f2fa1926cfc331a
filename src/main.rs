use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Convert a ReqIF requirements export to PDF")]
struct Cli {
    /// Input .reqif file
    #[arg(value_name = "REQIF", default_value = "_SRS_Export_Sprint_16.0.reqif")]
    input: PathBuf,

    /// Output PDF file
    #[arg(value_name = "PDF", default_value = "SRS_Export_Sprint_16.0.pdf")]
    output: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match reqif_pdf::convert_reqif_to_pdf(&cli.input, &cli.output) {
        Ok(conversion) => {
            if !conversion.report.missing_assets.is_empty() {
                log::warn!(
                    "{} image(s) were missing and skipped",
                    conversion.report.missing_assets.len()
                );
            }
            println!(
                "PDF generated: {} ({} requirements, {} pages)",
                cli.output.display(),
                conversion.report.requirements,
                conversion.report.pages,
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
