use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use cardgen::{
    batch, cleanup, model::SchoolInfo, model::StudentRecord, CardService, EngineConfig,
    Orientation, Side,
};

type CliError = Box<dyn std::error::Error>;

#[derive(Parser)]
#[command(name = "cardgen-cli", about = "Generate student ID cards from the command line")]
struct Cli {
    /// Template directory; defaults to CARDGEN_TEMPLATE_DIR or assets/templates.
    #[arg(long)]
    template_dir: Option<PathBuf>,
    /// Output directory; defaults to CARDGEN_OUTPUT_DIR or generated.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Fonts directory; defaults to CARDGEN_FONTS_DIR or assets/fonts.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one side of one student's card into the output directory.
    Single {
        /// JSON file holding a StudentRecord.
        student: PathBuf,
        /// JSON file holding the SchoolInfo.
        school: PathBuf,
        #[arg(long, value_enum, default_value = "landscape")]
        orientation: OrientationArg,
        #[arg(long, value_enum, default_value = "front")]
        side: SideArg,
    },
    /// Render a roster of students into a ZIP archive.
    Batch {
        /// JSON file holding an array of StudentRecords.
        students: PathBuf,
        /// JSON file holding the SchoolInfo.
        school: PathBuf,
        /// Where to write the archive.
        out: PathBuf,
        #[arg(long, value_enum, default_value = "landscape")]
        orientation: OrientationArg,
        #[arg(long)]
        include_back: bool,
    },
    /// Delete generated files older than the given age.
    Cleanup {
        #[arg(long, default_value_t = 60)]
        max_age_minutes: i64,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OrientationArg {
    Landscape,
    Portrait,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum SideArg {
    Front,
    Back,
}

impl From<OrientationArg> for Orientation {
    fn from(value: OrientationArg) -> Self {
        match value {
            OrientationArg::Landscape => Orientation::Landscape,
            OrientationArg::Portrait => Orientation::Portrait,
        }
    }
}

impl From<SideArg> for Side {
    fn from(value: SideArg) -> Self {
        match value {
            SideArg::Front => Side::Front,
            SideArg::Back => Side::Back,
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&text)
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::from_env();
    if let Some(dir) = cli.template_dir {
        config.template_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(dir) = cli.fonts_dir {
        config.fonts_dir = dir;
    }
    let output_dir = config.output_dir.clone();

    match cli.command {
        Command::Single {
            student,
            school,
            orientation,
            side,
        } => {
            let service = CardService::new(config, reqwest::Client::new())?;
            let student: StudentRecord = read_json(&student)?;
            let school: SchoolInfo = read_json(&school)?;
            let path = service
                .generate_card_file(&student, &school, orientation.into(), side.into())
                .await?;
            info!(path = %path.display(), "card written");
            println!("{}", path.display());
        }
        Command::Batch {
            students,
            school,
            out,
            orientation,
            include_back,
        } => {
            let service = CardService::new(config, reqwest::Client::new())?;
            let students: Vec<StudentRecord> = read_json(&students)?;
            let school: SchoolInfo = read_json(&school)?;
            let archive = batch::generate_batch_archive(
                &service,
                &students,
                &school,
                orientation.into(),
                include_back,
            )
            .await?;
            std::fs::write(&out, &archive.zip)?;
            info!(
                path = %out.display(),
                students = students.len(),
                failures = archive.failures.len(),
                "archive written"
            );
            for failure in &archive.failures {
                eprintln!(
                    "failed: {} ({}): {}",
                    failure.student_name, failure.student_id, failure.error
                );
            }
        }
        Command::Cleanup { max_age_minutes } => {
            let report = cleanup::sweep(&output_dir, max_age_minutes);
            println!("deleted {} files, {} errors", report.deleted, report.errors);
        }
    }

    Ok(())
}
