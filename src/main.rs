use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use survey_explorer::dashboard::DashboardOptions;
use survey_explorer::data::export::export_file;
use survey_explorer::data::loader::LoaderOptions;
use survey_explorer::data::model::{
    AGE, DETAIL_FIELDS, Dataset, EDU_LEVEL, FAV_ANIMALS, FAV_PLACE, GENDER, INDUSTRY,
    SWEET_OR_SALTY, YEARS_OF_EXPERIENCE,
};
use survey_explorer::data::repository::DatasetRepository;
use survey_explorer::render::{render_report, render_rows};
use survey_explorer::state::ExplorerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Filter the welcome survey and print summary statistics.
///
/// Every filter accepts an exact value or `All` (no constraint).
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// `;`-separated survey file.
    file: PathBuf,

    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    edu_level: Option<String>,
    #[arg(long)]
    industry: Option<String>,
    /// `woman`, `man` or `All`.
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    fav_animals: Option<String>,
    #[arg(long)]
    fav_place: Option<String>,
    #[arg(long)]
    sweet_or_salty: Option<String>,
    #[arg(long)]
    years_of_experience: Option<String>,

    /// Field shown in the value-count table [default: age, when present].
    #[arg(long)]
    describe: Option<String>,

    /// Number of industries listed.
    #[arg(long, default_value_t = 10)]
    top: usize,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Columns of the detailed table and of the export, comma separated.
    /// Defaults to the main profile columns for the table and to every
    /// column for the export.
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Print this many filtered responses as a table.
    #[arg(long, default_value_t = 0)]
    rows: usize,

    /// Write the filtered responses to this file.
    #[arg(long)]
    export: Option<PathBuf>,
}

impl Cli {
    fn selections(&self) -> [(&'static str, Option<&str>); 8] {
        [
            (AGE, self.age.as_deref()),
            (EDU_LEVEL, self.edu_level.as_deref()),
            (INDUSTRY, self.industry.as_deref()),
            (GENDER, self.gender.as_deref()),
            (FAV_ANIMALS, self.fav_animals.as_deref()),
            (FAV_PLACE, self.fav_place.as_deref()),
            (SWEET_OR_SALTY, self.sweet_or_salty.as_deref()),
            (YEARS_OF_EXPERIENCE, self.years_of_experience.as_deref()),
        ]
    }

    /// The filtered responses limited to `--columns`, or to `fallback`
    /// when none were given.
    fn projection(&self, filtered: &Dataset, fallback: Option<&[&str]>) -> Result<Dataset> {
        if !self.columns.is_empty() {
            return filtered.project(&self.columns).context("invalid --columns");
        }
        match fallback {
            Some(fields) => {
                let present: Vec<&str> = fields
                    .iter()
                    .copied()
                    .filter(|f| filtered.schema().position(f).is_some())
                    .collect();
                Ok(filtered.project(&present)?)
            }
            None => Ok(filtered.clone()),
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let repo = DatasetRepository::load(&cli.file, LoaderOptions::default())?;
    let mut state = ExplorerState::new(repo.dataset());

    for (field, raw) in cli.selections() {
        if let Some(raw) = raw {
            state
                .set_filter(field, raw)
                .with_context(|| format!("invalid --{} filter", field.replace('_', "-")))?;
        }
    }

    let mut options = DashboardOptions {
        top_industries: cli.top,
        ..DashboardOptions::default()
    };
    if let Some(field) = &cli.describe {
        state
            .dataset()
            .schema()
            .require(field)
            .context("invalid --describe field")?;
        options.describe_field = Some(field.clone());
    }
    let report = state.report(&options)?;
    let filtered = state.filtered();

    match cli.format {
        Format::Text => {
            print!("{}", render_report(&report, state.criteria()));
            if cli.rows > 0 && !report.is_empty() {
                let detail = cli.projection(&filtered, Some(&DETAIL_FIELDS[..]))?;
                println!("\nDetailed responses\n------------------");
                print!("{}", render_rows(&detail, cli.rows));
            }
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(&report).context("serializing report")?;
            println!("{json}");
        }
    }

    if let Some(path) = &cli.export {
        export_file(&cli.projection(&filtered, None)?, path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
