use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use salesperf::{
    DataDirectory, OutputFormat, SubjectFilter, init_logging, load_report_input, render,
};
use salesperf_core::{AnalyticsPolicy, analyze_report};

#[derive(Parser, Debug)]
#[command(name = "salesperf")]
#[command(about = "Sales performance analytics for product groups and customers")]
struct Args {
    /// Path to the data directory (default: ~/.salesperf/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a report input file
    Analyze {
        /// Report input (YAML, or JSON with a .json extension)
        input: PathBuf,

        /// Policy file (default: {data_dir}/policy.yaml, else built-in defaults)
        #[arg(short, long)]
        policy: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,

        /// Subjects to include
        #[arg(short, long, value_enum, default_value_t = SubjectFilter::Both)]
        subject: SubjectFilter,

        /// Write to this file instead of stdout
        #[arg(short, long, conflicts_with = "save")]
        output: Option<PathBuf>,

        /// Save under {data_dir}/reports/ using the input file's name
        #[arg(long)]
        save: bool,
    },
    /// Print the effective analytics policy
    Policy {
        /// Policy file to validate instead of the data-directory one
        #[arg(short, long)]
        policy: Option<PathBuf>,

        /// Write the built-in defaults to {data_dir}/policy.yaml
        #[arg(long)]
        init: bool,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = DataDirectory::new(args.data_dir.unwrap_or_else(DataDirectory::default_path));

    init_logging(data_dir.root(), &args.log_level)?;

    match args.command {
        Command::Analyze {
            input,
            policy,
            format,
            subject,
            output,
            save,
        } => {
            let policy = data_dir
                .load_policy(policy.as_deref())
                .wrap_err("Failed to load analytics policy")?;
            let report_input = load_report_input(&input)
                .wrap_err_with(|| format!("Failed to load {}", input.display()))?;

            tracing::info!(input = %input.display(), "analyzing report");
            let report = analyze_report(&report_input, &policy)
                .wrap_err_with(|| format!("Failed to analyze {}", input.display()))?;

            let rendered = render(&report, format, subject, jiff::Timestamp::now())?;

            if let Some(path) = output {
                salesperf::util::io::atomic_write(&path, &rendered)
                    .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
                tracing::info!(path = %path.display(), "report written");
            } else if save {
                let stem = input
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("report");
                let name = format!("{stem}.{}", format.extension());
                let path = data_dir.save_report(&name, &rendered)?;
                tracing::info!(path = %path.display(), "report saved");
                println!("{}", path.display());
            } else {
                print!("{rendered}");
            }
        }
        Command::Policy { policy, init } => {
            if init {
                let path = data_dir.save_policy(&AnalyticsPolicy::default())?;
                tracing::info!(path = %path.display(), "default policy written");
                println!("{}", path.display());
            } else {
                let policy = data_dir
                    .load_policy(policy.as_deref())
                    .wrap_err("Failed to load analytics policy")?;
                print!("{}", serde_saphyr::to_string(&policy)?);
            }
        }
    }

    tracing::info!("salesperf finished");
    Ok(())
}
