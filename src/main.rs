//! `pyq`: browse and contribute past exam papers.

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use pyq::config::Config;
use pyq::papers::{Branch, ExamType, FilterCriteria, HttpPaperClient, MetadataForm, UploadCandidate};
use pyq::view::{render_results, Session, UploadOutcome};

/// Past exam papers from the terminal.
#[derive(Parser)]
#[command(name = "pyq", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository base URL (overrides config file and PYQ_BACKEND_URL)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search papers by filter
    Search {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Upload a paper PDF (max 5 MB)
    Upload {
        /// PDF file to upload
        file: PathBuf,

        #[arg(long)]
        title: String,

        #[arg(long)]
        branch: String,

        #[arg(long)]
        subject: String,

        #[arg(long)]
        year: String,

        #[arg(long)]
        semester: String,

        /// MIDSEM or ENDSEM
        #[arg(long, default_value = "")]
        exam_type: String,
    },
    /// Interactive search and upload
    Browse,
    /// Show the effective configuration
    Config,
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long, value_parser = PossibleValuesParser::new(Branch::NAMES))]
    branch: Option<String>,

    #[arg(long)]
    subject: Option<String>,

    #[arg(long)]
    year: Option<String>,

    #[arg(long)]
    semester: Option<String>,

    #[arg(long, value_parser = PossibleValuesParser::new(ExamType::NAMES))]
    exam_type: Option<String>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        Self {
            branch: args.branch.unwrap_or_default(),
            subject: args.subject.unwrap_or_default(),
            year: args.year.unwrap_or_default(),
            semester: args.semester.unwrap_or_default(),
            exam_type: args.exam_type.unwrap_or_default(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let directive = if verbose { "pyq=debug" } else { "pyq=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().expect("static directive")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&str>, backend_url: Option<String>) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, used) = Config::load(path).context("Failed to load configuration")?;
    if let Some(url) = backend_url {
        config = config.with_backend_url(url);
    }
    Ok((config, used))
}

fn connect(config: &Config) -> Session<HttpPaperClient> {
    Session::new(HttpPaperClient::from_config(config))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config_arg = cli.config.as_deref();

    match cli.command {
        Commands::Search { filters, json } => {
            let (config, _) = load_config(config_arg, cli.backend_url)?;
            let mut session = connect(&config);
            session.state_mut().filters = filters.into();
            session.search().await;
            if json {
                println!("{}", serde_json::to_string_pretty(session.state().papers())?);
            } else {
                println!("{}", render_results(session.state()));
            }
        }
        Commands::Upload {
            file,
            title,
            branch,
            subject,
            year,
            semester,
            exam_type,
        } => {
            let (config, _) = load_config(config_arg, cli.backend_url)?;
            let mut session = connect(&config);
            let candidate = UploadCandidate::from_path(&file).await?;

            let state = session.state_mut();
            state.form = MetadataForm {
                title,
                branch,
                subject,
                year,
                semester,
                exam_type,
            };
            state.select_file(Some(candidate));
            eprintln!("{}", state.message());
            if !state.can_upload() {
                anyhow::bail!("File exceeds 5 MB limit");
            }

            if session.upload().await != UploadOutcome::Succeeded {
                anyhow::bail!("{}", session.state().message());
            }
            println!("{}", session.state().message());
            println!("{}", render_results(session.state()));
        }
        Commands::Browse => {
            let (config, _) = load_config(config_arg, cli.backend_url)?;
            let mut session = connect(&config);
            pyq::browse::run(&mut session).await?;
        }
        Commands::Config => {
            let (config, used) = load_config(config_arg, cli.backend_url)?;
            match used {
                Some(p) => println!("# {}", p.display()),
                None => println!("# (no config directory)"),
            }
            print!("{}", config.to_toml()?);
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pyq", &mut std::io::stdout());
        }
    }

    Ok(())
}
