use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use prepace::gemini::GeminiClient;
use prepace::interactive::{self, Services};
use prepace::tutor::{GeminiTutor, Tutor, EXPLANATION_UNAVAILABLE};
use prepace::{
    Config, NewQuestion, ProgressStore, QuestionBank, TranslationRequest, TranslationResolver,
};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "prepace")]
#[command(version, about = "Past-question exam practice with an AI tutor")]
#[command(
    long_about = "Practise multiple-choice past questions by subject and year, get AI explanations, and read questions in French, Yoruba, Hausa or Igbo."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List subjects and how many questions each has
    Subjects,

    /// List the years available for a subject, newest first
    Years { subject: String },

    /// Practise questions interactively
    Practice {
        subject: Option<String>,
        year: Option<String>,

        /// Display language (English, French, Yoruba, Hausa, Igbo)
        #[arg(short, long, default_value = "English")]
        language: String,
    },

    /// Translate one question and print the result as JSON
    Translate {
        subject: String,
        year: String,
        id: u32,

        /// Target language name, e.g. French
        #[arg(short, long)]
        language: String,
    },

    /// Grade an answer and ask the AI tutor to explain it
    Explain {
        subject: String,
        year: String,
        id: u32,

        /// The chosen option text
        #[arg(short, long)]
        answer: String,
    },

    /// Ask the AI tutor a question about a subject
    Ask { subject: String, question: String },

    /// Show completed questions per subject
    Progress,

    /// Show question bank totals and completion per subject
    Stats,

    /// Add a question to the local question bank
    Add {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        year: String,
        #[arg(long)]
        question: String,
        /// Answer option; repeat 2 to 4 times
        #[arg(long = "option", required = true)]
        options: Vec<String>,
        #[arg(long)]
        answer: String,
    },

    /// Check configuration without revealing API keys
    Doctor,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn bank_file(config: &Config) -> std::path::PathBuf {
    config.bank_file.clone().unwrap_or_else(|| {
        config
            .progress_path()
            .with_file_name("questions.json")
    })
}

fn build_tutor(config: &Config) -> Result<GeminiTutor> {
    config.validate().context("Configuration validation failed")?;
    Ok(GeminiTutor::new(GeminiClient::from_config(config)?))
}

fn build_resolver(config: &Config) -> Result<TranslationResolver> {
    config.validate().context("Configuration validation failed")?;
    Ok(TranslationResolver::from_config(config)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = Config::load().context("Failed to load configuration")?;
    let bank_path = bank_file(&config);
    let mut bank = QuestionBank::load(Some(bank_path.as_path()))
        .context("Failed to load question bank")?;

    match cli.command {
        Command::Subjects => {
            for subject in bank.subjects() {
                println!("{:<14} {} questions", subject, bank.total_questions(subject));
            }
        }

        Command::Years { subject } => {
            let years = bank.years(&subject);
            if years.is_empty() {
                anyhow::bail!("Unknown subject: {}", subject);
            }
            for year in years {
                println!("{}", year);
            }
        }

        Command::Practice {
            subject,
            year,
            language,
        } => {
            interactive::print_header();
            interactive::setup_api_key(&mut config)?;

            let mut progress = ProgressStore::open(config.progress_path());
            let resolver = build_resolver(&config)
                .map_err(|e| warn!("Translation disabled: {:#}", e))
                .ok();
            let tutor = build_tutor(&config)
                .map_err(|e| warn!("AI tutor disabled: {:#}", e))
                .ok();
            let services = Services {
                resolver: resolver.as_ref(),
                tutor: tutor.as_ref().map(|t| t as &dyn Tutor),
            };

            let subject = match subject {
                Some(s) => s,
                None => interactive::select_subject(&bank, &progress)?,
            };
            let year = match year {
                Some(y) => y,
                None => interactive::select_year(&bank, &subject)?,
            };

            interactive::run_practice(&bank, &mut progress, &services, &subject, &year, &language)
                .await?;
        }

        Command::Translate {
            subject,
            year,
            id,
            language,
        } => {
            let question = bank
                .find(&subject, &year, id)
                .with_context(|| format!("No question {} in {} {}", id, subject, year))?;
            let resolver = build_resolver(&config)?;

            let outcome = resolver
                .resolve_outcome(&TranslationRequest::for_question(question, language))
                .await;
            info!("Resolved via {} tier", outcome.tier());

            println!("{}", serde_json::to_string_pretty(outcome.result())?);
        }

        Command::Explain {
            subject,
            year,
            id,
            answer,
        } => {
            let question = bank
                .find(&subject, &year, id)
                .with_context(|| format!("No question {} in {} {}", id, subject, year))?;
            let correct = question
                .options
                .iter()
                .position(|o| *o == answer)
                .is_some_and(|i| prepace::quiz::grade(question, i));
            let tutor = build_tutor(&config)?;

            if correct {
                println!("{} Correct!", style("✓").green());
            } else {
                println!(
                    "{} Incorrect. The correct answer is {}",
                    style("✗").red(),
                    style(&question.answer).green()
                );
            }

            let explanation = match tutor.explain(&question.question, &answer, correct).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Error fetching explanation: {}", e);
                    EXPLANATION_UNAVAILABLE.to_string()
                }
            };
            println!("\n{}", explanation);
        }

        Command::Ask { subject, question } => {
            let tutor = build_tutor(&config)?;
            let answer = tutor
                .answer_follow_up(&subject, &question)
                .await
                .context("The AI tutor could not answer")?;
            println!("{}", answer);
        }

        Command::Progress => {
            let progress = ProgressStore::open(config.progress_path());
            for entry in progress.summary(&bank) {
                println!(
                    "{:<14} {}/{} completed",
                    entry.subject, entry.completed, entry.total
                );
            }
        }

        Command::Stats => {
            let progress = ProgressStore::open(config.progress_path());
            let summary = progress.summary(&bank);

            println!("\n{}", style("═══ Dashboard ═══").bold());
            println!("  Subjects:  {}", bank.subjects().len());
            println!("  Questions: {}", bank.total());
            println!();
            for entry in summary {
                println!(
                    "  {:<14} {:>5.1}%  ({}/{})",
                    entry.subject,
                    entry.percent(),
                    entry.completed,
                    entry.total
                );
            }
            println!();
        }

        Command::Add {
            subject,
            year,
            question,
            options,
            answer,
        } => {
            let added = bank.add_question(NewQuestion {
                subject: subject.clone(),
                year: year.clone(),
                question,
                options,
                answer,
            })?;
            let id = added.id;
            bank.save().context("Failed to save question bank")?;
            println!(
                "{} Added {} {} question {}",
                style("✓").green(),
                subject,
                year,
                id
            );
        }

        Command::Doctor => {
            let status = config.status();
            let mark = |set: bool| {
                if set {
                    style("✓ Set").green()
                } else {
                    style("✗ Missing").red()
                }
            };

            println!("  Gemini API key:      {}", mark(status.gemini_api_key));
            println!("  Translation API key: {}", mark(status.translate_api_key));
            println!("  Model:               {}", config.model);
            println!("  Translation URL:     {}", config.translate_url);
            match status.config_file {
                Some(path) => println!("  Config file:         {}", path.display()),
                None => println!("  Config file:         (none)"),
            }
            println!("  Progress file:       {}", status.progress_file.display());

            if !status.gemini_api_key {
                println!(
                    "\n{} GEMINI_API_KEY is not set. Some features may not work.",
                    style("!").yellow()
                );
            }
        }
    }

    Ok(())
}
