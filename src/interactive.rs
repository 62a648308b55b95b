use crate::bank::{Question, QuestionBank};
use crate::config::Config;
use crate::language::{is_source_language, PRACTICE_LANGUAGES};
use crate::progress::ProgressStore;
use crate::quiz::{correct_option, displayed, PracticeSession};
use crate::translate::{TranslationRequest, TranslationResolver, TranslationResult};
use crate::tutor::{Tutor, EXPLANATION_UNAVAILABLE};
use console::style;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::warn;

const CHANGE_LANGUAGE: &str = "Change language...";

/// Remote services available to a practice session. Either may be absent
/// when no API key is configured.
pub struct Services<'a> {
    pub resolver: Option<&'a TranslationResolver>,
    pub tutor: Option<&'a dyn Tutor>,
}

pub fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║          prepace - Past Question Practice         ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

/// Offer to enter (and save) a Gemini API key when none is configured.
/// Practice still works without one, minus translation and explanations.
pub fn setup_api_key(config: &mut Config) -> anyhow::Result<()> {
    if config.gemini_api_key.is_some() {
        println!("{} API key configured", style("✓").green());
        return Ok(());
    }

    println!("{} Gemini API key not found", style("!").yellow());
    println!("  Get one at: https://aistudio.google.com/apikey\n");

    if !Confirm::new()
        .with_prompt("Enter an API key now? (needed for translation and explanations)")
        .default(true)
        .interact()?
    {
        return Ok(());
    }

    let api_key: String = Input::new()
        .with_prompt("Enter your Gemini API key")
        .allow_empty(true)
        .interact_text()?;

    if api_key.trim().is_empty() {
        return Ok(());
    }

    config.gemini_api_key = Some(api_key.trim().to_string());

    if Confirm::new()
        .with_prompt("Save API key to config file?")
        .default(true)
        .interact()?
    {
        let path = config.save()?;
        println!(
            "{} API key saved to {}\n",
            style("✓").green(),
            path.display()
        );
    }

    Ok(())
}

pub fn select_subject(bank: &QuestionBank, progress: &ProgressStore) -> anyhow::Result<String> {
    let subjects = bank.subjects();
    if subjects.is_empty() {
        anyhow::bail!("The question bank is empty");
    }

    let items: Vec<String> = subjects
        .iter()
        .map(|s| {
            format!(
                "{} ({}/{} completed)",
                s,
                progress.subject_progress(bank, s),
                bank.total_questions(s)
            )
        })
        .collect();

    let selection = Select::new()
        .with_prompt("Choose a subject")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(subjects[selection].to_string())
}

pub fn select_year(bank: &QuestionBank, subject: &str) -> anyhow::Result<String> {
    let years = bank.years(subject);
    if years.is_empty() {
        anyhow::bail!("No years available for {}", subject);
    }

    let selection = Select::new()
        .with_prompt(format!("Choose a {} paper", subject))
        .items(&years)
        .default(0)
        .interact()?;

    Ok(years[selection].to_string())
}

fn select_language(current: &str) -> anyhow::Result<String> {
    let default = PRACTICE_LANGUAGES
        .iter()
        .position(|l| l.eq_ignore_ascii_case(current))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Select language")
        .items(PRACTICE_LANGUAGES)
        .default(default)
        .interact()?;

    Ok(PRACTICE_LANGUAGES[selection].to_string())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn progress_line(session: &PracticeSession<'_>) -> String {
    const WIDTH: usize = 30;
    let filled = (session.progress_percent() / 100.0 * WIDTH as f64).round() as usize;
    format!(
        "[{}{}] Question {} of {}",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled.min(WIDTH)),
        session.position() + 1,
        session.len()
    )
}

async fn translate_question(
    services: &Services<'_>,
    question: &Question,
    language: &str,
) -> Option<TranslationResult> {
    if is_source_language(language) {
        return None;
    }

    let Some(resolver) = services.resolver else {
        println!(
            "{} Translation needs an API key; showing English",
            style("!").yellow()
        );
        return None;
    };

    let pb = spinner(&format!("Translating to {}...", language));
    let result = resolver
        .resolve(&TranslationRequest::for_question(question, language))
        .await;
    pb.finish_and_clear();

    if let Some(ref error) = result.error {
        println!("{} {}", style("!").yellow(), error);
    }
    Some(result)
}

async fn show_explanation(services: &Services<'_>, question: &Question, answer: &str, correct: bool) {
    let Some(tutor) = services.tutor else {
        return;
    };

    let pb = spinner("Fetching explanation...");
    let explanation = match tutor.explain(&question.question, answer, correct).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Error fetching explanation: {}", e);
            EXPLANATION_UNAVAILABLE.to_string()
        }
    };
    pb.finish_and_clear();

    println!("\n{} {}\n", style("AI Explanation:").bold(), explanation);
}

async fn ask_follow_up(services: &Services<'_>, subject: &str) -> anyhow::Result<()> {
    let Some(tutor) = services.tutor else {
        return Ok(());
    };

    while Confirm::new()
        .with_prompt("Ask the AI tutor a follow-up question?")
        .default(false)
        .interact()?
    {
        let question: String = Input::new()
            .with_prompt("Your question")
            .interact_text()?;
        if question.trim().is_empty() {
            continue;
        }

        let pb = spinner("Thinking...");
        let reply = tutor.answer_follow_up(subject, question.trim()).await;
        pb.finish_and_clear();

        match reply {
            Ok(answer) => println!("\n{}\n", answer),
            Err(e) => {
                warn!("Error answering follow-up: {}", e);
                println!(
                    "{} Sorry, I couldn't answer that right now.\n",
                    style("!").yellow()
                );
            }
        }
    }

    Ok(())
}

/// Run a practice session over every question of `subject`/`year`.
pub async fn run_practice(
    bank: &QuestionBank,
    progress: &mut ProgressStore,
    services: &Services<'_>,
    subject: &str,
    year: &str,
    language: &str,
) -> anyhow::Result<()> {
    let questions = bank.require(subject, year)?;
    let mut session = PracticeSession::new(subject, year, questions);
    let mut language = language.to_string();

    println!(
        "{} {} {}\n",
        style("Practising").bold(),
        style(subject).cyan(),
        style(year).cyan()
    );

    while let Some(question) = session.current() {
        println!("{}", style(progress_line(&session)).dim());
        let mut translation = translate_question(services, question, &language).await;

        let selected_index = loop {
            let (text, options) = displayed(question, translation.as_ref());
            println!("\n{}\n", style(text).bold());

            let mut items: Vec<String> = options
                .iter()
                .enumerate()
                .map(|(i, o)| format!("{}  {}", Question::option_label(i), o))
                .collect();
            items.push(CHANGE_LANGUAGE.to_string());

            let choice = Select::new()
                .with_prompt("Your answer")
                .items(&items)
                .default(0)
                .interact()?;

            if choice < options.len() {
                break choice;
            }

            language = select_language(&language)?;
            translation = translate_question(services, question, &language).await;
        };

        let (_, options) = displayed(question, translation.as_ref());
        let correct = session
            .answer(selected_index)
            .map(|a| a.correct)
            .unwrap_or(false);

        if !progress.is_completed(subject, year, question.id) {
            progress.mark_completed(subject, year, question.id);
        }

        if correct {
            println!("{} Correct!", style("✓").green());
        } else {
            println!(
                "{} Incorrect. The correct answer is {}",
                style("✗").red(),
                style(correct_option(question, options)).green()
            );
        }

        // The tutor always sees the original-language text of the chosen option
        let original_answer = question
            .options
            .get(selected_index)
            .map(String::as_str)
            .unwrap_or(question.answer.as_str());
        show_explanation(services, question, original_answer, correct).await;
        ask_follow_up(services, subject).await?;

        session.next();
        if !session.is_complete()
            && !Confirm::new()
                .with_prompt("Next question?")
                .default(true)
                .interact()?
        {
            break;
        }
    }

    println!("\n{}", style("═══ Session Complete! ═══").bold());
    println!(
        "  You answered {} of {} correctly for {} {}.",
        style(session.score()).green(),
        session.answers().len(),
        subject,
        year
    );
    println!();

    Ok(())
}
