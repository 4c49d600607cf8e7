//! The interactive interview flow.
//!
//! Walks the respondent through identity, variable entry, and the yes/no
//! pair loop, driving an [`InterviewController`] against the server. Every
//! surfaced error requires explicit dismissal before the same question is
//! retried; nothing aborts the session automatically.

use crate::error::{CliError, Result};
use colored::Colorize;
use depmap_domain::Respondent;
use depmap_sdk::{ElicitationApi, HttpApi, InterviewController, SdkError};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Run one complete interview against the server.
pub async fn run_interview(api: HttpApi) -> Result<()> {
    let mut editor = DefaultEditor::new().map_err(CliError::Readline)?;

    println!("{}", "Depmap dependency interview".bold());
    println!("Answer a few questions to map how your variables influence each other.");
    println!();

    // Identity: re-prompt until the server accepts
    let session = loop {
        let respondent = prompt_identity(&mut editor)?;
        match api.submit_identity(&respondent).await {
            Ok(id) => break id,
            Err(SdkError::Validation(msg)) => {
                eprintln!("{}", msg.red());
                dismiss(&mut editor)?;
            }
            Err(e) => return Err(e.into()),
        }
    };

    // Variables: re-prompt until the server accepts
    loop {
        let variables = prompt_variables(&mut editor)?;
        match api.submit_variables(session, &variables).await {
            Ok(pair_count) => {
                println!();
                println!(
                    "{} variables accepted, {} pairs to review.",
                    variables.len(),
                    pair_count
                );
                println!();
                break;
            }
            Err(SdkError::Validation(msg)) => {
                eprintln!("{}", msg.red());
                dismiss(&mut editor)?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let mut controller = InterviewController::new(api, session);
    controller.start().await?;

    // The pair loop: one question at a time, same pair re-presented on error
    while let Some(pair) = controller.current_question().cloned() {
        let (answered, total) = controller.progress();
        let question = format!(
            "[{}/{}] Does {} directly influence {}?",
            answered + 1,
            total,
            pair.source.bold(),
            pair.target.bold()
        );

        let confirmed = prompt_yes_no(&mut editor, &question)?;
        match controller.answer(confirmed).await {
            Ok(outcome) => {
                if outcome.newly_added {
                    println!("{}", format!("  recorded: {}", pair).green());
                }
                if let Some(render_error) = outcome.render_error {
                    // The answer is committed; only the picture is missing
                    eprintln!("{}", format!("  graph render unavailable: {}", render_error).yellow());
                }
            }
            Err(SdkError::PairMismatch(msg)) => {
                eprintln!("{}", msg.red());
                eprintln!("Re-fetching interview state from the server.");
                dismiss(&mut editor)?;
                controller.resume().await?;
            }
            Err(SdkError::UnknownSession) => return Err(SdkError::UnknownSession.into()),
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                dismiss(&mut editor)?;
            }
        }
    }

    println!();
    println!("{}", "All pairs reviewed - interview complete.".bold().green());

    let response = controller.finish().await?;
    let record = response.record;
    println!();
    println!("Confirmed dependencies ({}):", record.dependencies.len());
    for pair in &record.dependencies {
        println!("  {}", pair);
    }
    println!();
    println!("Results committed for session {}.", record.session_id);

    Ok(())
}

fn prompt_identity(editor: &mut DefaultEditor) -> Result<Respondent> {
    println!("{}", "About you".bold());
    let name = prompt_nonempty(editor, "Name: ")?;
    let position = prompt_nonempty(editor, "Position: ")?;
    let email = prompt_nonempty(editor, "Email: ")?;
    Ok(Respondent {
        name,
        position,
        email,
    })
}

fn prompt_variables(editor: &mut DefaultEditor) -> Result<Vec<String>> {
    println!();
    println!("{}", "Your variables".bold());
    println!("Enter at least two variable names, one per line. Blank line to finish.");

    let mut variables = Vec::new();
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    return Ok(variables);
                }
                editor.add_history_entry(line).ok();
                variables.push(line.to_string());
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                return Err(CliError::Aborted)
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn prompt_nonempty(editor: &mut DefaultEditor, prompt: &str) -> Result<String> {
    loop {
        match editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if !line.is_empty() {
                    return Ok(line.to_string());
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                return Err(CliError::Aborted)
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn prompt_yes_no(editor: &mut DefaultEditor, question: &str) -> Result<bool> {
    println!("{}", question);
    loop {
        match editor.readline("[y/n] ") {
            Ok(line) => match parse_answer(&line) {
                Some(answer) => return Ok(answer),
                None => println!("Please answer 'y' or 'n'."),
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                return Err(CliError::Aborted)
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Wait for explicit dismissal before retrying.
fn dismiss(editor: &mut DefaultEditor) -> Result<()> {
    match editor.readline("Press Enter to continue... ") {
        Ok(_) => Ok(()),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Err(CliError::Aborted),
        Err(e) => Err(e.into()),
    }
}

fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
