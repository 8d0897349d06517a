//! Interactive papers view driven by terminal prompts.

use crate::papers::{Branch, ExamType, PaperRepository, UploadCandidate};
use crate::view::{render_results, Session, UploadOutcome, ViewState};
use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::path::PathBuf;
use tracing::debug;

const ACTIONS: [&str; 3] = ["Search papers", "Upload paper", "Quit"];

/// Open the view, load papers, then loop on the action menu until the user quits.
pub async fn run<R: PaperRepository>(session: &mut Session<R>) -> Result<()> {
    let theme = ColorfulTheme::default();

    println!("{}", style("Past Papers").bold().underlined());
    println!("Searching...");
    session.open().await;
    println!("{}\n", render_results(session.state()));

    loop {
        let action = Select::with_theme(&theme)
            .with_prompt("What next?")
            .items(&ACTIONS[..])
            .default(0)
            .interact()?;

        match action {
            0 => {
                edit_filters(&theme, session.state_mut())?;
                println!("Searching...");
                session.search().await;
                println!("{}\n", render_results(session.state()));
            }
            1 => {
                edit_upload_form(&theme, session.state_mut())?;
                pick_file(&theme, session.state_mut()).await?;
                print_status(session.state());
                if !session.state().can_upload() {
                    continue;
                }

                println!("Uploading...");
                let outcome = session.upload().await;
                debug!(?outcome, "upload settled");
                print_status(session.state());
                if outcome == UploadOutcome::Succeeded {
                    println!("{}\n", render_results(session.state()));
                }
            }
            _ => return Ok(()),
        }
    }
}

fn edit_filters(theme: &ColorfulTheme, state: &mut ViewState) -> Result<()> {
    let filters = &mut state.filters;
    filters.branch = choose(theme, "Branch", "Any branch", &Branch::NAMES, &filters.branch)?;
    filters.subject = text(theme, "Subject", &filters.subject)?;
    filters.year = text(theme, "Year", &filters.year)?;
    filters.semester = text(theme, "Semester", &filters.semester)?;
    filters.exam_type = choose(
        theme,
        "Exam type",
        "Any exam type",
        &ExamType::NAMES,
        &filters.exam_type,
    )?;
    Ok(())
}

fn edit_upload_form(theme: &ColorfulTheme, state: &mut ViewState) -> Result<()> {
    let form = &mut state.form;
    form.title = text(theme, "Title", &form.title)?;
    form.branch = choose(theme, "Branch", "(none)", &Branch::NAMES, &form.branch)?;
    form.subject = text(theme, "Subject", &form.subject)?;
    form.year = text(theme, "Year", &form.year)?;
    form.semester = text(theme, "Semester", &form.semester)?;
    form.exam_type = choose(theme, "Exam type", "(none)", &ExamType::NAMES, &form.exam_type)?;
    Ok(())
}

async fn pick_file(theme: &ColorfulTheme, state: &mut ViewState) -> Result<()> {
    let current = state
        .selected_file()
        .map(|f| f.file_name().to_string())
        .unwrap_or_default();
    let raw = text(theme, "PDF file", &current)?;
    let raw = raw.trim();

    if raw.is_empty() {
        state.select_file(None);
        return Ok(());
    }
    // Unchanged prompt keeps the earlier selection.
    if raw == current {
        return Ok(());
    }

    let path = PathBuf::from(shellexpand::tilde(raw).into_owned());
    match UploadCandidate::from_path(&path).await {
        Ok(file) => state.select_file(Some(file)),
        Err(e) => {
            println!("{}", style(format!("{e:#}")).red());
            state.select_file(None);
        }
    }
    Ok(())
}

fn print_status(state: &ViewState) {
    let message = state.message();
    if message.is_empty() {
        return;
    }
    if state.message_is_error() {
        println!("{}", style(message).red());
    } else {
        println!("{}", style(message).cyan());
    }
}

/// Pick one of `names`, or the leading `none_label` entry for an empty value.
fn choose(
    theme: &ColorfulTheme,
    prompt: &str,
    none_label: &str,
    names: &[&str],
    current: &str,
) -> Result<String> {
    let mut items = vec![none_label];
    items.extend_from_slice(names);
    let default = names
        .iter()
        .position(|n| *n == current)
        .map_or(0, |i| i + 1);

    let picked = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&items[..])
        .default(default)
        .interact()?;
    Ok(if picked == 0 {
        String::new()
    } else {
        names[picked - 1].to_string()
    })
}

fn text(theme: &ColorfulTheme, prompt: &str, current: &str) -> Result<String> {
    let value: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_string())
}
