//! CLI front-end — a stdin/stdout stand-in for the chat view layer.
//!
//! Renders the transcript, shows the current step's input widget as a text
//! hint, and forwards user actions to the orchestrator. It only reads the
//! session and never mutates it directly.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::wizard::draft::{HoursForm, LocationForm, StoreType, Weekday};
use crate::wizard::step::{FormKind, InputModality, SelectorKind, StepEvent};
use crate::wizard::transcript::Speaker;
use crate::wizard::WizardOrchestrator;

/// Run the wizard as a terminal conversation until completion or EOF.
pub async fn run(orch: &WizardOrchestrator) -> anyhow::Result<()> {
    let session = orch.session();
    let mut rendered = 0usize;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        // Print any turns appended since the last render. A shrunken
        // transcript means a restart cleared it; render from the top.
        {
            let s = session.read().await;
            if s.transcript.len() < rendered {
                rendered = 0;
            }
            for message in &s.transcript.messages()[rendered..] {
                match message.speaker {
                    Speaker::Bot => println!("🤖 {}", message.text),
                    Speaker::User => println!("   you: {}", message.text),
                }
            }
            rendered = s.transcript.len();
        }

        let (modality, terminal, redirect) = {
            let s = session.read().await;
            (s.modality, s.step.is_terminal(), s.redirect_to.clone())
        };

        if let Some(path) = redirect {
            println!("→ redirecting to {path}");
            return Ok(());
        }
        if terminal {
            // Creation succeeded; wait for the scheduled redirect.
            tokio::time::sleep(Duration::from_millis(100)).await;
            continue;
        }

        print_hint(&modality, orch).await;
        eprint!("> ");

        let Some(line) = lines.next_line().await? else {
            return Ok(()); // EOF
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        match line.as_str() {
            "/quit" | "/exit" => return Ok(()),
            "/restart" => {
                orch.handle_restart().await;
                rendered = 0;
                continue;
            }
            _ => {}
        }

        if let Err(message) = dispatch(orch, &modality, &line, &mut lines).await {
            eprintln!("⚠️  {message}");
        }
    }
}

/// Translate one input line into an orchestrator call.
async fn dispatch(
    orch: &WizardOrchestrator,
    modality: &InputModality,
    line: &str,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<(), String> {
    let event = match modality {
        InputModality::FreeText(_) => StepEvent::Text(line.to_string()),

        InputModality::Selector(SelectorKind::StoreType) => match line.to_lowercase().as_str() {
            "1" | "internal" => StepEvent::TypePicked(StoreType::Internal),
            "2" | "external" => StepEvent::TypePicked(StoreType::External),
            _ => return Err("Pick 1 (internal) or 2 (external)".to_string()),
        },

        InputModality::Selector(SelectorKind::TypeConfirm) => match line.to_lowercase().as_str() {
            "1" | "keep" => StepEvent::KeepType,
            "2" | "change" => StepEvent::ChangeType,
            _ => return Err("Type 'keep' or 'change'".to_string()),
        },

        InputModality::Selector(SelectorKind::Category) => {
            let s = orch.session();
            let s = s.read().await;
            let category = parse_choice(line, s.categories.len())
                .map(|i| s.categories[i].clone())
                .ok_or("Pick a category by number")?;
            StepEvent::CategoryPicked {
                id: category.id,
                name: category.name,
            }
        }

        InputModality::Selector(SelectorKind::SubdomainConfirm) => {
            match line.to_lowercase().as_str() {
                "1" | "keep" => StepEvent::KeepSubdomain,
                "2" | "edit" => StepEvent::EditSubdomain,
                _ => return Err("Type 'keep' or 'edit'".to_string()),
            }
        }

        InputModality::Selector(SelectorKind::Theme) => {
            let s = orch.session();
            let s = s.read().await;
            let theme = parse_choice(line, s.themes.len())
                .map(|i| s.themes[i].clone())
                .ok_or("Pick a theme by number")?;
            StepEvent::ThemePicked {
                id: theme.id,
                name: theme.name,
            }
        }

        InputModality::Selector(SelectorKind::ReviewActions) => {
            match line.to_lowercase().as_str() {
                "1" | "create" => StepEvent::Submit,
                "2" | "restart" => {
                    orch.handle_restart().await;
                    return Ok(());
                }
                _ => return Err("Type 'create' or 'restart'".to_string()),
            }
        }

        InputModality::Form(FormKind::ImageUpload(_)) => {
            if line.eq_ignore_ascii_case("skip") {
                return orch.skip_image().await.map_err(|e| e.to_string());
            }
            let path = line
                .strip_prefix("upload ")
                .ok_or("Type 'upload <path>' or 'skip'")?
                .trim();
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| format!("Could not read {path}: {e}"))?;
            let filename = std::path::Path::new(path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("image")
                .to_string();
            return orch
                .upload_image(bytes, &filename)
                .await
                .map_err(|e| e.to_string());
        }

        InputModality::Form(FormKind::Location) => {
            let address = line.to_string();
            let state = prompt_line(lines, "state").await?;
            let city = prompt_line(lines, "city").await?;
            StepEvent::LocationSubmitted(LocationForm {
                address,
                state,
                city,
            })
        }

        InputModality::Form(FormKind::Hours) => {
            let week_open =
                Weekday::parse(line).ok_or("First day must be a weekday name, e.g. Monday")?;
            let close_raw = prompt_line(lines, "last open day").await?;
            let week_close = Weekday::parse(&close_raw)
                .ok_or("Last day must be a weekday name, e.g. Saturday")?;
            let time_open = prompt_line(lines, "opening time (HH:MM)").await?;
            let time_close = prompt_line(lines, "closing time (HH:MM)").await?;
            StepEvent::HoursSubmitted(HoursForm {
                week_open,
                week_close,
                time_open,
                time_close,
            })
        }

        InputModality::None => return Ok(()),
    };

    orch.submit(event).await.map_err(|e| e.to_string())
}

/// Show what the current widget accepts.
async fn print_hint(modality: &InputModality, orch: &WizardOrchestrator) {
    match modality {
        InputModality::FreeText(_) => {}
        InputModality::Selector(SelectorKind::StoreType) => {
            eprintln!("   [1] internal  [2] external");
        }
        InputModality::Selector(SelectorKind::TypeConfirm) => {
            eprintln!("   [keep] [change]");
        }
        InputModality::Selector(SelectorKind::Category) => {
            let s = orch.session();
            let s = s.read().await;
            for (i, c) in s.categories.iter().enumerate() {
                eprintln!("   [{}] {}", i + 1, c.name);
            }
        }
        InputModality::Selector(SelectorKind::SubdomainConfirm) => {
            eprintln!("   [keep] [edit]");
        }
        InputModality::Selector(SelectorKind::Theme) => {
            let s = orch.session();
            let s = s.read().await;
            for (i, t) in s.themes.iter().enumerate() {
                let tag = if t.premium { " (premium)" } else { "" };
                eprintln!("   [{}] {}{}", i + 1, t.name, tag);
            }
        }
        InputModality::Selector(SelectorKind::ReviewActions) => {
            eprintln!("   [create] [restart]");
        }
        InputModality::Form(FormKind::ImageUpload(field)) => {
            eprintln!("   upload <path> to attach a {field}, or 'skip'");
        }
        InputModality::Form(FormKind::Location) => {
            eprintln!("   street address first, then state and city when prompted");
        }
        InputModality::Form(FormKind::Hours) => {
            eprintln!("   first open day (e.g. Monday), then last day and times when prompted");
        }
        InputModality::None => {}
    }
}

async fn prompt_line(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<String, String> {
    eprint!("{label}> ");
    match lines.next_line().await {
        Ok(Some(line)) => Ok(line.trim().to_string()),
        Ok(None) => Err("Unexpected end of input".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_choice(line: &str, len: usize) -> Option<usize> {
    let n: usize = line.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}
