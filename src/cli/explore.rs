//! Line-oriented interactive session over the loaded catalog.
//!
//! Each input line is one UI event; the view is re-derived and printed after
//! every event that changes state.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::Settings;
use crate::entities::paper::Catalog;
use crate::error::PaperShelfError;
use crate::view::ViewState;

const HELP: &str = "\
Commands:
  year <YYYY>      expand a year, or collapse it if already expanded
  search <text>    search titles and authors
  clear            clear the search
  show             print the current view
  help             show this help
  quit | exit      leave the session
";

const PROMPT: &str = "> ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    ToggleYear(i32),
    Search(String),
    Clear,
    Show,
    Help,
    Quit,
}

fn parse_event(line: &str) -> Result<Option<Event>, String> {
    // Search text is free-form (apostrophes in names), so it bypasses shell-style splitting.
    let trimmed = line.trim_start();
    let (head, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));
    if matches!(head.to_ascii_lowercase().as_str(), "search" | "s" | "/") {
        return Ok(Some(Event::Search(unquote(rest.trim()).to_string())));
    }

    let Some(words) = shlex::split(line) else {
        return Err("Unbalanced quotes in input".to_string());
    };
    let Some((command, args)) = words.split_first() else {
        return Ok(None);
    };
    let event = match command.to_ascii_lowercase().as_str() {
        "year" | "y" => {
            let [year] = args else {
                return Err("Usage: year <YYYY>".to_string());
            };
            let year = year
                .parse::<i32>()
                .map_err(|_| format!("Not a year: {year}"))?;
            Event::ToggleYear(year)
        }
        "clear" => Event::Clear,
        "show" => Event::Show,
        "help" | "?" => Event::Help,
        "quit" | "exit" | "q" => Event::Quit,
        other => return Err(format!("Unknown command: {other} (try `help`)")),
    };
    Ok(Some(event))
}

/// Strips one pair of matching surrounding quotes.
fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|t| t.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

fn apply(state: &mut ViewState, event: &Event) {
    match event {
        Event::ToggleYear(year) => state.toggle_year(*year),
        Event::Search(query) => state.set_query(query.as_str()),
        Event::Clear => state.clear_query(),
        Event::Show | Event::Help | Event::Quit => {}
    }
}

/// Runs the session until `quit` or end of input and returns the final state.
pub async fn run<R, W>(
    catalog: &Catalog,
    settings: &Settings,
    json: bool,
    reader: R,
    mut writer: W,
) -> Result<ViewState, PaperShelfError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut state = ViewState::default();
    let initial = crate::cli::render_view(catalog, &state, settings, json)?;
    writer.write_all(initial.as_bytes()).await?;
    writer.write_all(PROMPT.as_bytes()).await?;
    writer.flush().await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let output = match parse_event(&line) {
            Ok(None) => String::new(),
            Ok(Some(Event::Quit)) => break,
            Ok(Some(Event::Help)) => HELP.to_string(),
            Ok(Some(event)) => {
                apply(&mut state, &event);
                crate::cli::render_view(catalog, &state, settings, json)?
            }
            Err(message) => format!("{message}\n"),
        };
        writer.write_all(output.as_bytes()).await?;
        writer.write_all(PROMPT.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(state)
}
