//! Line commands and text rendering
//!
//! Turns stdin lines into [`Command`]s and browser events into printable
//! text. Row numbers shown to the user start at 1.

use cdj_browser_core::browser::{BrowserEvent, MetadataField, ViewDescriptor};
use cdj_browser_core::{PlayerNumber, Slot, SortMode};
use std::fmt::Write;

pub const HELP: &str = "\
Commands:
  ls | show          print the current view again
  open <row>         open a row of the current view
  back               go up one level
  sort <mode>        change the title sort order
  load <player>      load the selected track into a player
  media <slot>       signal that a slot (usb, sd) changed contents
  player <n>         browse another player
  help               show this help
  quit               exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Open(usize),
    Back,
    Sort(SortMode),
    Load(PlayerNumber),
    Media(Slot),
    Player(PlayerNumber),
    Help,
    Quit,
}

/// Parse one input line
///
/// Returns `Ok(None)` for a blank line and a printable message on error.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments for '{}'", verb));
    }

    let require = |what: &str| arg.ok_or_else(|| format!("'{}' needs a {}", verb, what));

    let command = match verb.to_ascii_lowercase().as_str() {
        "ls" | "show" => Command::Show,
        "open" => {
            let row = require("row number")?;
            match row.parse::<usize>() {
                Ok(n) if n > 0 => Command::Open(n - 1),
                _ => return Err(format!("'{}' is not a row number", row)),
            }
        }
        "back" => Command::Back,
        "sort" => Command::Sort(require("sort mode")?.parse().map_err(|e| format!("{}", e))?),
        "load" => Command::Load(require("player number")?.parse().map_err(|e| format!("{}", e))?),
        "media" => Command::Media(require("slot")?.parse().map_err(|e| format!("{}", e))?),
        "player" => Command::Player(require("player number")?.parse().map_err(|e| format!("{}", e))?),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}

/// Fixed-width table of a view, rows numbered from 1
pub fn render_view(view: &ViewDescriptor) -> String {
    let column_count = view
        .rows
        .iter()
        .map(|row| row.cells.len())
        .chain(std::iter::once(view.columns.len()))
        .max()
        .unwrap_or(0);
    let mut widths = vec![0usize; column_count];
    let lines = std::iter::once(&view.columns).chain(view.rows.iter().map(|row| &row.cells));
    for cells in lines {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.title);
    let _ = writeln!(out, "     {}", pad_cells(&view.columns, &widths));
    if view.rows.is_empty() {
        let _ = writeln!(out, "     (empty)");
    }
    for (index, row) in view.rows.iter().enumerate() {
        let marker = if row.tag.is_some() {
            format!("{:>3}.", index + 1)
        } else {
            "    ".to_string()
        };
        let _ = writeln!(out, "{} {}", marker, pad_cells(&row.cells, &widths));
    }
    out
}

fn pad_cells(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn render_metadata(fields: &[MetadataField]) -> String {
    let width = fields.iter().map(|f| f.label.len()).max().unwrap_or(0);
    let mut out = String::from("-- Track --\n");
    for field in fields {
        let _ = writeln!(out, "  {:<width$}  {}", field.label, field.value, width = width);
    }
    out
}

pub fn render_buttons(targets: &[(PlayerNumber, bool)]) -> String {
    let buttons: Vec<_> = targets
        .iter()
        .map(|(player, online)| {
            if *online {
                format!("[load {}]", player)
            } else {
                format!("(load {})", player)
            }
        })
        .collect();
    format!("{}\n", buttons.join(" "))
}

pub fn render_event(event: &BrowserEvent) -> String {
    match event {
        BrowserEvent::RenderView(view) => render_view(view),
        BrowserEvent::RenderMetadata(fields) => render_metadata(fields),
        BrowserEvent::ButtonAvailability(targets) => render_buttons(targets),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdj_browser_core::browser::{RowKind, RowTag, ViewRow};
    use cdj_browser_core::catalog::Record;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("  "), Ok(None));
        assert_eq!(parse_command("ls"), Ok(Some(Command::Show)));
        assert_eq!(parse_command("open 3"), Ok(Some(Command::Open(2))));
        assert_eq!(parse_command("SORT bpm"), Ok(Some(Command::Sort(SortMode::Bpm))));
        assert_eq!(parse_command("media sd"), Ok(Some(Command::Media(Slot::Sd))));
        assert_eq!(
            parse_command("player 2"),
            Ok(Some(Command::Player(PlayerNumber(2))))
        );
        assert_eq!(parse_command("load 4"), Ok(Some(Command::Load(PlayerNumber(4)))));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("open").is_err());
        assert!(parse_command("open 0").is_err());
        assert!(parse_command("open 1 2").is_err());
        assert!(parse_command("sort loudness").is_err());
        assert!(parse_command("media floppy").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_render_view_numbers_clickable_rows() {
        let view = ViewDescriptor {
            title: "Genre on USB".to_string(),
            columns: vec!["Name".to_string()],
            rows: vec![
                ViewRow::tagged(
                    vec!["House".to_string()],
                    RowTag::new(RowKind::Genre, Record::new().with("genre_id", 5u32)),
                ),
                ViewRow::inert("nothing"),
            ],
        };
        let text = render_view(&view);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "== Genre on USB ==");
        assert_eq!(lines[1], "     Name");
        assert_eq!(lines[2], "  1. House");
        assert_eq!(lines[3], "     nothing");
    }

    #[test]
    fn test_render_buttons() {
        let text = render_buttons(&[(PlayerNumber(1), false), (PlayerNumber(2), true)]);
        assert_eq!(text, "(load 1) [load 2]\n");
    }
}
