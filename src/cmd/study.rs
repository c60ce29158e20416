// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;

use crate::cmd::resolve_directory;
use crate::error::DeckError;
use crate::error::Fallible;
use crate::repository::CreateOutcome;
use crate::session::NO_CARD_SELECTED;
use crate::session::Session;
use crate::types::card::Face;
use crate::types::card::is_blank;
use crate::workspace::Confirmation;
use crate::workspace::Workspace;

const HELP: &str = "Commands: [n]ext, [p]revious, [f]lip, [s]huffle, [u]nshuffle, [a]dd, [e]dit, [d]elete, [w]rite, [o]pen <deck>, [c]reate <deck>, [q]uit, [h]elp.";

pub fn study_deck(name: &str, directory: Option<String>) -> Fallible<()> {
    let directory = resolve_directory(directory)?;
    let mut workspace = Workspace::load(name, &directory)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(&mut workspace, &mut stdin.lock(), &mut stdout.lock())
}

/// Reads commands until the user quits or the input ends. End of input
/// leaves the deck file untouched.
pub fn run<R: BufRead, W: Write>(
    workspace: &mut Workspace,
    input: &mut R,
    output: &mut W,
) -> Fallible<()> {
    writeln!(output, "{HELP}")?;
    loop {
        show_current(workspace.session()?, output)?;
        let Some(command) = prompt(input, output, "> ")? else {
            if workspace.is_dirty() {
                writeln!(output, "Unsaved changes were not written.")?;
            }
            return Ok(());
        };
        let command = command.trim();
        let (verb, argument) = match command.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (command, ""),
        };
        match verb {
            "n" | "" => {
                workspace.session_mut()?.advance(1);
            }
            "p" => {
                workspace.session_mut()?.advance(-1);
            }
            "f" => {
                workspace.session_mut()?.flip();
            }
            "s" => {
                workspace.session_mut()?.shuffle();
                writeln!(output, "Shuffled.")?;
            }
            "u" => {
                workspace.session_mut()?.restore_original_order();
                writeln!(output, "Original order restored.")?;
            }
            "a" => add(workspace.session_mut()?, input, output)?,
            "e" => edit(workspace.session_mut()?, input, output)?,
            "d" => delete(workspace.session_mut()?, input, output)?,
            "w" => {
                if report(output, workspace.save())?.is_some() {
                    writeln!(output, "Saved.")?;
                }
            }
            "o" => open(workspace, argument, input, output)?,
            "c" => create(workspace, argument, input, output)?,
            "q" => {
                let choice = confirmation(workspace, input, output)?;
                if let Some(true) = report(output, workspace.close(choice))? {
                    return Ok(());
                }
            }
            "h" | "?" => writeln!(output, "{HELP}")?,
            other => writeln!(output, "Unknown command: {other}")?,
        }
    }
}

fn show_current<W: Write>(session: &Session, output: &mut W) -> Fallible<()> {
    match session.cursor() {
        Some(index) => {
            let label = match session.face() {
                Face::Front => "side 1",
                Face::Back => "side 2",
            };
            writeln!(
                output,
                "[{}/{}] {label}: {}",
                index + 1,
                session.len(),
                session.current_text()
            )?;
        }
        None => writeln!(output, "{NO_CARD_SELECTED}")?,
    }
    Ok(())
}

fn add<R: BufRead, W: Write>(session: &mut Session, input: &mut R, output: &mut W) -> Fallible<()> {
    let Some(side1) = prompt_text(input, output, "Side 1: ")? else {
        return cancelled(output);
    };
    let Some(side2) = prompt_text(input, output, "Side 2: ")? else {
        return cancelled(output);
    };
    report(output, session.add_card(side1, side2))?;
    Ok(())
}

fn edit<R: BufRead, W: Write>(session: &mut Session, input: &mut R, output: &mut W) -> Fallible<()> {
    let Some(card) = session.current() else {
        report::<_, ()>(output, Err(DeckError::NoSelection))?;
        return Ok(());
    };
    let (current1, current2) = (card.side_a().to_string(), card.side_b().to_string());
    writeln!(output, "Press enter to keep a side as it is.")?;
    let Some(side1) = prompt(input, output, &format!("Side 1 [{current1}]: "))? else {
        return cancelled(output);
    };
    let Some(side2) = prompt(input, output, &format!("Side 2 [{current2}]: "))? else {
        return cancelled(output);
    };
    let side1 = if is_blank(&side1) { current1 } else { side1 };
    let side2 = if is_blank(&side2) { current2 } else { side2 };
    report(output, session.edit_current(side1, side2))?;
    Ok(())
}

fn delete<R: BufRead, W: Write>(
    session: &mut Session,
    input: &mut R,
    output: &mut W,
) -> Fallible<()> {
    let Some(card) = session.current() else {
        report::<_, ()>(output, Err(DeckError::NoSelection))?;
        return Ok(());
    };
    let message = format!(
        "Delete \"{}\"? The deletion is final once the deck is written. [y/n] ",
        card.side_a()
    );
    match prompt(input, output, &message)? {
        Some(answer) if answer.trim().eq_ignore_ascii_case("y") => {
            if report(output, session.delete_current())?.is_some() {
                writeln!(output, "Deleted.")?;
            }
        }
        _ => cancelled(output)?,
    }
    Ok(())
}

fn open<R: BufRead, W: Write>(
    workspace: &mut Workspace,
    name: &str,
    input: &mut R,
    output: &mut W,
) -> Fallible<()> {
    let Some((name, directory)) = target(workspace, name, input, output)? else {
        return cancelled(output);
    };
    let choice = confirmation(workspace, input, output)?;
    match report(output, workspace.open(&name, &directory, choice))? {
        Some(true) => writeln!(output, "Opened {name}.")?,
        Some(false) => cancelled(output)?,
        None => {}
    }
    Ok(())
}

fn create<R: BufRead, W: Write>(
    workspace: &mut Workspace,
    name: &str,
    input: &mut R,
    output: &mut W,
) -> Fallible<()> {
    let Some((name, directory)) = target(workspace, name, input, output)? else {
        return cancelled(output);
    };
    let choice = confirmation(workspace, input, output)?;
    match report(output, workspace.create(&name, &directory, choice))? {
        Some(Some(CreateOutcome::Created)) => writeln!(output, "Created {name}.")?,
        Some(Some(CreateOutcome::AlreadyExists)) => {
            writeln!(output, "error: deck \"{name}\" already exists.")?
        }
        Some(None) => cancelled(output)?,
        None => {}
    }
    Ok(())
}

/// The deck named after the command, asked for if missing, in the directory
/// of the open deck.
fn target<R: BufRead, W: Write>(
    workspace: &Workspace,
    name: &str,
    input: &mut R,
    output: &mut W,
) -> Fallible<Option<(String, PathBuf)>> {
    let directory = workspace
        .deck()
        .map(|deck| deck.directory().to_path_buf())
        .ok_or(DeckError::NoDeckOpen)?;
    if !is_blank(name) {
        return Ok(Some((name.to_string(), directory)));
    }
    let name = prompt_text(input, output, "Deck name: ")?;
    Ok(name.map(|name| (name.trim().to_string(), directory)))
}

/// Asks whether to save if the open deck has unsaved changes.
fn confirmation<R: BufRead, W: Write>(
    workspace: &Workspace,
    input: &mut R,
    output: &mut W,
) -> Fallible<Confirmation> {
    match workspace.deck() {
        Some(deck) if deck.is_dirty() => confirm_save(input, output, deck.name()),
        _ => Ok(Confirmation::Discard),
    }
}

fn confirm_save<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    name: &str,
) -> Fallible<Confirmation> {
    loop {
        let message = format!("Save changes to \"{name}\"? [y/n/c] ");
        let Some(answer) = prompt(input, output, &message)? else {
            return Ok(Confirmation::Cancel);
        };
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" => return Ok(Confirmation::Save),
            "n" => return Ok(Confirmation::Discard),
            "c" => return Ok(Confirmation::Cancel),
            _ => {}
        }
    }
}

/// Prints a deck error and carries on. Terminal errors are propagated.
fn report<W: Write, T>(output: &mut W, result: Result<T, DeckError>) -> Fallible<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::debug!("Command failed: {e}");
            writeln!(output, "error: {e}")?;
            Ok(None)
        }
    }
}

fn cancelled<W: Write>(output: &mut W) -> Fallible<()> {
    writeln!(output, "Cancelled.")?;
    Ok(())
}

/// Reads one line. `None` means the input has ended.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> Fallible<Option<String>> {
    write!(output, "{message}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(None);
    }
    let line = line.strip_suffix('\n').unwrap_or(&line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    Ok(Some(line.to_string()))
}

/// Reads one line, asking again while it is blank.
fn prompt_text<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> Fallible<Option<String>> {
    loop {
        match prompt(input, output, message)? {
            Some(text) if is_blank(&text) => {
                writeln!(output, "The text must not be blank.")?;
            }
            other => return Ok(other),
        }
    }
}
