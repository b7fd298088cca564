// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive REPL for talking to Sophie.

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use sophie_agent::{CLEAR_NOTICE, Reply, ReplyKind, Session};
use sophie_core::{Mood, Role, SophieError};

use crate::render::to_plain_text;

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand<'a> {
    Quit,
    Clear,
    Mood(&'a str),
    History,
    /// Unrecognised slash command.
    Unknown(&'a str),
    /// Anything else is a conversational turn.
    Turn(&'a str),
}

pub fn parse_line(line: &str) -> ShellCommand<'_> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return ShellCommand::Turn(line);
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name {
        "quit" | "exit" => ShellCommand::Quit,
        "clear" => ShellCommand::Clear,
        "mood" => ShellCommand::Mood(arg),
        "history" => ShellCommand::History,
        _ => ShellCommand::Unknown(trimmed),
    }
}

/// Runs the shell until `/quit`, Ctrl-C or Ctrl-D.
pub async fn run_shell(mut session: Session, user_name: &str) -> Result<(), SophieError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| SophieError::Internal(format!("failed to initialize line editor: {e}")))?;

    eprintln!("{}", "sophie shell".bold().green());
    eprintln!(
        "Hi {user_name}! Mood: {}. Type /quit to exit, /clear to start over, /mood <{}> to change mood.",
        session.mood(),
        Mood::names().join("|")
    );
    if !session.memory_enabled() {
        eprintln!("{}", "memory is off for this session".yellow());
    }
    eprintln!();

    loop {
        let prompt = format!("{}> ", user_name.green());
        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match parse_line(&line) {
                    ShellCommand::Quit => break,
                    ShellCommand::Clear => {
                        session.reset();
                        println!("{}", CLEAR_NOTICE.dimmed());
                    }
                    ShellCommand::Mood(name) => match Mood::parse(name) {
                        Ok(mood) => {
                            session.set_mood(mood);
                            println!("{}", format!("Mood set to {mood}.").dimmed());
                        }
                        Err(e) => eprintln!("{}: {e}", "error".red()),
                    },
                    ShellCommand::History => print_history(&session),
                    ShellCommand::Unknown(command) => {
                        eprintln!("{}: unknown command {command}", "error".red());
                    }
                    ShellCommand::Turn(text) => {
                        let outcome = session.handle(text).await;
                        for reply in &outcome.replies {
                            print_reply(reply);
                        }
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    eprintln!("{}", "goodbye".dimmed());
    Ok(())
}

fn print_reply(reply: &Reply) {
    let text = to_plain_text(&reply.text);
    match reply.kind {
        ReplyKind::Assistant => println!("{} {text}", "sophie:".bold().magenta()),
        ReplyKind::Acknowledgement | ReplyKind::Memories => println!("{}", text.cyan()),
        ReplyKind::NothingRecalled | ReplyKind::Notice => println!("{}", text.yellow()),
        ReplyKind::News => println!("{text}"),
        ReplyKind::Error => println!("{}", text.red()),
    }
}

fn print_history(session: &Session) {
    for entry in session.history() {
        let role = match entry.role() {
            Role::System => "system".dimmed(),
            Role::User => "user".green(),
            Role::Assistant => "assistant".magenta(),
        };
        let content = to_plain_text(entry.content());
        if entry.is_error_notice() {
            println!("[{role}] {}", content.red());
        } else {
            println!("[{role}] {content}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_commands_parse() {
        assert_eq!(parse_line("/quit"), ShellCommand::Quit);
        assert_eq!(parse_line("  /exit  "), ShellCommand::Quit);
        assert_eq!(parse_line("/clear"), ShellCommand::Clear);
        assert_eq!(parse_line("/history"), ShellCommand::History);
        assert_eq!(parse_line("/mood  serious "), ShellCommand::Mood("serious"));
        assert_eq!(parse_line("/mood"), ShellCommand::Mood(""));
        assert_eq!(parse_line("/dance now"), ShellCommand::Unknown("/dance now"));
    }

    #[test]
    fn everything_else_is_a_turn() {
        assert_eq!(parse_line("remember I like tea"), ShellCommand::Turn("remember I like tea"));
        assert_eq!(parse_line("what about /quit?"), ShellCommand::Turn("what about /quit?"));
    }

    #[test]
    fn remember_prefix_survives_untrimmed() {
        assert_eq!(parse_line("remember   "), ShellCommand::Turn("remember   "));
    }
}
