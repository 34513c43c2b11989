// SPDX-License-Identifier: MIT
//
// Command lines: input lines that start with `:`.
//
// | Command          | Action                                          |
// |------------------|-------------------------------------------------|
// | `:w`             | Save to the file the session was opened with     |
// | `:w <path>`      | Save to `path`                                  |
// | `:q`             | Quit                                            |
// | `:wq`            | Save, then quit                                 |
// | `:u`, `:undo`    | Undo                                            |
// | `:redo`          | Redo                                            |
// | `:alt N`         | Swap in alternate N (1-based) for the suggestion |
// | `:bs [N]`        | Delete N graphemes before the cursor (default 1) |
// | `:sel A B`       | Select chars `[A, B)`; `:sel A` places a caret  |
// | `:voice`         | Dictate with the microphone                     |
// | `:gen <prompt>`  | Generate text from a prompt                     |
// | `:speak`         | Read the selection or the document aloud        |
// | `:set ...`       | Change options (`:set translit!`, `:set mc=4`)  |
// | `:show`          | Print the document with the selection marked    |
// | `:help`          | List commands                                   |

use std::path::PathBuf;

/// A parsed `:` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Write(Option<PathBuf>),
    WriteQuit,
    Quit,
    Undo,
    Redo,
    /// 1-based index into the alternates.
    Alternate(usize),
    Backspace(usize),
    Select(usize, usize),
    Voice,
    Generate(String),
    Speak,
    Set(String),
    Show,
    Help,
    /// Unknown or malformed; carries the input for the error message.
    Unknown(String),
}

/// Parse a command line (without the leading `:`).
pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    let (name, rest) = trimmed
        .split_once(char::is_whitespace)
        .map_or((trimmed, ""), |(name, rest)| (name, rest.trim()));
    let unknown = || Command::Unknown(trimmed.to_string());

    match name {
        "w" | "write" if rest.is_empty() => Command::Write(None),
        "w" | "write" => Command::Write(Some(PathBuf::from(rest))),
        "wq" | "x" => Command::WriteQuit,
        "q" | "quit" | "q!" => Command::Quit,
        "u" | "undo" => Command::Undo,
        "redo" | "red" => Command::Redo,
        "alt" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => Command::Alternate(n),
            _ => unknown(),
        },
        "bs" if rest.is_empty() => Command::Backspace(1),
        "bs" => rest.parse().map_or_else(|_| unknown(), Command::Backspace),
        "sel" => parse_select(rest).unwrap_or_else(unknown),
        "voice" => Command::Voice,
        "gen" if !rest.is_empty() => Command::Generate(rest.to_string()),
        "speak" => Command::Speak,
        "set" | "se" => Command::Set(rest.to_string()),
        "show" => Command::Show,
        "help" | "h" => Command::Help,
        _ => unknown(),
    }
}

fn parse_select(rest: &str) -> Option<Command> {
    let mut parts = rest.split_whitespace().map(str::parse::<usize>);
    let start = parts.next()?.ok()?;
    let end = match parts.next() {
        Some(end) => end.ok()?,
        None => start,
    };
    parts.next().is_none().then_some(Command::Select(start, end))
}

pub const HELP: &str = "\
:w [path]      save            :q / :wq     quit
:u  :redo      undo / redo     :alt N       use alternate N
:bs [N]        backspace       :sel A [B]   select [A, B)
:voice         dictate         :gen PROMPT  generate text
:speak         read aloud      :set ...     options
:show          print document";
