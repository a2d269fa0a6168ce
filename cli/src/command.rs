//! Line commands understood by the interactive shell.

use glossa_search::{Focus, SearchMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text replaces the query.
    Query(String),
    Paste(String),
    Clipboard(String),
    Move(isize),
    Load,
    Open(usize),
    Advanced {
        phrase: String,
        filters: Option<String>,
    },
    Page(SearchMode),
    Focus(Focus),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (try :help)", self.0)
    }
}

pub const HELP: &str = "\
text            search for text
:paste TEXT     search, then select and load the best match
:clip TEXT      simulate a clipboard change from another window
:down [N]       move the selection down
:up [N]         move the selection up
:load           load the selected entry
:open ROW       select and load ROW
:adv PHRASE [| FILTERS]
                phrase search over headwords and phrases
:examples       open the examples page for the query
:definitions    open the definitions page for the query
:focus query|list
:quit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Query(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "paste" => Ok(Command::Paste(arg.to_string())),
            "clip" => Ok(Command::Clipboard(arg.to_string())),
            "down" | "j" => Ok(Command::Move(count(arg)?)),
            "up" | "k" => Ok(Command::Move(-count(arg)?)),
            "load" => Ok(Command::Load),
            "open" => arg
                .parse()
                .map(Command::Open)
                .map_err(|_| ParseError(format!("not a row number: {arg:?}"))),
            "adv" => {
                let (phrase, filters) = match arg.split_once('|') {
                    Some((phrase, filters)) => (phrase.trim(), Some(filters.trim())),
                    None => (arg, None),
                };
                Ok(Command::Advanced {
                    phrase: phrase.to_string(),
                    filters: filters.filter(|f| !f.is_empty()).map(str::to_string),
                })
            }
            "examples" => Ok(Command::Page(SearchMode::Examples)),
            "definitions" => Ok(Command::Page(SearchMode::Definitions)),
            "focus" => match arg {
                "query" => Ok(Command::Focus(Focus::QueryBox)),
                "list" => Ok(Command::Focus(Focus::ResultList)),
                _ => Err(ParseError(format!("unknown focus target: {arg:?}"))),
            },
            "help" | "h" => Ok(Command::Help),
            "quit" | "q" => Ok(Command::Quit),
            _ => Err(ParseError(format!("unknown command: :{name}"))),
        }
    }
}

fn count(arg: &str) -> Result<isize, ParseError> {
    if arg.is_empty() {
        return Ok(1);
    }
    arg.parse()
        .map_err(|_| ParseError(format!("not a count: {arg:?}")))
}
