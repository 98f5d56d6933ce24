/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Url(String),
    Pick(usize),
    Preview,
    Hide,
    Thumbnails(Option<String>),
    Status,
    Help,
    Quit,
    Query(String),
    Empty,
}

pub const HELP: &str = "\
Commands:
  :url <URL>    load a video (a bare URL line works too)
  :pick <N>     cue playback at result N
  :preview      show the player cue
  :hide         hide the player
  :thumbs [DIR] list thumbnail URLs, or save them into DIR
  :status       show session state
  :quit         exit
Anything else is a search query.";

/// Decode raw input bytes, replacing invalid UTF-8 instead of failing
pub fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end_matches(['\r', '\n']).to_string()
}

/// Parse a line; errors are inline messages for the user
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }

    let Some(rest) = line.strip_prefix(':') else {
        if quotefind::extract_video_id(line).is_some() && line.contains('/') {
            return Ok(Command::Url(line.to_string()));
        }
        return Ok(Command::Query(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "url" | "u" => Ok(Command::Url(arg.to_string())),
        "pick" | "p" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Command::Pick(n)),
            _ => Err(format!("expected a result number, got {arg:?}")),
        },
        "preview" => Ok(Command::Preview),
        "hide" => Ok(Command::Hide),
        "thumbs" | "thumbnails" => Ok(Command::Thumbnails((!arg.is_empty()).then(|| arg.to_string()))),
        "status" => Ok(Command::Status),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command :{other} (try :help)")),
    }
}
