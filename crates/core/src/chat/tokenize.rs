/// Stands in for the command name when a command line has no tokens at all.
/// It is never a real command and is never forwarded to command hooks.
pub const EMPTY_COMMAND: &str = "empty";

/// A tokenized command line. Always holds at least one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommand {
    tokens: Vec<String>,
}

impl RawCommand {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn name(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// True if the name is [`EMPTY_COMMAND`], whatever follows it.
    pub fn is_empty_marker(&self) -> bool {
        self.name() == EMPTY_COMMAND
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

fn consume_token(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start_matches(' ');
    if input.is_empty() {
        return None;
    }

    let end = input.find(' ').unwrap_or(input.len());

    Some((&input[..end], &input[end..]))
}

/// Splits `input` on spaces. Runs of spaces never produce empty tokens.
pub fn parse_cmd(input: &str) -> RawCommand {
    let mut tokens = Vec::new();
    let mut remaining = input;
    while let Some((token, rest)) = consume_token(remaining) {
        tokens.push(token.to_owned());
        remaining = rest;
    }

    if tokens.is_empty() {
        tokens.push(EMPTY_COMMAND.to_owned());
    }

    RawCommand { tokens }
}
