/// One observed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub text: String,
    /// Display name of the sender, when the transport knows it.
    pub username: Option<String>,
}

impl ChatLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            username: None,
        }
    }

    pub fn from_user(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            username: Some(username.into()),
        }
    }
}

/// A recognized `/startgame <word>` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartCommand {
    pub seed_word: String,
    /// Only used for logging; anyone may start a game.
    pub issuer: Option<String>,
}

impl StartCommand {
    pub fn from_line(line: &ChatLine) -> Option<Self> {
        parse_start_command(&line.text).map(|seed_word| Self {
            seed_word,
            issuer: line.username.clone(),
        })
    }
}

const START_TOKEN: &str = "/startgame";

/// Extract the seed word from a `/startgame <word>` line.
///
/// The leading token is case-insensitive and must be followed by whitespace;
/// the seed word is the rest of the (single-line) message, trimmed.
pub fn parse_start_command(text: &str) -> Option<String> {
    let text = text.trim();
    let (token, rest) = text.split_once(char::is_whitespace)?;
    if !token.eq_ignore_ascii_case(START_TOKEN) {
        return None;
    }
    if rest.contains(['\n', '\r', '\u{2028}', '\u{2029}']) {
        return None;
    }
    let seed = rest.trim();
    (!seed.is_empty()).then(|| seed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seed_word() {
        assert_eq!(parse_start_command("/startgame test").as_deref(), Some("test"));
        assert_eq!(
            parse_start_command("  /STARTGAME   Big Seed  ").as_deref(),
            Some("Big Seed")
        );
        assert_eq!(parse_start_command("/StartGame\tx").as_deref(), Some("x"));
    }

    #[test]
    fn rejects_non_commands() {
        assert_eq!(parse_start_command("/startgame"), None);
        assert_eq!(parse_start_command("/startgame   "), None);
        assert_eq!(parse_start_command("/startgametest"), None);
        assert_eq!(parse_start_command("please /startgame test"), None);
        assert_eq!(parse_start_command("/start test"), None);
        assert_eq!(parse_start_command(""), None);
    }

    #[test]
    fn rejects_multi_line_messages() {
        assert_eq!(parse_start_command("/startgame a\nb"), None);
    }

    #[test]
    fn keeps_issuer() {
        let cmd = StartCommand::from_line(&ChatLine::from_user("Alice", "/startgame test")).unwrap();
        assert_eq!(cmd.seed_word, "test");
        assert_eq!(cmd.issuer.as_deref(), Some("Alice"));
        assert!(StartCommand::from_line(&ChatLine::new("hello")).is_none());
    }
}
