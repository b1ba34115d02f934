use serde::Serialize;
use std::fmt;

/// The character that introduces a legacy formatting code in chat text.
pub const LEGACY_MARKER: char = '§';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCode {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Obfuscated,
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Reset,
}

impl ColorCode {
    pub fn parse(code: char) -> Option<ColorCode> {
        Some(match code {
            '0' => ColorCode::Black,
            '1' => ColorCode::DarkBlue,
            '2' => ColorCode::DarkGreen,
            '3' => ColorCode::DarkAqua,
            '4' => ColorCode::DarkRed,
            '5' => ColorCode::DarkPurple,
            '6' => ColorCode::Gold,
            '7' => ColorCode::Gray,
            '8' => ColorCode::DarkGray,
            '9' => ColorCode::Blue,
            'a' => ColorCode::Green,
            'b' => ColorCode::Aqua,
            'c' => ColorCode::Red,
            'd' => ColorCode::LightPurple,
            'e' => ColorCode::Yellow,
            'f' => ColorCode::White,
            'k' => ColorCode::Obfuscated,
            'l' => ColorCode::Bold,
            'm' => ColorCode::Strikethrough,
            'n' => ColorCode::Underline,
            'o' => ColorCode::Italic,
            'r' => ColorCode::Reset,
            _ => return None,
        })
    }

    /// The single character that follows [`LEGACY_MARKER`] for this code.
    pub fn code(self) -> char {
        match self {
            ColorCode::Black => '0',
            ColorCode::DarkBlue => '1',
            ColorCode::DarkGreen => '2',
            ColorCode::DarkAqua => '3',
            ColorCode::DarkRed => '4',
            ColorCode::DarkPurple => '5',
            ColorCode::Gold => '6',
            ColorCode::Gray => '7',
            ColorCode::DarkGray => '8',
            ColorCode::Blue => '9',
            ColorCode::Green => 'a',
            ColorCode::Aqua => 'b',
            ColorCode::Red => 'c',
            ColorCode::LightPurple => 'd',
            ColorCode::Yellow => 'e',
            ColorCode::White => 'f',
            ColorCode::Obfuscated => 'k',
            ColorCode::Bold => 'l',
            ColorCode::Strikethrough => 'm',
            ColorCode::Underline => 'n',
            ColorCode::Italic => 'o',
            ColorCode::Reset => 'r',
        }
    }
}

/// Writes the legacy two character form, e.g. `§c` for red.
impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", LEGACY_MARKER, self.code())
    }
}

/// Removes every valid legacy code from `message`, leaving plain text.
/// Markers followed by an unknown code are kept as typed.
pub fn strip_legacy(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut chars = message.chars().peekable();
    while let Some(c) = chars.next() {
        if c == LEGACY_MARKER {
            if let Some(&code) = chars.peek() {
                if ColorCode::parse(code).is_some() {
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// A single plain text chat component.
#[derive(Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct TextComponent {
    pub text: String,
}

impl TextComponent {
    pub fn encode_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<S> From<S> for TextComponent
where
    S: Into<String>,
{
    fn from(value: S) -> Self {
        TextComponent { text: value.into() }
    }
}

/// A chat payload ready to be written to any number of connections.
///
/// The body is always a single `{"text":"..."}` object. Escaping of quotes,
/// backslashes and control characters is done by `serde_json`, so the legacy
/// color markers inside the text travel through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEnvelope {
    text: String,
    json: String,
}

impl ChatEnvelope {
    pub fn new(text: &str) -> Result<ChatEnvelope, serde_json::Error> {
        let json = TextComponent::from(text).encode_json()?;
        Ok(ChatEnvelope {
            text: text.to_owned(),
            json,
        })
    }

    /// The unescaped text carried by the envelope.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn json(&self) -> &str {
        &self.json
    }

    pub fn into_json(self) -> String {
        self.json
    }
}

impl fmt::Display for ChatEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.json)
    }
}
