use std::fmt;
use thiserror::Error;
use tracing::warn;

const SECRET_WORD: &str = "SECRET_WORD";
const DRAW: &str = "DRAW";
const GUESS: &str = "GUESS";
const RESULT: &str = "RESULT";

const CORRECT: &str = "CORRECT";
const WRONG: &str = "WRONG";

/// One line segment of a stroke, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Stroke {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x1, self.y1, self.x2, self.y2)
    }
}

/// A frame of the `KIND:payload` text protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Server to client, once per connection
    SecretWord { word: String },
    /// Relayed to every other peer
    Draw(Stroke),
    /// Client to server, raw text as typed
    Guess { text: String },
    /// Server to client, reply to a guess
    Result { correct: bool },
    /// Anything that failed to parse. Never relayed.
    Unknown,
}

/// Why a frame could not be decoded
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame has no `KIND:` prefix")]
    MissingSeparator,
    #[error("unknown frame kind `{0}`")]
    UnknownKind(String),
    #[error("draw frame has {0} fields, expected 4")]
    DrawFieldCount(usize),
    #[error("draw coordinate `{0}` is not an integer")]
    DrawCoordinate(String),
    #[error("result value `{0}` is neither CORRECT nor WRONG")]
    ResultValue(String),
}

impl Message {
    /// Strict parse of a raw frame
    pub fn parse(raw: &str) -> Result<Self, FrameError> {
        let (kind, payload) = raw.split_once(':').ok_or(FrameError::MissingSeparator)?;

        match kind {
            SECRET_WORD => Ok(Message::SecretWord {
                word: payload.to_string(),
            }),
            DRAW => parse_stroke(payload).map(Message::Draw),
            GUESS => Ok(Message::Guess {
                text: payload.to_string(),
            }),
            RESULT => match payload {
                CORRECT => Ok(Message::Result { correct: true }),
                WRONG => Ok(Message::Result { correct: false }),
                other => Err(FrameError::ResultValue(other.to_string())),
            },
            other => Err(FrameError::UnknownKind(other.to_string())),
        }
    }

    /// Lenient decode used on the read path: malformed frames become `Unknown`
    pub fn decode(raw: &str) -> Self {
        match Self::parse(raw) {
            Ok(msg) => msg,
            Err(err) => {
                warn!(raw, %err, "Dropping malformed frame");
                Message::Unknown
            }
        }
    }

    /// Wire form of the message. `Unknown` has none.
    pub fn encode(&self) -> Option<String> {
        match self {
            Message::SecretWord { word } => Some(format!("{SECRET_WORD}:{word}")),
            Message::Draw(stroke) => Some(format!("{DRAW}:{stroke}")),
            Message::Guess { text } => Some(format!("{GUESS}:{text}")),
            Message::Result { correct } => {
                let verdict = if *correct { CORRECT } else { WRONG };
                Some(format!("{RESULT}:{verdict}"))
            }
            Message::Unknown => None,
        }
    }
}

fn parse_stroke(payload: &str) -> Result<Stroke, FrameError> {
    let fields: Vec<&str> = payload.split(',').collect();
    let [x1, y1, x2, y2] = fields.as_slice() else {
        return Err(FrameError::DrawFieldCount(fields.len()));
    };

    Ok(Stroke::new(
        parse_coord(x1)?,
        parse_coord(y1)?,
        parse_coord(x2)?,
        parse_coord(y2)?,
    ))
}

/// Fields must be bare integers; surrounding whitespace makes the frame malformed.
fn parse_coord(field: &str) -> Result<i32, FrameError> {
    field
        .parse()
        .map_err(|_| FrameError::DrawCoordinate(field.to_string()))
}
