use sketch_relay::Stroke;

/// One line of user input
#[derive(Debug, PartialEq)]
pub enum Command {
    Draw(Stroke),
    Guess(String),
}

impl Command {
    /// `draw x1 y1 x2 y2`, `guess <text>`, or bare text as a guess.
    /// Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match head {
            "draw" => parse_draw(rest).map(|stroke| Some(Command::Draw(stroke))),
            "guess" => Ok(Some(Command::Guess(rest.trim().to_string()))),
            _ => Ok(Some(Command::Guess(line.to_string()))),
        }
    }
}

fn parse_draw(args: &str) -> Result<Stroke, String> {
    let coords = args
        .split_whitespace()
        .map(|n| n.parse::<i32>().map_err(|_| format!("not a coordinate: {n}")))
        .collect::<Result<Vec<_>, _>>()?;

    let [x1, y1, x2, y2] = coords.as_slice() else {
        return Err("usage: draw <x1> <y1> <x2> <y2>".to_string());
    };
    Ok(Stroke::new(*x1, *y1, *x2, *y2))
}
