//! Line-based input scripts for driving the viewer without a window.
//!
//! One command per line; blank lines and `#` comments are skipped.
//!
//! ```text
//! click 640 360
//! down 640 360
//! move 700 360
//! up 700 360
//! wheel 120 640 360
//! dblclick 640 360
//! contextmenu 640 360
//! key r
//! scene scene2
//! ```

use std::fmt;

use foundation::math::Vec2;
use runtime::InputEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Input(InputEvent),
    Scene(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScriptError {}

pub fn parse_script(source: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let command = parse_line(line).map_err(|message| ScriptError {
            line: index + 1,
            message,
        })?;
        commands.push(command);
    }
    Ok(commands)
}

fn parse_line(line: &str) -> Result<ScriptCommand, String> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let event = match verb {
        "click" => InputEvent::LeftClick {
            position: position(&args)?,
        },
        "move" => InputEvent::MouseMove {
            position: position(&args)?,
        },
        "down" => InputEvent::LeftDown {
            position: optional_position(&args)?,
        },
        "up" => InputEvent::LeftUp {
            position: optional_position(&args)?,
        },
        "dblclick" => InputEvent::LeftDoubleClick {
            position: optional_position(&args)?,
        },
        "contextmenu" => InputEvent::ContextMenu {
            position: optional_position(&args)?,
        },
        "wheel" => {
            let (delta, rest) = args
                .split_first()
                .ok_or_else(|| "wheel needs a delta".to_string())?;
            InputEvent::Wheel {
                delta_y: number(delta)?,
                position: position(rest)?,
            }
        }
        "key" => match args.as_slice() {
            [key] => InputEvent::KeyDown {
                key: (*key).to_string(),
            },
            _ => return Err("key needs exactly one key name".to_string()),
        },
        "scene" => {
            return match args.as_slice() {
                [id] => Ok(ScriptCommand::Scene((*id).to_string())),
                _ => Err("scene needs exactly one scene id".to_string()),
            };
        }
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(ScriptCommand::Input(event))
}

fn number(word: &str) -> Result<f64, String> {
    word.parse::<f64>()
        .map_err(|_| format!("not a number: {word}"))
}

fn position(args: &[&str]) -> Result<Vec2, String> {
    match args {
        [x, y] => Ok(Vec2::new(number(x)?, number(y)?)),
        _ => Err(format!("expected X Y, got {} values", args.len())),
    }
}

fn optional_position(args: &[&str]) -> Result<Vec2, String> {
    if args.is_empty() {
        Ok(Vec2::new(0.0, 0.0))
    } else {
        position(args)
    }
}

#[cfg(test)]
mod tests {
    use super::{ScriptCommand, parse_script};
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;
    use runtime::InputEvent;

    #[test]
    fn parses_commands_and_skips_comments() {
        let script = "# warm up\nclick 10 20\n\n\
                      wheel -120 5 6  # zoom in\nkey R\nscene scene2\ndown\n";
        let commands = parse_script(script).expect("parse");
        assert_eq!(
            commands,
            vec![
                ScriptCommand::Input(InputEvent::LeftClick {
                    position: Vec2::new(10.0, 20.0)
                }),
                ScriptCommand::Input(InputEvent::Wheel {
                    delta_y: -120.0,
                    position: Vec2::new(5.0, 6.0)
                }),
                ScriptCommand::Input(InputEvent::KeyDown {
                    key: "R".to_string()
                }),
                ScriptCommand::Scene("scene2".to_string()),
                ScriptCommand::Input(InputEvent::LeftDown {
                    position: Vec2::new(0.0, 0.0)
                }),
            ]
        );
    }

    #[test]
    fn reports_the_failing_line() {
        let err = parse_script("click 1 2\nclick 1\n").expect_err("bad arity");
        assert_eq!(err.line, 2);

        let err = parse_script("hover 1 2").expect_err("unknown");
        assert_eq!(err.to_string(), "line 1: unknown command: hover");

        assert!(parse_script("wheel up 1 2").is_err());
    }
}
