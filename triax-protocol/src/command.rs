//! Command parsing.
//!
//! Commands are single lines of case-insensitive ASCII, a keyword followed
//! by whitespace-separated arguments. Parsing is purely syntactic: whether a
//! command is *acceptable* (homed, not stopped, right mode) is the
//! dispatcher's business, not the parser's.

use heapless::Vec;

/// Maximum number of point indices a `LIST` command may carry
pub const MAX_LIST_POINTS: usize = 9;

/// Operating mode selected with `MODE <n>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 1: scan each point, wait for an external PICK/SKIP decision
    Live,
    /// Mode 2: scan-only traversal, or list-driven picking via `LIST`
    Scan,
    /// Mode 3: manual single-shot `GOTO` / `PICKNOW`
    Manual,
}

impl Mode {
    /// Parse a mode number (1-3)
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Mode::Live),
            2 => Some(Mode::Scan),
            3 => Some(Mode::Manual),
            _ => None,
        }
    }

    /// Wire representation (1-3)
    pub fn number(self) -> u8 {
        match self {
            Mode::Live => 1,
            Mode::Scan => 2,
            Mode::Manual => 3,
        }
    }
}

/// External pick/skip decision supplied with `DEC`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decision {
    /// Pick the object at the current point
    Pick,
    /// Leave the current point alone
    Skip,
}

/// Errors that can occur while parsing a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Line was empty or all whitespace
    Empty,
    /// Keyword not recognized
    Unknown,
    /// Keyword recognized but arguments missing or malformed
    BadArgument,
}

/// A parsed command from the external controller
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `STOP` - set the stop flag
    Stop,
    /// `UNSTOP` - clear the stop flag
    Unstop,
    /// `OFFSET <dx> <dy>` - set the global point-table offset in mm
    Offset { dx_mm: f32, dy_mm: f32 },
    /// `H0` / `HOME` - run the homing sequence
    Home,
    /// `MODE <1|2|3>` - select the operating mode
    SetMode(Mode),
    /// `START` - begin a run in the current mode
    Start,
    /// `DEC PICK` / `DEC SKIP` - supply the pending decision (mode 1)
    Dec(Decision),
    /// `LIST P<n> ...` - supply point indices for a list-driven pick run
    List(Vec<u8, MAX_LIST_POINTS>),
    /// `GOTO P<n>` - mode 3: move to a named point
    Goto(u8),
    /// `PICKNOW` - mode 3: run the pick sequence at the current position
    PickNow,
    /// `D <seconds>` - blocking dwell
    Dwell { seconds: f32 },
    /// `M <x> <y>` - direct scan-move to a coordinate in mm
    MoveTo { x_mm: f32, y_mm: f32 },
    /// `P <x> <y>` - direct move-then-pick at a coordinate in mm
    PickAt { x_mm: f32, y_mm: f32 },
    /// `?` - status snapshot request
    Status,
}

impl Command {
    /// Parse a single command line
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split_ascii_whitespace();
        let keyword = tokens.next().ok_or(CommandError::Empty)?;

        // Keywords are short; compare through an uppercased copy
        let mut upper = heapless::String::<16>::new();
        for c in keyword.chars() {
            if upper.push(c.to_ascii_uppercase()).is_err() {
                return Err(CommandError::Unknown);
            }
        }

        match upper.as_str() {
            "STOP" => Ok(Command::Stop),
            "UNSTOP" => Ok(Command::Unstop),
            "OFFSET" => {
                let dx_mm = parse_f32(tokens.next())?;
                let dy_mm = parse_f32(tokens.next())?;
                Ok(Command::Offset { dx_mm, dy_mm })
            }
            "H0" | "HOME" => Ok(Command::Home),
            "MODE" => {
                let n = parse_u8(tokens.next())?;
                Mode::from_number(n)
                    .map(Command::SetMode)
                    .ok_or(CommandError::BadArgument)
            }
            "START" => Ok(Command::Start),
            "DEC" => match tokens.next() {
                Some(arg) if arg.eq_ignore_ascii_case("PICK") => {
                    Ok(Command::Dec(Decision::Pick))
                }
                Some(arg) if arg.eq_ignore_ascii_case("SKIP") => {
                    Ok(Command::Dec(Decision::Skip))
                }
                _ => Err(CommandError::BadArgument),
            },
            "LIST" => {
                let mut points = Vec::new();
                for tok in tokens {
                    // Invalid or out-of-range tokens are ignored, per protocol
                    if let Some(n) = parse_point(tok) {
                        if points.push(n).is_err() {
                            break;
                        }
                    }
                }
                Ok(Command::List(points))
            }
            "GOTO" => {
                let tok = tokens.next().ok_or(CommandError::BadArgument)?;
                parse_point(tok)
                    .map(Command::Goto)
                    .ok_or(CommandError::BadArgument)
            }
            "PICKNOW" => Ok(Command::PickNow),
            "D" => {
                let seconds = parse_f32(tokens.next())?;
                if seconds < 0.0 {
                    return Err(CommandError::BadArgument);
                }
                Ok(Command::Dwell { seconds })
            }
            "M" => {
                let x_mm = parse_f32(tokens.next())?;
                let y_mm = parse_f32(tokens.next())?;
                Ok(Command::MoveTo { x_mm, y_mm })
            }
            "P" => {
                let x_mm = parse_f32(tokens.next())?;
                let y_mm = parse_f32(tokens.next())?;
                Ok(Command::PickAt { x_mm, y_mm })
            }
            "?" => Ok(Command::Status),
            _ => Err(CommandError::Unknown),
        }
    }
}

fn parse_f32(tok: Option<&str>) -> Result<f32, CommandError> {
    let value: f32 = tok
        .ok_or(CommandError::BadArgument)?
        .parse()
        .map_err(|_| CommandError::BadArgument)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CommandError::BadArgument)
    }
}

fn parse_u8(tok: Option<&str>) -> Result<u8, CommandError> {
    tok.ok_or(CommandError::BadArgument)?
        .parse()
        .map_err(|_| CommandError::BadArgument)
}

/// Parse a point token: `P3` or bare `3`, valid range 1-9
fn parse_point(tok: &str) -> Option<u8> {
    let digits = tok.strip_prefix(['P', 'p']).unwrap_or(tok);
    match digits.parse::<u8>() {
        Ok(n) if (1..=9).contains(&n) => Some(n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_keywords() {
        assert_eq!(Command::parse("STOP"), Ok(Command::Stop));
        assert_eq!(Command::parse("UNSTOP"), Ok(Command::Unstop));
        assert_eq!(Command::parse("START"), Ok(Command::Start));
        assert_eq!(Command::parse("PICKNOW"), Ok(Command::PickNow));
        assert_eq!(Command::parse("?"), Ok(Command::Status));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(Command::parse("stop"), Ok(Command::Stop));
        assert_eq!(Command::parse("Home"), Ok(Command::Home));
        assert_eq!(Command::parse("dec pick"), Ok(Command::Dec(Decision::Pick)));
        assert_eq!(Command::parse("goto p4"), Ok(Command::Goto(4)));
    }

    #[test]
    fn test_home_synonyms() {
        assert_eq!(Command::parse("H0"), Ok(Command::Home));
        assert_eq!(Command::parse("HOME"), Ok(Command::Home));
    }

    #[test]
    fn test_mode() {
        assert_eq!(Command::parse("MODE 1"), Ok(Command::SetMode(Mode::Live)));
        assert_eq!(Command::parse("MODE 2"), Ok(Command::SetMode(Mode::Scan)));
        assert_eq!(Command::parse("MODE 3"), Ok(Command::SetMode(Mode::Manual)));
        assert_eq!(Command::parse("MODE 4"), Err(CommandError::BadArgument));
        assert_eq!(Command::parse("MODE"), Err(CommandError::BadArgument));
    }

    #[test]
    fn test_offset() {
        assert_eq!(
            Command::parse("OFFSET 1.5 -2"),
            Ok(Command::Offset {
                dx_mm: 1.5,
                dy_mm: -2.0
            })
        );
        assert_eq!(Command::parse("OFFSET 1"), Err(CommandError::BadArgument));
        assert_eq!(
            Command::parse("OFFSET a b"),
            Err(CommandError::BadArgument)
        );
    }

    #[test]
    fn test_dec() {
        assert_eq!(Command::parse("DEC PICK"), Ok(Command::Dec(Decision::Pick)));
        assert_eq!(Command::parse("DEC SKIP"), Ok(Command::Dec(Decision::Skip)));
        assert_eq!(Command::parse("DEC MAYBE"), Err(CommandError::BadArgument));
        assert_eq!(Command::parse("DEC"), Err(CommandError::BadArgument));
    }

    #[test]
    fn test_list_tokens() {
        let cmd = Command::parse("LIST P2 P5 P9").unwrap();
        assert_eq!(cmd, Command::List(Vec::from_slice(&[2, 5, 9]).unwrap()));

        // Bare digits also accepted (the vision backend sends both forms)
        let cmd = Command::parse("LIST 1 3").unwrap();
        assert_eq!(cmd, Command::List(Vec::from_slice(&[1, 3]).unwrap()));
    }

    #[test]
    fn test_list_ignores_invalid_tokens() {
        let cmd = Command::parse("LIST P0 P10 X P3 banana P7").unwrap();
        assert_eq!(cmd, Command::List(Vec::from_slice(&[3, 7]).unwrap()));
    }

    #[test]
    fn test_list_empty_is_valid_syntax() {
        assert_eq!(Command::parse("LIST"), Ok(Command::List(Vec::new())));
        assert_eq!(Command::parse("LIST junk"), Ok(Command::List(Vec::new())));
    }

    #[test]
    fn test_list_caps_at_nine() {
        let cmd = Command::parse("LIST 1 2 3 4 5 6 7 8 9 1 2").unwrap();
        match cmd {
            Command::List(points) => assert_eq!(points.len(), 9),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_goto_range() {
        assert_eq!(Command::parse("GOTO P1"), Ok(Command::Goto(1)));
        assert_eq!(Command::parse("GOTO P9"), Ok(Command::Goto(9)));
        assert_eq!(Command::parse("GOTO P0"), Err(CommandError::BadArgument));
        assert_eq!(Command::parse("GOTO P10"), Err(CommandError::BadArgument));
    }

    #[test]
    fn test_dwell_and_direct_moves() {
        assert_eq!(
            Command::parse("D 2.5"),
            Ok(Command::Dwell { seconds: 2.5 })
        );
        assert_eq!(Command::parse("D -1"), Err(CommandError::BadArgument));
        assert_eq!(
            Command::parse("M 120.0 200.0"),
            Ok(Command::MoveTo {
                x_mm: 120.0,
                y_mm: 200.0
            })
        );
        assert_eq!(
            Command::parse("P 360 400"),
            Ok(Command::PickAt {
                x_mm: 360.0,
                y_mm: 400.0
            })
        );
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(Command::parse("FLY"), Err(CommandError::Unknown));
        assert_eq!(Command::parse(""), Err(CommandError::Empty));
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The parser never panics on arbitrary printable input.
            #[test]
            fn parse_never_panics(line in "[ -~]{0,200}") {
                let _ = Command::parse(&line);
            }

            /// Every valid mode number round-trips.
            #[test]
            fn mode_roundtrip(n in 1u8..=3) {
                let mode = Mode::from_number(n).unwrap();
                prop_assert_eq!(mode.number(), n);
            }
        }
    }
}
