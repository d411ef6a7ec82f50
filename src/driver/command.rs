//! Line-oriented directives understood by the session.
//!
//! ```text
//! f: (x, y) -> -x * (y / 2 - 10)
//! r: [10, 20] [-5, 7]
//! p: 10 4
//! s: 42
//! !mutate 10
//! show
//! quit
//! ```

use crate::error::{Error, Result};

/// Generations run by `!mutate` without an explicit count.
pub const DEFAULT_GENERATIONS: usize = 100;

/// A parsed directive.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `f: (x, y) -> expr`
    Function { variables: Vec<String>, body: String },
    /// `r: [lo, hi] [lo, hi] ...`
    Ranges(Vec<(f64, f64)>),
    /// `p: size bits`
    Populate { size: usize, bits: u32 },
    /// `s: seed`
    Seed(u64),
    /// `!mutate [generations]`
    Evolve { generations: usize },
    Show,
    Quit,
}

impl Command {
    /// Parses one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        match line {
            "quit" | "exit" => return Ok(Some(Command::Quit)),
            "show" => return Ok(Some(Command::Show)),
            _ => {}
        }
        if let Some(rest) = line.strip_prefix("!mutate") {
            return parse_evolve(rest).map(Some);
        }

        let (head, args) = line
            .split_once(':')
            .ok_or_else(|| invalid(format!("unrecognized directive '{line}'")))?;
        let args = args.trim();
        let command = match head.trim() {
            "f" => parse_function(args)?,
            "r" => parse_ranges(args)?,
            "p" => parse_populate(args)?,
            "s" => parse_seed(args)?,
            other => return Err(invalid(format!("unknown directive '{other}:'"))),
        };
        Ok(Some(command))
    }
}

fn parse_evolve(rest: &str) -> Result<Command> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(Command::Evolve {
            generations: DEFAULT_GENERATIONS,
        });
    }
    let generations = rest
        .parse::<usize>()
        .map_err(|_| invalid(format!("generation count must be a non-negative integer, got '{rest}'")))?;
    Ok(Command::Evolve { generations })
}

fn parse_function(args: &str) -> Result<Command> {
    let (signature, body) = args
        .split_once("->")
        .ok_or_else(|| invalid("function needs the form '(x, y) -> expr'".to_string()))?;
    let signature = signature.trim();
    let inner = signature
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| invalid(format!("parameter list must be parenthesized, got '{signature}'")))?;
    let variables: Vec<String> = inner
        .split(',')
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if variables.is_empty() {
        return Err(invalid("function needs at least one parameter".to_string()));
    }
    let body = body.trim();
    if body.is_empty() {
        return Err(invalid("function body is empty".to_string()));
    }
    Ok(Command::Function {
        variables,
        body: body.to_string(),
    })
}

fn parse_ranges(args: &str) -> Result<Command> {
    let mut ranges = Vec::new();
    let mut rest = args.trim();
    while !rest.is_empty() {
        let open = rest
            .strip_prefix('[')
            .ok_or_else(|| invalid(format!("expected '[' in ranges, got '{rest}'")))?;
        let (inside, tail) = open
            .split_once(']')
            .ok_or_else(|| invalid("unterminated range, missing ']'".to_string()))?;
        let (lo, hi) = inside
            .split_once(',')
            .ok_or_else(|| invalid(format!("range '[{inside}]' needs two bounds")))?;
        ranges.push((parse_number(lo)?, parse_number(hi)?));
        rest = tail.trim_start();
    }
    if ranges.is_empty() {
        return Err(invalid("at least one range is required".to_string()));
    }
    Ok(Command::Ranges(ranges))
}

fn parse_populate(args: &str) -> Result<Command> {
    let mut parts = args.split_whitespace();
    let (Some(size), Some(bits), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid(format!("population needs '<size> <bits>', got '{args}'")));
    };
    let size = size
        .parse::<usize>()
        .map_err(|_| invalid(format!("population size must be an integer, got '{size}'")))?;
    let bits = bits
        .parse::<u32>()
        .map_err(|_| invalid(format!("bit width must be an integer, got '{bits}'")))?;
    Ok(Command::Populate { size, bits })
}

fn parse_seed(args: &str) -> Result<Command> {
    args.parse::<u64>()
        .map(Command::Seed)
        .map_err(|_| invalid(format!("seed must be a non-negative integer, got '{args}'")))
}

fn parse_number(text: &str) -> Result<f64> {
    let text = text.trim();
    text.parse::<f64>()
        .map_err(|_| invalid(format!("'{text}' is not a number")))
}

fn invalid(msg: String) -> Error {
    Error::Command(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_parse_function() {
        assert_eq!(
            parse("f: (x, y) -> -x * (y / 2 - 10)"),
            Command::Function {
                variables: vec!["x".into(), "y".into()],
                body: "-x * (y / 2 - 10)".into(),
            }
        );
    }

    #[test]
    fn test_parse_function_errors() {
        assert!(Command::parse("f: x, y -> x").is_err());
        assert!(Command::parse("f: (x, y) x + y").is_err());
        assert!(Command::parse("f: () -> 1").is_err());
        assert!(Command::parse("f: (x) -> ").is_err());
    }

    #[test]
    fn test_parse_ranges() {
        assert_eq!(
            parse("r: [10, 20] [-5, 7]"),
            Command::Ranges(vec![(10.0, 20.0), (-5.0, 7.0)])
        );
        assert_eq!(parse("r: [0.5,1.5]"), Command::Ranges(vec![(0.5, 1.5)]));
    }

    #[test]
    fn test_parse_ranges_errors() {
        assert!(Command::parse("r:").is_err());
        assert!(Command::parse("r: [1, 2").is_err());
        assert!(Command::parse("r: [1] [2, 3]").is_err());
        assert!(Command::parse("r: [a, 2]").is_err());
        assert!(Command::parse("r: 1, 2").is_err());
    }

    #[test]
    fn test_parse_populate() {
        assert_eq!(parse("p: 10 4"), Command::Populate { size: 10, bits: 4 });
        assert!(Command::parse("p: 10").is_err());
        assert!(Command::parse("p: 10 4 2").is_err());
        assert!(Command::parse("p: ten 4").is_err());
    }

    #[test]
    fn test_parse_evolve() {
        assert_eq!(parse("!mutate 10"), Command::Evolve { generations: 10 });
        assert_eq!(
            parse("!mutate"),
            Command::Evolve {
                generations: DEFAULT_GENERATIONS
            }
        );
        assert!(Command::parse("!mutate -3").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse("s: 42"), Command::Seed(42));
        assert_eq!(parse("show"), Command::Show);
        assert_eq!(parse("  quit "), Command::Quit);
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("# comment").unwrap(), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(Command::parse("x: 1"), Err(Error::Command(_))));
        assert!(matches!(Command::parse("hello"), Err(Error::Command(_))));
    }
}
