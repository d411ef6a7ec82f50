//! Infix expression compiler for objective functions.
//!
//! Compiles a formula over named variables into a tree that is evaluated
//! with positional arguments. Supported syntax:
//!
//! - numbers (`3`, `0.5`, `1e-3`), the constants `pi` and `e`
//! - `+ - * /`, exponentiation with `^` or `**` (right-associative),
//!   unary `-` and `+`, parentheses
//! - unary functions `sin cos tan exp ln log sqrt abs` (`log` is natural)
//!
//! Unary minus binds looser than exponentiation: `-x^2` is `-(x^2)`.

use crate::ga::CostFunction;
use std::fmt;

/// Compile error with the byte offset it was detected at.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("expected {expected} at {pos}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: String,
        pos: usize,
    },

    #[error("invalid number '{text}' at {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("unknown variable '{name}' at {pos}")]
    UnknownVariable { name: String, pos: usize },

    #[error("unknown function '{name}' at {pos}")]
    UnknownFunction { name: String, pos: usize },

    #[error("invalid variable name '{0}'")]
    InvalidVariable(String),

    #[error("variable '{0}' is declared twice")]
    DuplicateVariable(String),

    #[error("expression nests deeper than {limit} levels at {pos}")]
    TooDeep { limit: usize, pos: usize },

    #[error("expression has {tokens} tokens, more than {limit}")]
    TooLong { tokens: usize, limit: usize },
}

/// Deepest nesting of parentheses, signs and exponents accepted.
pub const MAX_NESTING: usize = 128;

/// Longest token stream accepted; bounds the depth of operator chains.
pub const MAX_TOKENS: usize = 4096;

/// A compiled objective.
///
/// ```
/// use u_bitga::driver::Expression;
///
/// let f = Expression::compile(&["x", "y"], "-x * (y / 2 - 10)").unwrap();
/// assert_eq!(f.eval(&[10.0, 7.0]), 65.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    variables: Vec<String>,
    root: Node,
}

impl Expression {
    /// Compiles `source`; `variables` fixes the positional binding.
    pub fn compile<S: AsRef<str>>(variables: &[S], source: &str) -> Result<Self, ExprError> {
        let variables: Vec<String> = variables.iter().map(|v| v.as_ref().to_string()).collect();
        for (i, name) in variables.iter().enumerate() {
            if !is_identifier(name) || is_reserved(name) {
                return Err(ExprError::InvalidVariable(name.clone()));
            }
            if variables[..i].contains(name) {
                return Err(ExprError::DuplicateVariable(name.clone()));
            }
        }

        let tokens = tokenize(source)?;
        if tokens.len() > MAX_TOKENS {
            return Err(ExprError::TooLong {
                tokens: tokens.len(),
                limit: MAX_TOKENS,
            });
        }
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            depth: 0,
            variables: &variables,
        };
        let root = parser.expr()?;
        parser.expect(&Token::End, "end of expression")?;

        Ok(Self {
            source: source.trim().to_string(),
            variables,
            root,
        })
    }

    /// Evaluates with `values[i]` bound to the `i`-th declared variable.
    /// Missing values evaluate as NaN.
    pub fn eval(&self, values: &[f64]) -> f64 {
        self.root.eval(values)
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn arity(&self) -> usize {
        self.variables.len()
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl CostFunction for Expression {
    fn cost(&self, phenotype: &[f64]) -> f64 {
        self.eval(phenotype)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ============================================================================
// Tree
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Sqrt,
    Abs,
}

impl Func {
    fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "exp" => Func::Exp,
            "ln" | "log" => Func::Ln,
            "sqrt" => Func::Sqrt,
            "abs" => Func::Abs,
            _ => return None,
        })
    }

    fn apply(self, x: f64) -> f64 {
        match self {
            Func::Sin => x.sin(),
            Func::Cos => x.cos(),
            Func::Tan => x.tan(),
            Func::Exp => x.exp(),
            Func::Ln => x.ln(),
            Func::Sqrt => x.sqrt(),
            Func::Abs => x.abs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Const(f64),
    Var(usize),
    Neg(Box<Node>),
    Binary(BinOp, Box<Node>, Box<Node>),
    Call(Func, Box<Node>),
}

impl Node {
    fn eval(&self, values: &[f64]) -> f64 {
        match self {
            Node::Const(c) => *c,
            Node::Var(i) => values.get(*i).copied().unwrap_or(f64::NAN),
            Node::Neg(inner) => -inner.eval(values),
            Node::Binary(op, lhs, rhs) => {
                let (a, b) = (lhs.eval(values), rhs.eval(values));
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                    BinOp::Pow => a.powf(b),
                }
            }
            Node::Call(func, arg) => func.apply(arg.eval(values)),
        }
    }
}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    End,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {n}"),
            Token::Ident(name) => write!(f, "'{name}'"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Caret => f.write_str("'^'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::End => f.write_str("end of expression"),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ExprError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let token = match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 1;
                Token::Caret
            }
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'^' => Token::Caret,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'0'..=b'9' | b'.' => {
                i = scan_number(bytes, i);
                let text = &source[start..i];
                let value = text.parse::<f64>().map_err(|_| ExprError::InvalidNumber {
                    text: text.to_string(),
                    pos: start,
                })?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            c if c == b'_' || c.is_ascii_alphabetic() => {
                while i < bytes.len() && (bytes[i] == b'_' || bytes[i].is_ascii_alphanumeric()) {
                    i += 1;
                }
                tokens.push((Token::Ident(source[start..i].to_string()), start));
                continue;
            }
            _ => {
                let ch = source[i..].chars().next().unwrap_or('?');
                return Err(ExprError::UnexpectedChar { ch, pos: i });
            }
        };
        tokens.push((token, start));
        i += 1;
    }

    tokens.push((Token::End, source.len()));
    Ok(tokens)
}

/// End of a numeric literal starting at `i`, exponent included.
fn scan_number(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn is_reserved(name: &str) -> bool {
    matches!(name, "pi" | "e") || Func::lookup(name).is_some()
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    tokens: &'a [(Token, usize)],
    pos: usize,
    depth: usize,
    variables: &'a [String],
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].1
    }

    fn advance(&mut self) -> (Token, usize) {
        let (token, at) = self.tokens[self.pos].clone();
        if token != Token::End {
            self.pos += 1;
        }
        (token, at)
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> Result<(), ExprError> {
        if self.peek() == token {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> ExprError {
        ExprError::Unexpected {
            expected,
            found: self.peek().to_string(),
            pos: self.offset(),
        }
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<Node, ExprError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.term()?;
            lhs = Node::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    // term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<Node, ExprError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = Node::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    // Every nested construct re-enters through here.
    fn unary(&mut self) -> Result<Node, ExprError> {
        if self.depth >= MAX_NESTING {
            return Err(ExprError::TooDeep {
                limit: MAX_NESTING,
                pos: self.offset(),
            });
        }
        self.depth += 1;
        let node = self.signed();
        self.depth -= 1;
        node
    }

    // unary := ('-' | '+') unary | power
    fn signed(&mut self) -> Result<Node, ExprError> {
        match self.peek() {
            Token::Minus => {
                self.advance();
                Ok(Node::Neg(Box::new(self.unary()?)))
            }
            Token::Plus => {
                self.advance();
                self.unary()
            }
            _ => self.power(),
        }
    }

    // power := primary ('^' unary)?
    fn power(&mut self) -> Result<Node, ExprError> {
        let base = self.primary()?;
        if *self.peek() == Token::Caret {
            self.advance();
            let exponent = self.unary()?;
            return Ok(Node::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    // primary := number | ident | ident '(' expr ')' | '(' expr ')'
    fn primary(&mut self) -> Result<Node, ExprError> {
        let (token, at) = self.advance();
        match token {
            Token::Number(n) => Ok(Node::Const(n)),
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::Ident(name) if *self.peek() == Token::LParen => {
                let func = Func::lookup(&name)
                    .ok_or(ExprError::UnknownFunction { name, pos: at })?;
                self.advance();
                let arg = self.expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(Node::Call(func, Box::new(arg)))
            }
            Token::Ident(name) => {
                if let Some(i) = self.variables.iter().position(|v| *v == name) {
                    return Ok(Node::Var(i));
                }
                match name.as_str() {
                    "pi" => Ok(Node::Const(std::f64::consts::PI)),
                    "e" => Ok(Node::Const(std::f64::consts::E)),
                    _ => Err(ExprError::UnknownVariable { name, pos: at }),
                }
            }
            other => Err(ExprError::Unexpected {
                expected: "a number, variable, function or '('",
                found: other.to_string(),
                pos: at,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(source: &str, values: &[f64]) -> f64 {
        Expression::compile(&["x", "y"], source).unwrap().eval(values)
    }

    #[test]
    fn test_reference_objective() {
        let f = Expression::compile(&["x", "y"], "-x * (y / 2 - 10)").unwrap();
        assert_eq!(f.eval(&[10.0, 7.0]), 65.0);
        assert_eq!(f.eval(&[20.0, -5.0]), 250.0);
        assert_eq!(f.cost(&[10.0, 7.0]), 65.0);
        assert_eq!(f.arity(), 2);
        assert_eq!(f.to_string(), "-x * (y / 2 - 10)");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1 + 2 * 3", &[]), 7.0);
        assert_eq!(eval("(1 + 2) * 3", &[]), 9.0);
        assert_eq!(eval("8 / 4 / 2", &[]), 1.0);
        assert_eq!(eval("10 - 4 - 3", &[]), 3.0);
        assert_eq!(eval("2 ^ 3 ^ 2", &[]), 512.0);
        assert_eq!(eval("2 ** 3", &[]), 8.0);
        assert_eq!(eval("-x^2", &[3.0, 0.0]), -9.0);
        assert_eq!(eval("2^-1", &[]), 0.5);
        assert_eq!(eval("x * -y", &[2.0, 3.0]), -6.0);
        assert_eq!(eval("+x", &[4.0, 0.0]), 4.0);
    }

    #[test]
    fn test_functions_and_constants() {
        assert!((eval("sin(pi / 2)", &[]) - 1.0).abs() < 1e-12);
        assert!((eval("ln(e)", &[]) - 1.0).abs() < 1e-12);
        assert!((eval("log(exp(2))", &[]) - 2.0).abs() < 1e-12);
        assert_eq!(eval("sqrt(x) + abs(y)", &[16.0, -3.0]), 7.0);
        assert!((eval("cos(0) + tan(0)", &[]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(eval("1.5e2", &[]), 150.0);
        assert_eq!(eval("2E-1", &[]), 0.2);
        assert_eq!(eval(".5", &[]), 0.5);
        assert!(matches!(
            Expression::compile(&["x"], "1.2.3"),
            Err(ExprError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_variable_binding_is_positional() {
        let f = Expression::compile(&["b", "a"], "a - b").unwrap();
        assert_eq!(f.eval(&[1.0, 10.0]), 9.0);
        assert!(f.eval(&[1.0]).is_nan());
    }

    #[test]
    fn test_unknown_variable() {
        let err = Expression::compile(&["x", "y"], "x + z").unwrap_err();
        assert_eq!(
            err,
            ExprError::UnknownVariable {
                name: "z".into(),
                pos: 4
            }
        );
    }

    #[test]
    fn test_unknown_function() {
        let err = Expression::compile(&["x"], "foo(x)").unwrap_err();
        assert!(matches!(err, ExprError::UnknownFunction { pos: 0, .. }));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            Expression::compile(&["x"], "x +"),
            Err(ExprError::Unexpected { pos: 3, .. })
        ));
        assert!(matches!(
            Expression::compile(&["x"], "(x + 1"),
            Err(ExprError::Unexpected { .. })
        ));
        assert!(matches!(
            Expression::compile(&["x"], "x 1"),
            Err(ExprError::Unexpected { .. })
        ));
        assert!(matches!(
            Expression::compile(&["x"], "x $ 1"),
            Err(ExprError::UnexpectedChar { ch: '$', pos: 2 })
        ));
        assert!(Expression::compile(&["x"], "").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep_parens = format!("{}x{}", "(".repeat(50_000), ")".repeat(50_000));
        assert!(matches!(
            Expression::compile(&["x"], &deep_parens),
            Err(ExprError::TooDeep { .. }) | Err(ExprError::TooLong { .. })
        ));

        let deep_signs = format!("{}x", "-".repeat(50_000));
        assert!(matches!(
            Expression::compile(&["x"], &deep_signs),
            Err(ExprError::TooDeep { .. }) | Err(ExprError::TooLong { .. })
        ));

        // Under the token limit, nesting alone trips the depth check.
        let nested = format!("{}x{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(
            Expression::compile(&["x"], &nested),
            Err(ExprError::TooDeep {
                limit: MAX_NESTING,
                pos: MAX_NESTING
            })
        );

        let shallow = format!("{}x{}", "(".repeat(MAX_NESTING - 2), ")".repeat(MAX_NESTING - 2));
        assert_eq!(Expression::compile(&["x"], &shallow).unwrap().eval(&[3.0]), 3.0);
    }

    #[test]
    fn test_token_limit() {
        let chain = vec!["x"; MAX_TOKENS].join("+");
        assert!(matches!(
            Expression::compile(&["x"], &chain),
            Err(ExprError::TooLong { limit: MAX_TOKENS, .. })
        ));
        let chain = vec!["x"; 1000].join("+");
        assert_eq!(Expression::compile(&["x"], &chain).unwrap().eval(&[1.0]), 1000.0);
    }

    #[test]
    fn test_invalid_variable_declarations() {
        assert_eq!(
            Expression::compile(&["x", "x"], "x"),
            Err(ExprError::DuplicateVariable("x".into()))
        );
        assert!(matches!(
            Expression::compile(&["1x"], "1"),
            Err(ExprError::InvalidVariable(_))
        ));
        assert!(matches!(
            Expression::compile(&["sin"], "1"),
            Err(ExprError::InvalidVariable(_))
        ));
    }
}
