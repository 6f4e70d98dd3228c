//! Energy formula evaluation
//!
//! Equipment energy use is described by a small arithmetic expression over two
//! variables, `power` (watts) and `time` (hours). Formulas are parsed into an
//! expression tree and evaluated directly; nothing outside this grammar is
//! reachable from a formula:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-') factor | number | variable | '(' expr ')'
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::normalize::finite_or;

/// Formula used when an equipment item has none, or when its own fails
pub const DEFAULT_FORMULA: &str = "(power / 1000) * time";

/// Nesting limit for parentheses and unary signs
const MAX_DEPTH: usize = 64;

/// Token limit; bounds the size and depth of the expression tree
const MAX_TOKENS: usize = 256;

/// Formula parse errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("invalid number '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("unknown variable '{name}' at offset {offset} (expected power or time)")]
    UnknownVariable { name: String, offset: usize },

    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("unexpected end of formula")]
    UnexpectedEnd,

    #[error("formula nested too deeply")]
    TooDeep,

    #[error("formula has more than 256 tokens")]
    TooLong,
}

/// The two quantities a formula may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    /// Rated power in watts
    Power,
    /// Usage time in hours
    Time,
}

impl Variable {
    /// Resolve a variable name. The long names are what older workbooks store.
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "power" | "potenciaWatts" => Some(Variable::Power),
            "time" | "tiempoHoras" => Some(Variable::Time),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number { value: f64 },
    Var { var: Variable },
    Neg { param: Box<Expr> },
    Binary { op: BinOp, lhs: Box<Expr>, rhs: Box<Expr> },
}

impl Expr {
    fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    fn eval(&self, power: f64, time: f64) -> f64 {
        match self {
            Expr::Number { value } => *value,
            Expr::Var { var: Variable::Power } => power,
            Expr::Var { var: Variable::Time } => time,
            Expr::Neg { param } => -param.eval(power, time),
            Expr::Binary { op, lhs, rhs } => {
                let l = lhs.eval(power, time);
                let r = rhs.eval(power, time);
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::Ident(name) => write!(f, "'{}'", name),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
        }
    }
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    offset: usize,
}

fn tokenize(src: &str) -> Result<Vec<Spanned>, FormulaError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let token = match bytes[i] {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                // Optional exponent, only consumed when digits follow
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
                let text = &src[start..i];
                let value = text.parse::<f64>().map_err(|_| FormulaError::InvalidNumber {
                    text: text.to_string(),
                    offset: start,
                })?;
                tokens.push(Spanned {
                    token: Token::Number(value),
                    offset: start,
                });
                continue;
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push(Spanned {
                    token: Token::Ident(src[start..i].to_string()),
                    offset: start,
                });
                continue;
            }
            _ => {
                let ch = src[i..].chars().next().unwrap_or('?');
                return Err(FormulaError::UnexpectedChar { ch, offset: i });
            }
        };
        tokens.push(Spanned { token, offset: i });
        i += 1;
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn advance(&mut self) -> Option<&'a Spanned> {
        let spanned = self.tokens.get(self.pos);
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn unexpected(spanned: &Spanned) -> FormulaError {
        FormulaError::UnexpectedToken {
            found: spanned.token.to_string(),
            offset: spanned.offset,
        }
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr, FormulaError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FormulaError::TooDeep);
        }
        let result = self.factor_inner();
        self.depth -= 1;
        result
    }

    fn factor_inner(&mut self) -> Result<Expr, FormulaError> {
        let spanned = self.advance().ok_or(FormulaError::UnexpectedEnd)?;
        match &spanned.token {
            Token::Plus => self.factor(),
            Token::Minus => Ok(Expr::Neg {
                param: Box::new(self.factor()?),
            }),
            Token::Number(value) => Ok(Expr::Number { value: *value }),
            Token::Ident(name) => Variable::from_name(name)
                .map(|var| Expr::Var { var })
                .ok_or_else(|| FormulaError::UnknownVariable {
                    name: name.clone(),
                    offset: spanned.offset,
                }),
            Token::LParen => {
                let inner = self.expr()?;
                match self.advance() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(Self::unexpected(other)),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            _ => Err(Self::unexpected(spanned)),
        }
    }
}

/// A compiled energy formula
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expr: Expr,
}

impl Formula {
    /// Compile a formula
    pub fn parse(src: &str) -> Result<Self, FormulaError> {
        let tokens = tokenize(src)?;
        if tokens.is_empty() {
            return Err(FormulaError::Empty);
        }
        if tokens.len() > MAX_TOKENS {
            return Err(FormulaError::TooLong);
        }

        let mut parser = Parser::new(&tokens);
        let expr = parser.expr()?;
        if let Some(trailing) = parser.advance() {
            return Err(Parser::unexpected(trailing));
        }
        Ok(Self { expr })
    }

    /// `(power / 1000) * time`, i.e. watts and hours to kWh
    pub fn default_kwh() -> Self {
        Self {
            expr: Expr::binary(
                BinOp::Mul,
                Expr::binary(
                    BinOp::Div,
                    Expr::Var {
                        var: Variable::Power,
                    },
                    Expr::Number { value: 1000.0 },
                ),
                Expr::Var { var: Variable::Time },
            ),
        }
    }

    /// Evaluate with the given power (watts) and time (hours)
    pub fn eval(&self, power: f64, time: f64) -> f64 {
        self.expr.eval(power, time)
    }
}

impl FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// kWh used by `power` watts over `time` hours
pub fn default_kwh(power_watts: f64, time_hours: f64) -> f64 {
    (power_watts / 1000.0) * time_hours
}

/// Check a user supplied formula. Blank formulas are valid (the default applies).
pub fn validate_formula(src: &str) -> Result<(), FormulaError> {
    if src.trim().is_empty() {
        return Ok(());
    }
    Formula::parse(src).map(|_| ())
}

/// Energy consumption in kWh for an equipment item
///
/// A missing or blank formula uses [`DEFAULT_FORMULA`]. A formula that fails to
/// compile or evaluates to a non-finite number is logged and replaced by the
/// default, so callers always get a finite value.
pub fn compute_energy(power_watts: f64, time_hours: f64, formula: Option<&str>) -> f64 {
    let power = finite_or(power_watts, 0.0);
    let time = finite_or(time_hours, 0.0);

    let source = formula
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_FORMULA);

    let kwh = match Formula::parse(source) {
        Ok(compiled) => {
            let value = compiled.eval(power, time);
            if value.is_finite() {
                value
            } else {
                tracing::warn!(
                    "Energy formula '{}' gave a non-finite result for power={} time={}, using default",
                    source,
                    power,
                    time
                );
                default_kwh(power, time)
            }
        }
        Err(e) => {
            tracing::warn!("Energy formula '{}' is invalid ({}), using default", source, e);
            default_kwh(power, time)
        }
    };

    finite_or(kwh, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_formula_matches_helper() {
        let parsed = Formula::parse(DEFAULT_FORMULA).unwrap();
        assert_eq!(parsed, Formula::default_kwh());
        assert!(approx(parsed.eval(2000.0, 1.5), 3.0));
        assert!(approx(default_kwh(2000.0, 1.5), 3.0));
    }

    #[test]
    fn test_precedence_and_grouping() {
        let f = Formula::parse("power + time * 2").unwrap();
        assert!(approx(f.eval(10.0, 3.0), 16.0));

        let f = Formula::parse("(power + time) * 2").unwrap();
        assert!(approx(f.eval(10.0, 3.0), 26.0));

        let f = Formula::parse("power - time - 1").unwrap();
        assert!(approx(f.eval(10.0, 3.0), 6.0));

        let f = Formula::parse("power / time / 2").unwrap();
        assert!(approx(f.eval(12.0, 3.0), 2.0));
    }

    #[test]
    fn test_unary_signs_and_literals() {
        let f = Formula::parse("-power * -1 + +2.5e1").unwrap();
        assert!(approx(f.eval(4.0, 0.0), 29.0));

        let f = Formula::parse(".5 * time").unwrap();
        assert!(approx(f.eval(0.0, 3.0), 1.5));
    }

    #[test]
    fn test_legacy_variable_names() {
        let f = Formula::parse("(potenciaWatts / 1000) * tiempoHoras").unwrap();
        assert!(approx(f.eval(1500.0, 2.0), 3.0));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Formula::parse("   "), Err(FormulaError::Empty));
        assert_eq!(Formula::parse("power *"), Err(FormulaError::UnexpectedEnd));
        assert_eq!(Formula::parse("(power"), Err(FormulaError::UnexpectedEnd));
        assert!(matches!(
            Formula::parse("power ^ 2"),
            Err(FormulaError::UnexpectedChar { ch: '^', offset: 6 })
        ));
        assert!(matches!(
            Formula::parse("voltage * time"),
            Err(FormulaError::UnknownVariable { offset: 0, .. })
        ));
        assert!(matches!(
            Formula::parse("power time"),
            Err(FormulaError::UnexpectedToken { offset: 6, .. })
        ));
        assert!(matches!(
            Formula::parse("1.2.3"),
            Err(FormulaError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Formula::parse("alert(1)"),
            Err(FormulaError::UnknownVariable { .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}power{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(Formula::parse(&deep), Err(FormulaError::TooDeep));

        let ok = format!("{}power{}", "(".repeat(10), ")".repeat(10));
        assert!(Formula::parse(&ok).is_ok());
    }

    #[test]
    fn test_long_chain_rejected() {
        let chain = format!("power{}", "+1".repeat(20_000));
        assert_eq!(Formula::parse(&chain), Err(FormulaError::TooLong));
        assert!(validate_formula(&chain).is_err());
        assert!(approx(compute_energy(2000.0, 1.5, Some(&chain)), default_kwh(2000.0, 1.5)));

        let short = format!("power{}", "+1".repeat(100));
        assert!(approx(Formula::parse(&short).unwrap().eval(0.0, 0.0), 100.0));
    }

    #[test]
    fn test_compute_energy_uses_formula() {
        assert!(approx(compute_energy(1000.0, 2.0, Some("power * time / 500")), 4.0));
    }

    #[test]
    fn test_compute_energy_blank_uses_default() {
        assert!(approx(compute_energy(2000.0, 1.5, None), 3.0));
        assert!(approx(compute_energy(2000.0, 1.5, Some("   ")), 3.0));
    }

    #[test]
    fn test_compute_energy_falls_back_on_bad_formula() {
        let expected = default_kwh(2000.0, 1.5);
        assert!(approx(compute_energy(2000.0, 1.5, Some("power ** time")), expected));
        assert!(approx(compute_energy(2000.0, 1.5, Some("Math.max(power)")), expected));
        assert!(approx(compute_energy(2000.0, 1.5, Some("power / 0")), expected));
        assert!(approx(compute_energy(2000.0, 1.5, Some("0 / 0")), expected));
    }

    #[test]
    fn test_compute_energy_normalizes_inputs() {
        assert_eq!(compute_energy(f64::NAN, 2.0, None), 0.0);
        assert_eq!(compute_energy(1000.0, f64::INFINITY, None), 0.0);
    }

    #[test]
    fn test_validate_formula() {
        assert!(validate_formula("").is_ok());
        assert!(validate_formula("power * time").is_ok());
        assert!(validate_formula("power * ").is_err());
    }
}
