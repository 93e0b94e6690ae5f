//! Expression language for script mappings.
//!
//! A script is a single arithmetic expression over the bound variables
//! `value`, `value_min` and `value_max`:
//!
//! ```text
//! return this.linear(value, this.value_min, this.value_max);
//! ```
//!
//! A leading `return`, a trailing `;`, and `this.` / `Math.` prefixes are
//! accepted so scripts written for the browser version keep working.

use crate::error::ScriptError;

/// Variables a script can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Var {
    Value,
    ValueMin,
    ValueMax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Linear,
    Abs,
    Log,
    Log10,
    Exp,
    Sqrt,
    Pow,
    Min,
    Max,
    Clamp,
}

impl Function {
    fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "linear" => Function::Linear,
            "abs" => Function::Abs,
            "log" => Function::Log,
            "log10" => Function::Log10,
            "exp" => Function::Exp,
            "sqrt" => Function::Sqrt,
            "pow" => Function::Pow,
            "min" => Function::Min,
            "max" => Function::Max,
            "clamp" => Function::Clamp,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Linear => "linear",
            Function::Abs => "abs",
            Function::Log => "log",
            Function::Log10 => "log10",
            Function::Exp => "exp",
            Function::Sqrt => "sqrt",
            Function::Pow => "pow",
            Function::Min => "min",
            Function::Max => "max",
            Function::Clamp => "clamp",
        }
    }

    fn arity(self) -> usize {
        match self {
            Function::Abs | Function::Log | Function::Log10 | Function::Exp | Function::Sqrt => 1,
            Function::Pow | Function::Min | Function::Max => 2,
            Function::Linear | Function::Clamp => 3,
        }
    }

    fn call(self, args: &[f64]) -> f64 {
        match self {
            Function::Linear => {
                let span = args[2] - args[1];
                if span == 0.0 {
                    0.0
                } else {
                    (args[0] - args[1]) / span
                }
            }
            Function::Abs => args[0].abs(),
            Function::Log => args[0].ln(),
            Function::Log10 => args[0].log10(),
            Function::Exp => args[0].exp(),
            Function::Sqrt => args[0].sqrt(),
            Function::Pow => args[0].powf(args[1]),
            Function::Min => args[0].min(args[1]),
            Function::Max => args[0].max(args[1]),
            Function::Clamp => args[0].max(args[1]).min(args[2]),
        }
    }
}

/// Compiled script expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Var(Var),
    Neg(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Function, Vec<Expr>),
}

/// Values bound to the script variables for one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Bindings {
    pub value: f64,
    pub value_min: f64,
    pub value_max: f64,
}

impl Expr {
    /// Compile script source into an expression tree.
    pub fn parse(source: &str) -> Result<Expr, ScriptError> {
        let tokens = tokenize(source)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };

        if matches!(parser.peek(), Some(Token::Ident(name)) if name == "return") {
            parser.pos += 1;
        }
        let expr = parser.expr()?;
        while parser.eat(&Token::Semicolon) {}
        match parser.next() {
            None => Ok(expr),
            Some((token, pos)) => Err(ScriptError::UnexpectedToken {
                found: token.to_string(),
                pos,
            }),
        }
    }

    pub fn eval(&self, bindings: &Bindings) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Var(Var::Value) => bindings.value,
            Expr::Var(Var::ValueMin) => bindings.value_min,
            Expr::Var(Var::ValueMax) => bindings.value_max,
            Expr::Neg(inner) => -inner.eval(bindings),
            Expr::Binary(op, lhs, rhs) => {
                let (a, b) = (lhs.eval(bindings), rhs.eval(bindings));
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Pow => a.powf(b),
                }
            }
            Expr::Call(function, args) => {
                let values: Vec<f64> = args.iter().map(|a| a.eval(bindings)).collect();
                function.call(&values)
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
    Caret,
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Ident(name) => f.write_str(name),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::Caret => f.write_str("^"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
            Token::Dot => f.write_str("."),
            Token::Semicolon => f.write_str(";"),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ScriptError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        if ch.is_ascii_digit() || (ch == '.' && next_is_digit(source, pos)) {
            let mut end = pos;
            let mut prev = ch;
            while let Some(&(i, c)) = chars.peek() {
                let exponent_sign = (c == '+' || c == '-') && (prev == 'e' || prev == 'E');
                if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || exponent_sign {
                    end = i + c.len_utf8();
                    prev = c;
                    chars.next();
                } else {
                    break;
                }
            }
            let text = &source[pos..end];
            let number = text
                .parse::<f64>()
                .map_err(|_| ScriptError::InvalidNumber(text.to_string()))?;
            tokens.push((Token::Number(number), pos));
            continue;
        }
        if ch.is_alphabetic() || ch == '_' {
            let mut end = pos;
            while let Some(&(i, c)) = chars.peek() {
                if c.is_alphanumeric() || c == '_' {
                    end = i + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push((Token::Ident(source[pos..end].to_string()), pos));
            continue;
        }

        let token = match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            '.' => Token::Dot,
            ';' => Token::Semicolon,
            _ => return Err(ScriptError::UnexpectedChar { ch, pos }),
        };
        tokens.push((token, pos));
        chars.next();
    }

    Ok(tokens)
}

fn next_is_digit(source: &str, pos: usize) -> bool {
    source[pos + 1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
}

/// Nesting limit for signs, parentheses and call arguments.
const MAX_DEPTH: usize = 128;

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let item = self.tokens.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> Result<(), ScriptError> {
        match self.next() {
            Some((found, _)) if &found == token => Ok(()),
            Some((found, pos)) => Err(ScriptError::UnexpectedToken {
                found: found.to_string(),
                pos,
            }),
            None => Err(ScriptError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn term(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    // every nested sub-expression passes through here
    fn unary(&mut self) -> Result<Expr, ScriptError> {
        if self.depth >= MAX_DEPTH {
            return Err(ScriptError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let expr = self.signed();
        self.depth -= 1;
        expr
    }

    fn signed(&mut self) -> Result<Expr, ScriptError> {
        if self.eat(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        if self.eat(&Token::Plus) {
            return self.unary();
        }
        self.power()
    }

    // right associative: a ^ b ^ c == a ^ (b ^ c)
    fn power(&mut self) -> Result<Expr, ScriptError> {
        let base = self.primary()?;
        if self.eat(&Token::Caret) {
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, ScriptError> {
        match self.next() {
            Some((Token::Number(n), _)) => Ok(Expr::Number(n)),
            Some((Token::LParen, _)) => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some((Token::Ident(name), _)) => self.identifier(name),
            Some((token, pos)) => Err(ScriptError::UnexpectedToken {
                found: token.to_string(),
                pos,
            }),
            None => Err(ScriptError::UnexpectedEnd),
        }
    }

    fn identifier(&mut self, mut name: String) -> Result<Expr, ScriptError> {
        if (name == "this" || name == "Math") && self.eat(&Token::Dot) {
            name = match self.next() {
                Some((Token::Ident(member), _)) => member,
                Some((token, pos)) => {
                    return Err(ScriptError::UnexpectedToken {
                        found: token.to_string(),
                        pos,
                    });
                }
                None => return Err(ScriptError::UnexpectedEnd),
            };
        }

        if self.eat(&Token::LParen) {
            let function =
                Function::lookup(&name).ok_or_else(|| ScriptError::UnknownFunction(name.clone()))?;
            let mut args = Vec::new();
            if !self.eat(&Token::RParen) {
                loop {
                    args.push(self.expr()?);
                    if self.eat(&Token::RParen) {
                        break;
                    }
                    self.expect(&Token::Comma)?;
                }
            }
            if args.len() != function.arity() {
                return Err(ScriptError::Arity {
                    function: function.name(),
                    expected: function.arity(),
                    found: args.len(),
                });
            }
            return Ok(Expr::Call(function, args));
        }

        match name.as_str() {
            "value" => Ok(Expr::Var(Var::Value)),
            "value_min" => Ok(Expr::Var(Var::ValueMin)),
            "value_max" => Ok(Expr::Var(Var::ValueMax)),
            "PI" => Ok(Expr::Number(std::f64::consts::PI)),
            "E" => Ok(Expr::Number(std::f64::consts::E)),
            _ => Err(ScriptError::UnknownIdentifier(name)),
        }
    }
}
