//! Restricted arithmetic evaluator
//!
//! Accepts only numeric literals, `+ - * /` and parentheses, evaluated with
//! the usual precedence by recursive descent. Anything else is rejected, so
//! there is no way to reach a general expression interpreter from user input.
//!
//! Grammar:
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := ('+' | '-')* atom
//! atom   := number | '(' expr ')'
//! ```
//!
//! Parentheses nest at most [`MAX_DEPTH`] deep.

use thiserror::Error;

/// Deepest parenthesis nesting accepted
pub const MAX_DEPTH: usize = 64;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArithmeticError {
    #[error("expression is empty")]
    Empty,

    #[error("two operands with no operator between them at offset {0}")]
    MissingOperator(usize),

    #[error("unexpected token {0:?} at offset {1}")]
    UnexpectedToken(String, usize),

    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("expression ended unexpectedly")]
    UnexpectedEnd,

    #[error("result is not a finite number")]
    NonFinite,

    #[error("parentheses nested deeper than {MAX_DEPTH}")]
    TooDeep,
}

impl ArithmeticError {
    /// Whether the input never formed an expression in the first place
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ArithmeticError::Empty | ArithmeticError::MissingOperator(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ArithmeticError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ArithmeticError::UnexpectedToken(literal.clone(), offset))?;
                tokens.push((Token::Number(value), offset));
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => return Err(ArithmeticError::UnexpectedToken(other.to_string(), offset)),
        };
        tokens.push((token, offset));
        chars.next();
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<f64, ArithmeticError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.advance();
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, ArithmeticError> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.advance();
            let rhs = self.unary()?;
            value = if op == Token::Star { value * rhs } else { value / rhs };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, ArithmeticError> {
        let mut negate = false;
        while let Some(sign @ (Token::Plus | Token::Minus)) = self.peek() {
            self.advance();
            negate ^= sign == Token::Minus;
        }
        let value = self.atom()?;
        Ok(if negate { -value } else { value })
    }

    fn atom(&mut self) -> Result<f64, ArithmeticError> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                if self.depth == MAX_DEPTH {
                    return Err(ArithmeticError::TooDeep);
                }
                self.depth += 1;
                let value = self.expr()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    None => Err(ArithmeticError::UnbalancedParentheses),
                    Some(other) => Err(self.unexpected(other, self.pos - 1)),
                }
            }
            Some(Token::RParen) => Err(ArithmeticError::UnbalancedParentheses),
            Some(other) => Err(self.unexpected(other, offset)),
            None => Err(ArithmeticError::UnexpectedEnd),
        }
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map(|(_, o)| *o).unwrap_or_default()
    }

    fn unexpected(&self, token: Token, index: usize) -> ArithmeticError {
        let offset = self.tokens.get(index).map(|(_, o)| *o).unwrap_or_default();
        let text = match token {
            Token::Number(n) => n.to_string(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
        };
        ArithmeticError::UnexpectedToken(text, offset)
    }
}

/// Evaluate an arithmetic expression over `f64`
///
/// Division by zero and overflow are reported as [`ArithmeticError::NonFinite`]
/// rather than surfacing infinities or NaN.
pub fn evaluate(input: &str) -> Result<f64, ArithmeticError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ArithmeticError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;

    if let Some((token, offset)) = parser.tokens.get(parser.pos).copied() {
        return Err(match token {
            Token::Number(_) | Token::LParen => ArithmeticError::MissingOperator(offset),
            Token::RParen => ArithmeticError::UnbalancedParentheses,
            other => parser.unexpected(other, parser.pos),
        });
    }

    if !value.is_finite() {
        return Err(ArithmeticError::NonFinite);
    }

    // Avoid printing "-0"
    Ok(if value == 0.0 { 0.0 } else { value })
}
