//! Formula parser
//!
//! A recursive descent parser for arithmetic formulas with proper operator precedence.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use gridcalc_core::Position;

/// Deepest allowed nesting of parentheses and unary signs
const MAX_NESTING: usize = 256;

/// Deepest allowed syntax tree, counting operator chains as well as nesting
const MAX_DEPTH: usize = 1024;

/// Parse formula source (without the leading `=`) into an AST
///
/// # Example
/// ```rust
/// use gridcalc_formula::parse_expression;
///
/// let ast = parse_expression("1+2*3").unwrap();
/// assert_eq!(ast.to_string(), "1+2*3");
///
/// let ast = parse_expression("(A1 + B2) / 2").unwrap();
/// assert_eq!(ast.to_string(), "(A1+B2)/2");
///
/// assert!(parse_expression("1+").is_err());
/// ```
pub fn parse_expression(expression: &str) -> FormulaResult<FormulaExpr> {
    let mut parser = FormulaParser::new(expression)?;
    if matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::Parse("Empty expression".into()));
    }

    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::Parse(format!(
            "Unexpected {} after expression",
            parser.current_token().describe()
        )));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    CellRef(Position),

    Plus,
    Minus,
    Star,
    Slash,

    LeftParen,
    RightParen,

    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::CellRef(pos) => format!("cell {}", pos),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::LeftParen => "'('".into(),
            Token::RightParen => "')'".into(),
            Token::Eof => "end of input".into(),
        }
    }
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Token,
    /// Open parentheses and unary signs around the current token
    nesting: usize,
    /// Depth of the tree being built at the current token
    depth: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: Token::Eof,
            nesting: 0,
            depth: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if c.is_ascii_uppercase() {
            return self.scan_cell_ref();
        }

        Err(FormulaError::Parse(format!(
            "Unexpected character '{}' at offset {}",
            c, self.pos
        )))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        self.skip_digits();

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            if !self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                return Err(FormulaError::Parse(format!(
                    "Malformed exponent in '{}'",
                    &self.input[start..self.pos]
                )));
            }
            self.skip_digits();
        }

        let num_str = &self.input[start..self.pos];
        let num: f64 = num_str
            .parse()
            .map_err(|_| FormulaError::Parse(format!("Invalid number '{}'", num_str)))?;
        if !num.is_finite() {
            return Err(FormulaError::Parse(format!("Number out of range '{}'", num_str)));
        }
        Ok(Token::Number(num))
    }

    fn scan_cell_ref(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        while self.peek_char().map_or(false, |c| c.is_ascii_uppercase()) {
            self.advance();
        }
        self.skip_digits();

        // A reference runs into the next operator, parenthesis or whitespace
        if self.peek_char().map_or(false, |c| c.is_ascii_alphanumeric() || c == '_') {
            while self.peek_char().map_or(false, |c| c.is_ascii_alphanumeric() || c == '_') {
                self.advance();
            }
            return Err(FormulaError::Parse(format!(
                "Unknown identifier '{}'",
                &self.input[start..self.pos]
            )));
        }

        let text = &self.input[start..self.pos];
        let pos = Position::parse(text).map_err(|e| {
            FormulaError::Parse(format!("Invalid cell reference '{}': {}", text, e))
        })?;
        Ok(Token::CellRef(pos))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {}, got {}",
                expected.describe(),
                self.current_token().describe()
            )))
        }
    }

    /// Go one tree level deeper, failing once the tree would grow too deep
    fn descend(&mut self, nested: bool) -> FormulaResult<()> {
        self.depth += 1;
        if nested {
            self.nesting += 1;
        }
        if self.depth > MAX_DEPTH || self.nesting > MAX_NESTING {
            return Err(FormulaError::Parse("Expression nested too deeply".into()));
        }
        Ok(())
    }

    fn ascend(&mut self, levels: usize, nested: bool) {
        self.depth -= levels;
        if nested {
            self.nesting -= levels;
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: +, -
    // 4. Primary: numbers, references, parentheses

    fn parse_expression(&mut self) -> FormulaResult<FormulaExpr> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_multiplicative()?;
        let mut chain = 0;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            self.descend(false)?;
            chain += 1;
            let right = self.parse_multiplicative()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.ascend(chain, false);
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_unary()?;
        let mut chain = 0;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            self.descend(false)?;
            chain += 1;
            let right = self.parse_unary()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        self.ascend(chain, false);
        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<FormulaExpr> {
        let op = match self.current_token() {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };

        self.consume()?;
        self.descend(true)?;
        let operand = self.parse_unary()?;
        self.ascend(1, true);
        Ok(FormulaExpr::UnaryOp {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> FormulaResult<FormulaExpr> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok(FormulaExpr::Number(n))
            }

            Token::CellRef(pos) => {
                self.consume()?;
                Ok(FormulaExpr::CellRef(pos))
            }

            Token::LeftParen => {
                self.consume()?;
                self.descend(true)?;
                let expr = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                self.ascend(1, true);
                Ok(expr)
            }

            other => Err(FormulaError::Parse(format!(
                "Unexpected {}",
                other.describe()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_expression("42").unwrap(), FormulaExpr::Number(42.0));
        assert_eq!(parse_expression("3.25").unwrap(), FormulaExpr::Number(3.25));
        assert_eq!(parse_expression(".5").unwrap(), FormulaExpr::Number(0.5));
        assert_eq!(parse_expression("1e10").unwrap(), FormulaExpr::Number(1e10));
        assert_eq!(parse_expression("2E-3").unwrap(), FormulaExpr::Number(2e-3));
    }

    #[test]
    fn test_parse_arithmetic_precedence() {
        let ast = parse_expression("1+2*3").unwrap();
        // Should parse as 1+(2*3) due to precedence
        if let FormulaExpr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Add);
            assert_eq!(*left, FormulaExpr::Number(1.0));
            assert!(matches!(
                *right,
                FormulaExpr::BinaryOp {
                    op: BinaryOperator::Multiply,
                    ..
                }
            ));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_left_associative() {
        let ast = parse_expression("8-4-2").unwrap();
        if let FormulaExpr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Subtract);
            assert!(matches!(
                *left,
                FormulaExpr::BinaryOp {
                    op: BinaryOperator::Subtract,
                    ..
                }
            ));
            assert_eq!(*right, FormulaExpr::Number(2.0));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_unary() {
        let ast = parse_expression("-5").unwrap();
        assert!(matches!(
            ast,
            FormulaExpr::UnaryOp {
                op: UnaryOperator::Negate,
                ..
            }
        ));

        let ast = parse_expression("--+5").unwrap();
        assert_eq!(ast.to_string(), "--+5");
    }

    #[test]
    fn test_parse_cell_reference() {
        assert_eq!(
            parse_expression("B2").unwrap(),
            FormulaExpr::CellRef(Position::new(1, 1))
        );
        assert_eq!(
            parse_expression("  ZZ100 ").unwrap(),
            FormulaExpr::CellRef(Position::new(99, 701))
        );
    }

    #[test]
    fn test_parse_parentheses() {
        let ast = parse_expression("(1+2)*3").unwrap();
        if let FormulaExpr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Multiply);
            assert!(matches!(
                *left,
                FormulaExpr::BinaryOp {
                    op: BinaryOperator::Add,
                    ..
                }
            ));
            assert_eq!(*right, FormulaExpr::Number(3.0));
        } else {
            panic!("Expected BinaryOp");
        }

        assert_eq!(parse_expression("((A1))").unwrap().to_string(), "A1");
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse_expression(&nested(MAX_NESTING)).is_ok());
        assert_eq!(
            parse_expression(&nested(MAX_NESTING + 1)).unwrap_err(),
            FormulaError::Parse("Expression nested too deeply".into())
        );
        assert!(parse_expression(&nested(20_000)).is_err());

        let signs = format!("{}1", "-".repeat(20_000));
        assert_eq!(
            parse_expression(&signs).unwrap_err(),
            FormulaError::Parse("Expression nested too deeply".into())
        );
    }

    #[test]
    fn test_operator_chain_limit() {
        let chain = |terms: usize| vec!["A1"; terms].join("+");
        assert!(parse_expression(&chain(300)).is_ok());
        assert!(parse_expression(&chain(MAX_DEPTH + 1)).is_ok());
        assert_eq!(
            parse_expression(&chain(MAX_DEPTH + 2)).unwrap_err(),
            FormulaError::Parse("Expression nested too deeply".into())
        );
        assert!(parse_expression(&chain(50_000)).is_err());
    }

    #[test]
    fn test_parse_errors() {
        for source in [
            "", "   ", "1+", "*2", "(1+2", "1+2)", "1 2", "A1B2", "a1", "A0", "ABCD1",
            "SUM(A1)", "1e", "1.2.3", "#REF!", "A1:B2", "1^2", "\"text\"",
        ] {
            assert!(
                matches!(parse_expression(source), Err(FormulaError::Parse(_))),
                "{source:?} should not parse"
            );
        }
    }
}
