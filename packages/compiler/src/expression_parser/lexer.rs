/**
 * Expression Lexer
 *
 * Tokenizes binding expressions, actions and template microsyntax into
 * tokens for the parser.
 */

use crate::chars;
use crate::error::{CompilerError, Result};

/// Token types in binding expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Character,
    Identifier,
    Keyword,
    String,
    Operator,
    Number,
}

/// Token representation
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub index: usize,
    pub end: usize,
    pub token_type: TokenType,
    pub num_value: f64,
    pub str_value: String,
}

impl Token {
    pub fn new(index: usize, end: usize, token_type: TokenType, num_value: f64, str_value: String) -> Self {
        Token {
            index,
            end,
            token_type,
            num_value,
            str_value,
        }
    }

    pub fn is_character(&self, code: char) -> bool {
        self.token_type == TokenType::Character && self.str_value.starts_with(code)
    }

    pub fn is_number(&self) -> bool {
        self.token_type == TokenType::Number
    }

    pub fn is_string(&self) -> bool {
        self.token_type == TokenType::String
    }

    pub fn is_identifier(&self) -> bool {
        self.token_type == TokenType::Identifier
    }

    pub fn is_keyword(&self) -> bool {
        self.token_type == TokenType::Keyword
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.token_type == TokenType::Operator && self.str_value == operator
    }

    pub fn is_keyword_named(&self, keyword: &str) -> bool {
        self.token_type == TokenType::Keyword && self.str_value == keyword
    }
}

const KEYWORDS: &[&str] = &[
    "var", "let", "null", "undefined", "true", "false", "if", "else", "this",
];

/// Expression lexer
#[derive(Debug, Default)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Lexer
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let mut scanner = Scanner::new(text);
        let mut tokens = Vec::new();
        while let Some(token) = scanner.scan_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

/// Scanner over the characters of one expression. Offsets in tokens are
/// character offsets into the input.
struct Scanner {
    input: Vec<char>,
    index: usize,
    peek: char,
}

impl Scanner {
    fn new(input: &str) -> Self {
        let input: Vec<char> = input.chars().collect();
        let peek = input.first().copied().unwrap_or(chars::EOF);
        Scanner {
            input,
            index: 0,
            peek,
        }
    }

    fn advance(&mut self) {
        self.index += 1;
        self.peek = self.input.get(self.index).copied().unwrap_or(chars::EOF);
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.input[start..end].iter().collect()
    }

    fn scan_token(&mut self) -> Result<Option<Token>> {
        while self.index < self.input.len() && chars::is_whitespace(self.peek) {
            self.advance();
        }
        if self.index >= self.input.len() {
            return Ok(None);
        }

        let start = self.index;
        let ch = self.peek;

        if chars::is_identifier_start(ch) {
            return Ok(Some(self.scan_identifier()));
        }
        if chars::is_digit(ch) {
            return self.scan_number(start).map(Some);
        }

        let token = match ch {
            chars::PERIOD => {
                self.advance();
                if chars::is_digit(self.peek) {
                    return self.scan_number(start).map(Some);
                }
                self.character_token(start, chars::PERIOD)
            }
            chars::LPAREN
            | chars::RPAREN
            | chars::LBRACE
            | chars::RBRACE
            | chars::LBRACKET
            | chars::RBRACKET
            | chars::COMMA
            | chars::COLON
            | chars::SEMICOLON => {
                self.advance();
                self.character_token(start, ch)
            }
            chars::SQ | chars::DQ => return self.scan_string().map(Some),
            chars::HASH | chars::PLUS | chars::MINUS | chars::STAR | chars::SLASH
            | chars::PERCENT | chars::CARET => {
                self.advance();
                self.operator_token(start, &ch.to_string())
            }
            chars::QUESTION => self.scan_question(start),
            chars::LT | chars::GT => self.scan_complex_operator(start, ch, chars::EQ, None),
            chars::BANG | chars::EQ => {
                self.scan_complex_operator(start, ch, chars::EQ, Some(chars::EQ))
            }
            chars::AMPERSAND => self.scan_complex_operator(start, ch, chars::AMPERSAND, None),
            chars::BAR => self.scan_complex_operator(start, ch, chars::BAR, None),
            chars::NBSP => {
                while chars::is_whitespace(self.peek) {
                    self.advance();
                }
                return self.scan_token();
            }
            _ => {
                return Err(self.error(&format!("Unexpected character [{}]", ch), 0));
            }
        };
        Ok(Some(token))
    }

    fn character_token(&self, start: usize, ch: char) -> Token {
        Token::new(start, self.index, TokenType::Character, ch as u32 as f64, ch.to_string())
    }

    fn operator_token(&self, start: usize, op: &str) -> Token {
        Token::new(start, self.index, TokenType::Operator, 0.0, op.to_string())
    }

    /// Scans `?` and `?.`
    fn scan_question(&mut self, start: usize) -> Token {
        self.advance();
        if self.peek == chars::PERIOD {
            self.advance();
            return self.operator_token(start, "?.");
        }
        self.operator_token(start, "?")
    }

    /// Scans operators of up to three characters such as `<=`, `==`, `!==`,
    /// `&&` and `||`.
    fn scan_complex_operator(&mut self, start: usize, one: char, two: char, three: Option<char>) -> Token {
        self.advance();
        let mut op = one.to_string();
        if self.peek == two {
            self.advance();
            op.push(two);
            if let Some(three) = three {
                if self.peek == three {
                    self.advance();
                    op.push(three);
                }
            }
        }
        self.operator_token(start, &op)
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.index;
        self.advance();
        while chars::is_identifier_part(self.peek) {
            self.advance();
        }
        let text = self.text(start, self.index);
        let token_type = if KEYWORDS.contains(&text.as_str()) {
            TokenType::Keyword
        } else {
            TokenType::Identifier
        };
        Token::new(start, self.index, token_type, 0.0, text)
    }

    fn scan_number(&mut self, start: usize) -> Result<Token> {
        let mut simple = self.index == start;
        self.advance();
        loop {
            if chars::is_digit(self.peek) {
                // Do nothing.
            } else if self.peek == chars::PERIOD {
                simple = false;
            } else if self.peek == 'e' || self.peek == 'E' {
                self.advance();
                if self.peek == chars::PLUS || self.peek == chars::MINUS {
                    self.advance();
                }
                if !chars::is_digit(self.peek) {
                    return Err(self.error("Invalid exponent", -1));
                }
                simple = false;
            } else {
                break;
            }
            self.advance();
        }
        let text = self.text(start, self.index);
        let value = if simple {
            text.parse::<i64>().map(|v| v as f64).unwrap_or(0.0)
        } else {
            text.parse::<f64>().unwrap_or(0.0)
        };
        Ok(Token::new(start, self.index, TokenType::Number, value, String::new()))
    }

    fn scan_string(&mut self) -> Result<Token> {
        let start = self.index;
        let quote = self.peek;
        self.advance();

        let mut buffer = String::new();
        let mut marker = self.index;
        while self.peek != quote {
            if self.peek == chars::BACKSLASH {
                buffer.push_str(&self.text(marker, self.index));
                self.advance();
                let unescaped = match self.peek {
                    'u' => {
                        let hex = self.text(self.index + 1, (self.index + 5).min(self.input.len()));
                        let code = u32::from_str_radix(&hex, 16)
                            .ok()
                            .and_then(char::from_u32)
                            .ok_or_else(|| self.error(&format!("Invalid unicode escape [\\u{}]", hex), 0))?;
                        for _ in 0..4 {
                            self.advance();
                        }
                        code
                    }
                    'n' => '\n',
                    'f' => '\x0C',
                    'r' => '\r',
                    't' => '\t',
                    'v' => '\x0B',
                    other => other,
                };
                buffer.push(unescaped);
                self.advance();
                marker = self.index;
            } else if self.peek == chars::EOF && self.index >= self.input.len() {
                return Err(self.error("Unterminated quote", 0));
            } else {
                self.advance();
            }
        }

        let last = self.text(marker, self.index);
        self.advance();
        buffer.push_str(&last);
        Ok(Token::new(start, self.index, TokenType::String, 0.0, buffer))
    }

    fn error(&self, message: &str, offset: isize) -> CompilerError {
        let position = (self.index as isize + offset).max(0) as usize;
        let input: String = self.input.iter().collect();
        CompilerError::ParseError {
            message: format!(
                "Lexer Error: {} at column {} in expression [{}]",
                message,
                position,
                input
            ),
        }
    }
}
