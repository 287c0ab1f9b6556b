/**
 * Expression Parser
 *
 * Recursive descent parser for binding expressions, actions, interpolations
 * and template microsyntax.
 */
use super::ast::*;
use super::lexer::{Lexer, Token, TokenType};
use crate::error::{CompilerError, Result};
use crate::util::dash_case_to_camel_case;

/// Split interpolation result
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInterpolation {
    pub strings: Vec<String>,
    pub expressions: Vec<String>,
}

/// Parser for binding expressions
#[derive(Debug, Default)]
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new() -> Self {
        Parser { lexer: Lexer::new() }
    }

    /// Parse an action expression (event handler). Chains and assignments
    /// are allowed, pipes are not.
    pub fn parse_action(&self, input: &str, location: &str) -> Result<ASTWithSource> {
        let tokens = self.lexer.tokenize(input)?;
        let ast = ParseAST::new(input, location, tokens, true).parse_chain()?;
        Ok(ASTWithSource::new(ast, input, location))
    }

    /// Parse a property binding expression.
    pub fn parse_binding(&self, input: &str, location: &str) -> Result<ASTWithSource> {
        let tokens = self.lexer.tokenize(input)?;
        let ast = ParseAST::new(input, location, tokens, false).parse_chain()?;
        Ok(ASTWithSource::new(ast, input, location))
    }

    /// Parse the microsyntax of a `template` attribute or a `*`-prefixed
    /// attribute.
    pub fn parse_template_bindings(&self, input: &str, location: &str) -> Result<Vec<TemplateBinding>> {
        let tokens = self.lexer.tokenize(input)?;
        ParseAST::new(input, location, tokens, false).parse_template_bindings()
    }

    /// Parse text containing `{{...}}` parts. Returns `None` when the text has
    /// no interpolation.
    pub fn parse_interpolation(&self, input: &str, location: &str) -> Result<Option<ASTWithSource>> {
        let split = match self.split_interpolation(input, location)? {
            Some(split) => split,
            None => return Ok(None),
        };

        let mut expressions = Vec::with_capacity(split.expressions.len());
        for exp in &split.expressions {
            let tokens = self.lexer.tokenize(exp)?;
            expressions.push(ParseAST::new(exp, location, tokens, false).parse_chain()?);
        }
        let ast = AST::Interpolation {
            strings: split.strings,
            expressions,
        };
        Ok(Some(ASTWithSource::new(ast, input, location)))
    }

    pub fn split_interpolation(&self, input: &str, location: &str) -> Result<Option<SplitInterpolation>> {
        let mut strings = Vec::new();
        let mut expressions = Vec::new();
        let mut rest = input;

        loop {
            let start = match rest.find("{{") {
                Some(start) => start,
                None => break,
            };
            let after_start = &rest[start + 2..];
            let end = match after_start.find("}}") {
                Some(end) => end,
                None => break,
            };
            let expression = &after_start[..end];
            if expression.trim().is_empty() {
                return Err(CompilerError::ParseError {
                    message: format!(
                        "Blank expressions are not allowed in interpolated strings at column {} in [{}] in {}",
                        input.len() - rest.len() + start,
                        input,
                        location
                    ),
                });
            }
            strings.push(rest[..start].to_string());
            expressions.push(expression.to_string());
            rest = &after_start[end + 2..];
        }

        if expressions.is_empty() {
            return Ok(None);
        }
        strings.push(rest.to_string());
        Ok(Some(SplitInterpolation {
            strings,
            expressions,
        }))
    }

    /// Wrap a static attribute value as a literal expression.
    pub fn wrap_literal_primitive(&self, input: &str, location: &str) -> ASTWithSource {
        ASTWithSource::new(
            AST::LiteralPrimitive(LiteralValue::String(input.to_string())),
            input,
            location,
        )
    }
}

/// Parser state for one input
struct ParseAST<'a> {
    input: &'a str,
    location: &'a str,
    tokens: Vec<Token>,
    index: usize,
    parse_action: bool,
}

impl<'a> ParseAST<'a> {
    fn new(input: &'a str, location: &'a str, tokens: Vec<Token>, parse_action: bool) -> Self {
        ParseAST {
            input,
            location,
            tokens,
            index: 0,
            parse_action,
        }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn input_index(&self) -> usize {
        self.current().map(|t| t.index).unwrap_or_else(|| self.input.chars().count())
    }

    fn error(&self, message: &str) -> CompilerError {
        let position = match self.current() {
            Some(token) => format!("at column {} in", token.index + 1),
            None => "at the end of the expression".to_string(),
        };
        CompilerError::ParseError {
            message: format!("{} {} [{}] in {}", message, position, self.input, self.location),
        }
    }

    fn optional_character(&mut self, code: char) -> bool {
        if self.current().map_or(false, |t| t.is_character(code)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn optional_operator(&mut self, op: &str) -> bool {
        if self.current().map_or(false, |t| t.is_operator(op)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn optional_keyword_var(&mut self) -> bool {
        if self.peek_keyword_var() {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek_keyword_var(&self) -> bool {
        self.current()
            .map_or(false, |t| t.is_keyword_named("var") || t.is_keyword_named("let"))
    }

    fn expect_character(&mut self, code: char) -> Result<()> {
        if self.optional_character(code) {
            Ok(())
        } else {
            Err(self.error(&format!("Missing expected {}", code)))
        }
    }

    fn expect_identifier_or_keyword(&mut self) -> Result<String> {
        match self.current() {
            Some(token) if token.is_identifier() || token.is_keyword() => {
                let name = token.str_value.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error("Unexpected token, expected identifier or keyword")),
        }
    }

    fn expect_identifier_or_keyword_or_string(&mut self) -> Result<String> {
        match self.current() {
            Some(token) if token.is_identifier() || token.is_keyword() || token.is_string() => {
                let name = token.str_value.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error("Unexpected token, expected identifier, keyword, or string")),
        }
    }

    fn parse_chain(&mut self) -> Result<AST> {
        let mut expressions = Vec::new();
        while !self.at_end() {
            expressions.push(self.parse_pipe()?);
            if self.optional_character(';') {
                if !self.parse_action {
                    return Err(self.error("Binding expression cannot contain chained expression"));
                }
                while self.optional_character(';') {}
            } else if !self.at_end() {
                let unexpected = self.current().map(|t| t.str_value.clone()).unwrap_or_default();
                return Err(self.error(&format!("Unexpected token '{}'", unexpected)));
            }
        }
        match expressions.len() {
            0 => Ok(AST::EmptyExpr),
            1 => Ok(expressions.remove(0)),
            _ => Ok(AST::Chain(expressions)),
        }
    }

    fn parse_pipe(&mut self) -> Result<AST> {
        let mut result = self.parse_expression()?;
        if self.optional_operator("|") {
            if self.parse_action {
                return Err(self.error("Cannot have a pipe in an action expression"));
            }
            loop {
                let name = self.expect_identifier_or_keyword()?;
                let mut args = Vec::new();
                while self.optional_character(':') {
                    args.push(self.parse_expression()?);
                }
                result = AST::Pipe {
                    exp: Box::new(result),
                    name,
                    args,
                };
                if !self.optional_operator("|") {
                    break;
                }
            }
        }
        Ok(result)
    }

    fn parse_expression(&mut self) -> Result<AST> {
        let start = self.input_index();
        let result = self.parse_conditional()?;

        if self.current().map_or(false, |t| t.is_operator("=")) {
            if !result.is_assignable() {
                let end = self.input_index();
                let expression: String = self.input.chars().skip(start).take(end - start).collect();
                return Err(self.error(&format!("Expression {} is not assignable", expression.trim())));
            }
            if !self.parse_action {
                return Err(self.error("Binding expression cannot contain assignments"));
            }
            self.advance();
            let value = Box::new(self.parse_conditional()?);
            return Ok(match result {
                AST::PropertyRead { receiver, name } => AST::PropertyWrite {
                    receiver,
                    name,
                    value,
                },
                AST::KeyedRead { obj, key } => AST::KeyedWrite { obj, key, value },
                other => other,
            });
        }
        Ok(result)
    }

    fn parse_conditional(&mut self) -> Result<AST> {
        let result = self.parse_logical_or()?;
        if self.optional_operator("?") {
            let true_exp = self.parse_pipe()?;
            if !self.optional_character(':') {
                return Err(self.error("Conditional expression requires all 3 expressions"));
            }
            let false_exp = self.parse_pipe()?;
            return Ok(AST::Conditional {
                condition: Box::new(result),
                true_exp: Box::new(true_exp),
                false_exp: Box::new(false_exp),
            });
        }
        Ok(result)
    }

    fn parse_binary_level(
        &mut self,
        operators: &[&str],
        next: fn(&mut Self) -> Result<AST>,
    ) -> Result<AST> {
        let mut result = next(self)?;
        'outer: loop {
            for op in operators {
                if self.optional_operator(op) {
                    let right = next(self)?;
                    result = AST::Binary {
                        operation: op.to_string(),
                        left: Box::new(result),
                        right: Box::new(right),
                    };
                    continue 'outer;
                }
            }
            return Ok(result);
        }
    }

    fn parse_logical_or(&mut self) -> Result<AST> {
        self.parse_binary_level(&["||"], Self::parse_logical_and)
    }

    fn parse_logical_and(&mut self) -> Result<AST> {
        self.parse_binary_level(&["&&"], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<AST> {
        self.parse_binary_level(&["===", "!==", "==", "!="], Self::parse_relational)
    }

    fn parse_relational(&mut self) -> Result<AST> {
        self.parse_binary_level(&["<=", ">=", "<", ">"], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Result<AST> {
        self.parse_binary_level(&["+", "-"], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<AST> {
        self.parse_binary_level(&["*", "%", "/"], Self::parse_prefix)
    }

    fn parse_prefix(&mut self) -> Result<AST> {
        if self.optional_operator("+") {
            return self.parse_prefix();
        }
        if self.optional_operator("-") {
            let operand = self.parse_prefix()?;
            return Ok(AST::Binary {
                operation: "-".to_string(),
                left: Box::new(AST::LiteralPrimitive(LiteralValue::Number(0.0))),
                right: Box::new(operand),
            });
        }
        if self.optional_operator("!") {
            let operand = self.parse_prefix()?;
            return Ok(AST::PrefixNot(Box::new(operand)));
        }
        self.parse_call_chain()
    }

    fn parse_call_chain(&mut self) -> Result<AST> {
        let mut result = self.parse_primary()?;
        loop {
            if self.optional_character('.') {
                result = self.parse_access_member_or_method_call(result, false)?;
            } else if self.optional_operator("?.") {
                result = self.parse_access_member_or_method_call(result, true)?;
            } else if self.optional_character('[') {
                let key = self.parse_pipe()?;
                self.expect_character(']')?;
                if self.parse_action && self.optional_operator("=") {
                    let value = self.parse_conditional()?;
                    result = AST::KeyedWrite {
                        obj: Box::new(result),
                        key: Box::new(key),
                        value: Box::new(value),
                    };
                } else {
                    result = AST::KeyedRead {
                        obj: Box::new(result),
                        key: Box::new(key),
                    };
                }
            } else if self.optional_character('(') {
                let args = self.parse_call_arguments()?;
                self.expect_character(')')?;
                result = AST::FunctionCall {
                    target: Box::new(result),
                    args,
                };
            } else {
                return Ok(result);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<AST> {
        if self.optional_character('(') {
            let result = self.parse_pipe()?;
            self.expect_character(')')?;
            return Ok(result);
        }

        let token = match self.current() {
            Some(token) => token.clone(),
            None => return Err(self.error("Unexpected end of expression")),
        };

        if token.is_keyword_named("null") {
            self.advance();
            return Ok(AST::LiteralPrimitive(LiteralValue::Null));
        }
        if token.is_keyword_named("undefined") {
            self.advance();
            return Ok(AST::LiteralPrimitive(LiteralValue::Undefined));
        }
        if token.is_keyword_named("true") {
            self.advance();
            return Ok(AST::LiteralPrimitive(LiteralValue::Bool(true)));
        }
        if token.is_keyword_named("false") {
            self.advance();
            return Ok(AST::LiteralPrimitive(LiteralValue::Bool(false)));
        }
        if self.optional_character('[') {
            let elements = self.parse_expression_list(']')?;
            self.expect_character(']')?;
            return Ok(AST::LiteralArray(elements));
        }
        if token.is_character('{') {
            return self.parse_literal_map();
        }
        if token.is_identifier() {
            return self.parse_access_member_or_method_call(AST::ImplicitReceiver, false);
        }
        if token.is_number() {
            self.advance();
            return Ok(AST::LiteralPrimitive(LiteralValue::Number(token.num_value)));
        }
        if token.token_type == TokenType::String {
            self.advance();
            return Ok(AST::LiteralPrimitive(LiteralValue::String(token.str_value)));
        }
        Err(self.error(&format!("Unexpected token {}", token.str_value)))
    }

    fn parse_expression_list(&mut self, terminator: char) -> Result<Vec<AST>> {
        let mut result = Vec::new();
        if !self.current().map_or(false, |t| t.is_character(terminator)) {
            loop {
                result.push(self.parse_pipe()?);
                if !self.optional_character(',') {
                    break;
                }
            }
        }
        Ok(result)
    }

    fn parse_literal_map(&mut self) -> Result<AST> {
        let mut keys = Vec::new();
        let mut values = Vec::new();
        self.expect_character('{')?;
        if !self.optional_character('}') {
            loop {
                keys.push(self.expect_identifier_or_keyword_or_string()?);
                self.expect_character(':')?;
                values.push(self.parse_pipe()?);
                if !self.optional_character(',') {
                    break;
                }
            }
            self.expect_character('}')?;
        }
        Ok(AST::LiteralMap { keys, values })
    }

    fn parse_access_member_or_method_call(&mut self, receiver: AST, is_safe: bool) -> Result<AST> {
        let name = self.expect_identifier_or_keyword()?;

        if self.optional_character('(') {
            let args = self.parse_call_arguments()?;
            self.expect_character(')')?;
            let receiver = Box::new(receiver);
            return Ok(if is_safe {
                AST::SafeMethodCall {
                    receiver,
                    name,
                    args,
                }
            } else {
                AST::MethodCall {
                    receiver,
                    name,
                    args,
                }
            });
        }

        let receiver = Box::new(receiver);
        if is_safe {
            if self.current().map_or(false, |t| t.is_operator("=")) {
                return Err(self.error("The '?.' operator cannot be used in the assignment"));
            }
            return Ok(AST::SafePropertyRead { receiver, name });
        }
        Ok(AST::PropertyRead { receiver, name })
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<AST>> {
        if self.current().map_or(false, |t| t.is_character(')')) {
            return Ok(Vec::new());
        }
        let mut positionals = Vec::new();
        loop {
            positionals.push(self.parse_pipe()?);
            if !self.optional_character(',') {
                break;
            }
        }
        Ok(positionals)
    }

    /// An identifier, keyword, or string with an optional `-` in between.
    fn expect_template_binding_key(&mut self) -> Result<String> {
        let mut result = String::new();
        loop {
            result.push_str(&self.expect_identifier_or_keyword_or_string()?);
            if self.optional_operator("-") {
                result.push('-');
            } else {
                break;
            }
        }
        Ok(result)
    }

    fn parse_template_bindings(&mut self) -> Result<Vec<TemplateBinding>> {
        let mut bindings = Vec::new();
        let mut prefix: Option<String> = None;

        while !self.at_end() {
            let key_is_var = self.optional_keyword_var() || self.optional_operator("#");
            let mut key = self.expect_template_binding_key()?;
            if !key_is_var {
                match &prefix {
                    None => {
                        key = dash_case_to_camel_case(&key);
                        prefix = Some(key.clone());
                    }
                    Some(prefix) => {
                        let mut chars = key.chars();
                        let capitalized = match chars.next() {
                            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                            None => String::new(),
                        };
                        key = format!("{}{}", prefix, dash_case_to_camel_case(&capitalized));
                    }
                }
            }
            self.optional_character(':');

            let mut name = None;
            let mut expression = None;
            if key_is_var {
                if self.optional_operator("=") {
                    name = Some(self.expect_template_binding_key()?);
                } else {
                    name = Some("$implicit".to_string());
                }
            } else if !self.at_end()
                && !self.peek_keyword_var()
                && !self.current().map_or(false, |t| t.is_operator("#"))
            {
                let start = self.input_index();
                let ast = self.parse_pipe()?;
                let end = self.input_index();
                let source: String = self.input.chars().skip(start).take(end - start).collect();
                expression = Some(ASTWithSource::new(ast, source.trim(), self.location));
            }

            bindings.push(TemplateBinding {
                key,
                key_is_var,
                name,
                expression,
            });
            if !self.optional_character(';') {
                self.optional_character(',');
            }
        }
        Ok(bindings)
    }
}
