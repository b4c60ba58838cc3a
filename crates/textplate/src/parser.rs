//! Hand-written recursive-descent parser for the template language.
//!
//! The parser is a single pass over the source with a cursor and no
//! backtracking beyond fixed-length keyword matching. Every `$`-prefixed
//! token must match one of the known directives; anything else is an
//! `Unknown directive` error at the offset of the `$`.
//!
//! Positions in errors are zero-based character offsets, so the cursor runs
//! over a char vector rather than bytes.
//!
//! # Trailing whitespace after terminators
//!
//! After the `)` of a block-directive header, after each `$end`, and after a
//! closed comment, the parser skips whitespace but stops once it has
//! consumed a single newline. This lets each directive sit on its own line
//! without the line break leaking into the output, which would otherwise
//! wreck Markdown tables and lists:
//!
//! ```text
//! | name | age |
//! | --- | --- |
//! $each(rows)
//! | ${name} | ${age} |
//! $end
//! ```
//!
//! The leaf directives `$length(...)` and `$index(...)` do not trim, since
//! they are typically embedded mid-line. Inside a `$call` block, whitespace
//! between argument blocks is skipped entirely, newlines included.

use crate::ast::{MacroArg, Node, Template};
use crate::error::ParseError;

pub(crate) fn parse_source(source: &str) -> Result<Template, ParseError> {
    let mut parser = Parser::new(source);
    let children = parser.parse_nodes()?;
    Ok(Template { children })
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn parse_nodes(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        while !self.at_end() && !self.looking_at("$end") {
            if self.peek() == '$' {
                nodes.push(self.parse_directive()?);
            } else {
                nodes.push(self.parse_text());
            }
        }
        Ok(nodes)
    }

    fn parse_directive(&mut self) -> Result<Node, ParseError> {
        if self.match_kw("$$") {
            return Ok(Node::Text("$".to_string()));
        }
        if self.match_kw("${") {
            return self.parse_variable();
        }
        if self.match_kw("$if_eq(") {
            let (variable, literal, body) = self.parse_eq_header()?;
            return Ok(Node::IfEq {
                variable,
                literal,
                body,
            });
        }
        if self.match_kw("$unless_eq(") {
            let (variable, literal, body) = self.parse_eq_header()?;
            return Ok(Node::UnlessEq {
                variable,
                literal,
                body,
            });
        }
        if self.match_kw("$if_has_many(") {
            let (iterable, body) = self.parse_name_block()?;
            return Ok(Node::IfHasMany { iterable, body });
        }
        if self.match_kw("$unless_has_many(") {
            let (iterable, body) = self.parse_name_block()?;
            return Ok(Node::UnlessHasMany { iterable, body });
        }
        if self.match_kw("$greater_than_or_eq(") {
            let (variable, literal, body) = self.parse_comparison_header()?;
            return Ok(Node::GreaterThanOrEq {
                variable,
                literal,
                body,
            });
        }
        if self.match_kw("$less_than_or_eq(") {
            let (variable, literal, body) = self.parse_comparison_header()?;
            return Ok(Node::LessThanOrEq {
                variable,
                literal,
                body,
            });
        }
        if self.match_kw("$greater_than(") {
            let (variable, literal, body) = self.parse_comparison_header()?;
            return Ok(Node::GreaterThan {
                variable,
                literal,
                body,
            });
        }
        if self.match_kw("$less_than(") {
            let (variable, literal, body) = self.parse_comparison_header()?;
            return Ok(Node::LessThan {
                variable,
                literal,
                body,
            });
        }
        if self.match_kw("$if(") {
            let (condition, body) = self.parse_name_block()?;
            return Ok(Node::IfTrue { condition, body });
        }
        if self.match_kw("$unless(") {
            let (condition, body) = self.parse_name_block()?;
            return Ok(Node::IfFalse { condition, body });
        }
        if self.match_kw("$each(") {
            let (iterable, body) = self.parse_name_block()?;
            return Ok(Node::Each { iterable, body });
        }
        if self.match_kw("$first(") {
            let (iterable, body) = self.parse_name_block()?;
            return Ok(Node::First { iterable, body });
        }
        if self.match_kw("$last(") {
            let (iterable, body) = self.parse_name_block()?;
            return Ok(Node::Last { iterable, body });
        }
        if self.match_kw("$--") {
            return self.parse_comment();
        }
        if self.match_kw("$call(") {
            return self.parse_call();
        }
        if self.match_kw("$include(") {
            let path = self.parse_until(')');
            self.expect(")")?;
            self.on_terminator_match();
            return Ok(Node::Include { path });
        }
        if self.match_kw("$length(") {
            let iterable = self.parse_until(')');
            self.expect(")")?;
            return Ok(Node::Length { iterable });
        }
        if self.match_kw("$index(") {
            let variable = self.parse_until(',');
            self.expect(",")?;
            let index = self.parse_until(')');
            self.expect(")")?;
            return Ok(Node::Index {
                variable,
                index: trim_to_none(&index),
            });
        }
        Err(ParseError::new("Unknown directive", self.pos))
    }

    fn parse_text(&mut self) -> Node {
        let mut text = String::new();
        while !self.at_end() && self.peek() != '$' {
            text.push(self.advance());
        }
        Node::Text(text)
    }

    fn parse_variable(&mut self) -> Result<Node, ParseError> {
        let mut name = String::new();
        while !self.at_end() && self.peek() != '}' && self.peek() != '|' {
            name.push(self.advance());
        }
        let mut format = String::new();
        if !self.at_end() && self.peek() == '|' {
            self.pos += 1;
            while !self.at_end() && self.peek() != '}' {
                format.push(self.advance());
            }
        }
        self.expect("}")?;
        Ok(Node::Variable {
            name,
            format: trim_to_none(&format),
        })
    }

    /// Header and body of the single-name block directives
    /// (`$if`, `$unless`, `$each`, `$first`, `$last`, the has-many pair).
    fn parse_name_block(&mut self) -> Result<(String, Vec<Node>), ParseError> {
        let name = self.parse_until(')');
        self.expect(")")?;
        self.on_terminator_match();
        let body = self.parse_block()?;
        Ok((name, body))
    }

    /// Header and body of `$if_eq` / `$unless_eq`.
    fn parse_eq_header(&mut self) -> Result<(String, String, Vec<Node>), ParseError> {
        let variable = self.parse_until(',');
        self.expect(",")?;
        let literal = self.parse_string_literal()?;
        self.expect(")")?;
        self.on_terminator_match();
        let body = self.parse_block()?;
        Ok((variable, literal, body))
    }

    /// Header and body of the four integer comparison directives.
    fn parse_comparison_header(&mut self) -> Result<(String, i64, Vec<Node>), ParseError> {
        let variable = self.parse_until(',');
        self.expect(",")?;
        let literal = self.parse_integer_literal()?;
        self.expect(")")?;
        self.on_terminator_match();
        let body = self.parse_block()?;
        Ok((variable, literal, body))
    }

    /// Double-quoted string literal; content is raw until the next `"`,
    /// no escape processing.
    fn parse_string_literal(&mut self) -> Result<String, ParseError> {
        self.trim_whitespaces();
        self.expect("\"")?;
        let mut literal = String::new();
        while !self.at_end() && self.peek() != '"' {
            literal.push(self.advance());
        }
        self.expect("\"")?;
        Ok(literal)
    }

    /// Unsigned decimal integer literal, leading whitespace allowed.
    fn parse_integer_literal(&mut self) -> Result<i64, ParseError> {
        self.trim_whitespaces();
        let start = self.pos;
        let mut digits = String::new();
        while !self.at_end() && self.peek().is_ascii_digit() {
            digits.push(self.advance());
        }
        if digits.is_empty() {
            return Err(ParseError::new("Expected integer literal", self.pos));
        }
        digits
            .parse()
            .map_err(|_| ParseError::new("Expected integer literal", start))
    }

    fn parse_comment(&mut self) -> Result<Node, ParseError> {
        while !self.at_end() && !self.looking_at("--$") {
            self.pos += 1;
        }
        if !self.match_kw("--$") {
            return Err(ParseError::new(
                "Expected '--$' to close comment",
                self.pos,
            ));
        }
        self.on_terminator_match();
        Ok(Node::Comment)
    }

    fn parse_call(&mut self) -> Result<Node, ParseError> {
        let name = self.parse_until(')');
        self.expect(")")?;
        self.on_terminator_match();
        let args = self.parse_macro_args()?;
        Ok(Node::Call { name, args })
    }

    fn parse_macro_args(&mut self) -> Result<Vec<MacroArg>, ParseError> {
        let mut args = Vec::new();
        self.skip_whitespaces();
        while !self.at_end() && !self.looking_at("$end") {
            args.push(self.parse_macro_arg()?);
            self.skip_whitespaces();
        }
        self.expect("$end")?;
        self.on_terminator_match();
        Ok(args)
    }

    fn parse_macro_arg(&mut self) -> Result<MacroArg, ParseError> {
        self.match_kw("$arg(");
        let name = self.parse_until(')');
        self.expect(")")?;
        self.on_terminator_match();
        let body = self.parse_block()?;
        Ok(MacroArg { name, body })
    }

    fn parse_block(&mut self) -> Result<Vec<Node>, ParseError> {
        let body = self.parse_nodes()?;
        self.expect("$end")?;
        self.on_terminator_match();
        Ok(body)
    }

    fn parse_until(&mut self, terminator: char) -> String {
        let mut consumed = String::new();
        while !self.at_end() && self.peek() != terminator {
            consumed.push(self.advance());
        }
        consumed
    }

    fn expect(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.match_kw(keyword) {
            Ok(())
        } else {
            Err(ParseError::new(
                format!("Expected '{keyword}'"),
                self.pos,
            ))
        }
    }

    fn match_kw(&mut self, keyword: &str) -> bool {
        if self.looking_at(keyword) {
            self.pos += keyword.chars().count();
            true
        } else {
            false
        }
    }

    fn looking_at(&self, keyword: &str) -> bool {
        let mut i = self.pos;
        for c in keyword.chars() {
            if i >= self.chars.len() || self.chars[i] != c {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Invoked after each header `)`, `$end`, and closed comment.
    fn on_terminator_match(&mut self) {
        self.trim_whitespaces();
    }

    /// Skips whitespace but stops right after the first consumed newline.
    fn trim_whitespaces(&mut self) {
        while !self.at_end() {
            let c = self.peek();
            if !c.is_whitespace() {
                break;
            }
            self.pos += 1;
            if c == '\n' {
                break;
            }
        }
    }

    /// Skips all whitespace, newlines included.
    fn skip_whitespaces(&mut self) {
        while !self.at_end() && self.peek().is_whitespace() {
            self.pos += 1;
        }
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.pos];
        self.pos += 1;
        c
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

fn trim_to_none(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
