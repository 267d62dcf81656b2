//! Expression AST, parser and evaluator.
//!
//! Grammar (lowest precedence first):
//!
//! ```text
//! conditional := or ( '?' conditional ':' conditional )?
//! or          := and ( '||' and )*
//! and         := equality ( '&&' equality )*
//! equality    := unary ( ( '==' | '===' | '!=' | '!==' ) unary )*
//! unary       := '!' unary | primary
//! primary     := literal | path | '(' conditional ')'
//! path        := 'node' ( '.' ident | '[' string ']' )*
//! literal     := string | number | 'true' | 'false' | 'null'
//! ```

use serde_json::Value;

use edithost_protocols::error::ExprError;

/// Root identifier every path must start with.
const NODE_ROOT: &str = "node";

#[derive(Debug, Clone, PartialEq)]
pub enum BinaryOp {
    Eq,
    Ne,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    /// Segments below the `node` root.
    Path(Vec<String>),
    Not(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

impl Expr {
    /// Evaluate against the focused node. Missing paths read as `null`.
    pub fn evaluate(&self, node: &Value) -> Value {
        match self {
            Expr::Literal(value) => value.clone(),
            Expr::Path(segments) => segments
                .iter()
                .try_fold(node, |current, segment| match current {
                    Value::Object(map) => map.get(segment),
                    Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                    _ => None,
                })
                .cloned()
                .unwrap_or(Value::Null),
            Expr::Not(inner) => Value::Bool(!truthy(&inner.evaluate(node))),
            Expr::Binary { op, lhs, rhs } => {
                let left = lhs.evaluate(node);
                match op {
                    BinaryOp::And if !truthy(&left) => left,
                    BinaryOp::And => rhs.evaluate(node),
                    BinaryOp::Or if truthy(&left) => left,
                    BinaryOp::Or => rhs.evaluate(node),
                    BinaryOp::Eq => Value::Bool(loose_eq(&left, &rhs.evaluate(node))),
                    BinaryOp::Ne => Value::Bool(!loose_eq(&left, &rhs.evaluate(node))),
                }
            }
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if truthy(&condition.evaluate(node)) {
                    then.evaluate(node)
                } else {
                    otherwise.evaluate(node)
                }
            }
        }
    }
}

/// `null`, `false`, `0` and `""` are false; everything else is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Value equality with numbers compared numerically (`1 == 1.0`).
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Number(f64),
    Dot,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Not,
    Eq,
    Ne,
    And,
    Or,
    Question,
    Colon,
}

fn tokenize(src: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let token = match c {
            '.' => {
                i += 1;
                Token::Dot
            }
            '[' => {
                i += 1;
                Token::LBracket
            }
            ']' => {
                i += 1;
                Token::RBracket
            }
            '(' => {
                i += 1;
                Token::LParen
            }
            ')' => {
                i += 1;
                Token::RParen
            }
            '?' => {
                i += 1;
                Token::Question
            }
            ':' => {
                i += 1;
                Token::Colon
            }
            '!' | '=' => {
                let negated = c == '!';
                i += 1;
                let mut equals = 0;
                while equals < 2 && chars.get(i) == Some(&'=') {
                    equals += 1;
                    i += 1;
                }
                match (negated, equals) {
                    (true, 0) => Token::Not,
                    (true, _) => Token::Ne,
                    (false, 1) | (false, 2) => Token::Eq,
                    _ => return Err(ExprError::parse(start, "assignment is not supported")),
                }
            }
            '&' | '|' => {
                if chars.get(i + 1) != Some(&c) {
                    return Err(ExprError::parse(start, format!("expected '{}{}'", c, c)));
                }
                i += 2;
                if c == '&' { Token::And } else { Token::Or }
            }
            '\'' | '"' => {
                i += 1;
                let mut text = String::new();
                loop {
                    match chars.get(i) {
                        None => return Err(ExprError::parse(start, "unterminated string")),
                        Some(&ch) if ch == c => {
                            i += 1;
                            break;
                        }
                        Some('\\') => {
                            let escaped = chars
                                .get(i + 1)
                                .ok_or_else(|| ExprError::parse(i, "dangling escape"))?;
                            text.push(*escaped);
                            i += 2;
                        }
                        Some(&ch) => {
                            text.push(ch);
                            i += 1;
                        }
                    }
                }
                Token::Str(text)
            }
            c if c.is_ascii_digit() || (c == '-' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit())) => {
                i += 1;
                while chars.get(i).is_some_and(|d| d.is_ascii_digit() || *d == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let number = literal
                    .parse::<f64>()
                    .map_err(|_| ExprError::parse(start, format!("invalid number '{}'", literal)))?;
                Token::Number(number)
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                while chars
                    .get(i)
                    .is_some_and(|d| d.is_alphanumeric() || *d == '_' || *d == '$')
                {
                    i += 1;
                }
                Token::Ident(chars[start..i].iter().collect())
            }
            other => {
                return Err(ExprError::parse(start, format!("unexpected character '{}'", other)));
            }
        };

        tokens.push((start, token));
    }

    Ok(tokens)
}

/// Deepest nesting of `!`, parentheses, `?:` and operator chains accepted.
const MAX_DEPTH: usize = 64;

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    /// Source length in chars, the offset reported at end of input.
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map(|(o, _)| *o).unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), ExprError> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(ExprError::parse(self.offset(), format!("expected {}", what)))
        }
    }

    fn descend(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::parse(self.offset(), "expression nested too deeply"));
        }
        Ok(())
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self) -> Result<Expr, ExprError>) -> Result<Expr, ExprError> {
        self.descend()?;
        let expr = f(self);
        self.depth -= 1;
        expr
    }

    fn conditional(&mut self) -> Result<Expr, ExprError> {
        self.nested(|p| {
            let condition = p.or()?;
            if !p.eat(&Token::Question) {
                return Ok(condition);
            }
            let then = p.conditional()?;
            p.expect(Token::Colon, "':'")?;
            let otherwise = p.conditional()?;
            Ok(Expr::Conditional {
                condition: Box::new(condition),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            })
        })
    }

    // Each operator in a chain nests the tree one level deeper on the left.

    fn or(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.and()?;
        let mut levels = 0;
        while self.eat(&Token::Or) {
            self.descend()?;
            levels += 1;
            let rhs = self.and()?;
            lhs = binary(BinaryOp::Or, lhs, rhs);
        }
        self.depth -= levels;
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.equality()?;
        let mut levels = 0;
        while self.eat(&Token::And) {
            self.descend()?;
            levels += 1;
            let rhs = self.equality()?;
            lhs = binary(BinaryOp::And, lhs, rhs);
        }
        self.depth -= levels;
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        let mut levels = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Eq) => BinaryOp::Eq,
                Some(Token::Ne) => BinaryOp::Ne,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            levels += 1;
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
        self.depth -= levels;
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        if self.eat(&Token::Not) {
            return self.nested(|p| Ok(Expr::Not(Box::new(p.unary()?))));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::String(s))),
            Some(Token::Number(n)) => Ok(Expr::Literal(number_value(n))),
            Some(Token::LParen) => {
                let inner = self.conditional()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "null" | "undefined" => Ok(Expr::Literal(Value::Null)),
                NODE_ROOT => self.path(),
                _ => Err(ExprError::UnknownRoot(name)),
            },
            Some(other) => Err(ExprError::parse(offset, format!("unexpected token {:?}", other))),
            None => Err(ExprError::parse(offset, "unexpected end of expression")),
        }
    }

    fn path(&mut self) -> Result<Expr, ExprError> {
        let mut segments = Vec::new();
        loop {
            if self.eat(&Token::Dot) {
                let offset = self.offset();
                match self.advance() {
                    Some(Token::Ident(name)) => segments.push(name),
                    _ => return Err(ExprError::parse(offset, "expected property name after '.'")),
                }
            } else if self.eat(&Token::LBracket) {
                let offset = self.offset();
                match self.advance() {
                    Some(Token::Str(name)) => segments.push(name),
                    Some(Token::Number(n)) if n >= 0.0 && n.fract() == 0.0 => {
                        segments.push((n as u64).to_string())
                    }
                    _ => return Err(ExprError::parse(offset, "expected string or index inside '[]'")),
                }
                self.expect(Token::RBracket, "']'")?;
            } else {
                return Ok(Expr::Path(segments));
            }
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Parse an expression (without the `ClientEval:` prefix).
pub fn parse(src: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: src.chars().count(),
        depth: 0,
    };
    let expr = parser.conditional()?;
    if parser.peek().is_some() {
        return Err(ExprError::parse(parser.offset(), "unexpected trailing input"));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node() -> Value {
        json!({
            "nodeType": "Neos.Demo:Teaser",
            "properties": {
                "title": "Hello",
                "showImage": true,
                "count": 0,
                "layout": "wide",
                "tags": ["a", "b"]
            }
        })
    }

    fn eval(src: &str) -> Value {
        parse(src).unwrap().evaluate(&node())
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval("true"), json!(true));
        assert_eq!(eval("null"), Value::Null);
        assert_eq!(eval("'wide'"), json!("wide"));
        assert_eq!(eval("\"it's\""), json!("it's"));
        assert_eq!(eval("42"), json!(42));
        assert_eq!(eval("-1.5"), json!(-1.5));
    }

    #[test]
    fn test_paths() {
        assert_eq!(eval("node.properties.title"), json!("Hello"));
        assert_eq!(eval("node['nodeType']"), json!("Neos.Demo:Teaser"));
        assert_eq!(eval("node.properties.tags[1]"), json!("b"));
        assert_eq!(eval("node.properties.missing.deeper"), Value::Null);
    }

    #[test]
    fn test_equality_and_logic() {
        assert_eq!(eval("node.properties.layout == 'wide'"), json!(true));
        assert_eq!(eval("node.properties.layout === 'narrow'"), json!(false));
        assert_eq!(eval("node.properties.layout !== 'narrow'"), json!(true));
        assert_eq!(eval("node.properties.count == 0.0"), json!(true));
        assert_eq!(eval("!node.properties.showImage"), json!(false));
        assert_eq!(eval("!node.properties.count"), json!(true));
        assert_eq!(eval("node.properties.showImage && node.properties.title"), json!("Hello"));
        assert_eq!(eval("node.properties.count || 'fallback'"), json!("fallback"));
    }

    #[test]
    fn test_conditional() {
        assert_eq!(
            eval("node.properties.layout == 'wide' ? false : true"),
            json!(false)
        );
        assert_eq!(
            eval("(node.properties.count ? 'some' : 'none')"),
            json!("none")
        );
        assert_eq!(eval("false ? 1 : true ? 2 : 3"), json!(2));
    }

    #[test]
    fn test_precedence() {
        // && binds tighter than ||
        assert_eq!(eval("true || false && false"), json!(true));
        assert_eq!(eval("!true == false"), json!(true));
    }

    #[test]
    fn test_unknown_root_is_rejected() {
        assert_eq!(
            parse("window.location").unwrap_err(),
            ExprError::UnknownRoot("window".to_string())
        );
        assert!(matches!(parse("alert('x')"), Err(ExprError::UnknownRoot(_))));
    }

    #[test]
    fn test_parse_errors() {
        for src in ["", "node.", "node.a = 1", "(true", "'open", "true false", "a & b", "1 +"] {
            assert!(parse(src).is_err(), "expected error for {:?}", src);
        }
        match parse("(true").unwrap_err() {
            ExprError::Parse { position, .. } => assert_eq!(position, 5),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    fn nested_too_deeply(src: &str) -> bool {
        matches!(
            parse(src),
            Err(ExprError::Parse { ref message, .. }) if message == "expression nested too deeply"
        )
    }

    #[test]
    fn test_depth_limit() {
        assert!(nested_too_deeply(&format!("{}true", "!".repeat(200_000))));
        assert!(nested_too_deeply(&format!("{}true{}", "(".repeat(100_000), ")".repeat(100_000))));
        assert!(nested_too_deeply(&format!("{}1", "true ? 1 : ".repeat(10_000))));
        assert!(nested_too_deeply(&vec!["true"; 100_000].join(" && ")));
        assert!(nested_too_deeply(&vec!["1"; 100_000].join(" == ")));
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        assert_eq!(eval(&format!("{}true", "!".repeat(10))), json!(true));
        assert_eq!(
            eval(&format!("{}node.properties.layout{}", "(".repeat(20), ")".repeat(20))),
            json!("wide")
        );
        assert_eq!(eval(&vec!["true"; 30].join(" && ")), json!(true));
    }

    #[test]
    fn test_end_offset_counts_chars() {
        match parse("'é' ==").unwrap_err() {
            ExprError::Parse { position, .. } => assert_eq!(position, 6),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_truthy() {
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!(0)));
        assert!(truthy(&json!([])));
        assert!(truthy(&json!({})));
        assert!(truthy(&json!("0")));
    }
}
