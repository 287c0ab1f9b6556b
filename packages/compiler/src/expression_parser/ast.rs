/**
 * Expression AST
 *
 * Node types for binding expressions, actions and interpolations.
 */

use std::fmt;

/// A literal value appearing in an expression or used as a constant record.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Undefined,
    Bool(bool),
    Number(f64),
    String(String),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Null => write!(f, "null"),
            LiteralValue::Undefined => write!(f, "undefined"),
            LiteralValue::Bool(b) => write!(f, "{}", b),
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum AST {
    EmptyExpr,
    /// The evaluation context (component instance or locals)
    ImplicitReceiver,
    Chain(Vec<AST>),
    Conditional {
        condition: Box<AST>,
        true_exp: Box<AST>,
        false_exp: Box<AST>,
    },
    PropertyRead {
        receiver: Box<AST>,
        name: String,
    },
    SafePropertyRead {
        receiver: Box<AST>,
        name: String,
    },
    PropertyWrite {
        receiver: Box<AST>,
        name: String,
        value: Box<AST>,
    },
    KeyedRead {
        obj: Box<AST>,
        key: Box<AST>,
    },
    KeyedWrite {
        obj: Box<AST>,
        key: Box<AST>,
        value: Box<AST>,
    },
    MethodCall {
        receiver: Box<AST>,
        name: String,
        args: Vec<AST>,
    },
    SafeMethodCall {
        receiver: Box<AST>,
        name: String,
        args: Vec<AST>,
    },
    FunctionCall {
        target: Box<AST>,
        args: Vec<AST>,
    },
    Pipe {
        exp: Box<AST>,
        name: String,
        args: Vec<AST>,
    },
    LiteralPrimitive(LiteralValue),
    LiteralArray(Vec<AST>),
    LiteralMap {
        keys: Vec<String>,
        values: Vec<AST>,
    },
    Interpolation {
        strings: Vec<String>,
        expressions: Vec<AST>,
    },
    Binary {
        operation: String,
        left: Box<AST>,
        right: Box<AST>,
    },
    PrefixNot(Box<AST>),
}

impl AST {
    pub fn is_implicit_receiver(&self) -> bool {
        matches!(self, AST::ImplicitReceiver)
    }

    pub fn is_assignable(&self) -> bool {
        matches!(self, AST::PropertyRead { .. } | AST::KeyedRead { .. })
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[AST]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

fn write_receiver(f: &mut fmt::Formatter<'_>, receiver: &AST, separator: &str) -> fmt::Result {
    if receiver.is_implicit_receiver() {
        Ok(())
    } else {
        write!(f, "{}{}", receiver, separator)
    }
}

/// Unparses the AST back into expression source.
impl fmt::Display for AST {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AST::EmptyExpr | AST::ImplicitReceiver => Ok(()),
            AST::Chain(expressions) => {
                for (i, exp) in expressions.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", exp)?;
                }
                Ok(())
            }
            AST::Conditional {
                condition,
                true_exp,
                false_exp,
            } => write!(f, "{} ? {} : {}", condition, true_exp, false_exp),
            AST::PropertyRead { receiver, name } => {
                write_receiver(f, receiver, ".")?;
                write!(f, "{}", name)
            }
            AST::SafePropertyRead { receiver, name } => write!(f, "{}?.{}", receiver, name),
            AST::PropertyWrite {
                receiver,
                name,
                value,
            } => {
                write_receiver(f, receiver, ".")?;
                write!(f, "{} = {}", name, value)
            }
            AST::KeyedRead { obj, key } => write!(f, "{}[{}]", obj, key),
            AST::KeyedWrite { obj, key, value } => write!(f, "{}[{}] = {}", obj, key, value),
            AST::MethodCall {
                receiver,
                name,
                args,
            } => {
                write_receiver(f, receiver, ".")?;
                write!(f, "{}(", name)?;
                write_args(f, args)?;
                write!(f, ")")
            }
            AST::SafeMethodCall {
                receiver,
                name,
                args,
            } => {
                write!(f, "{}?.{}(", receiver, name)?;
                write_args(f, args)?;
                write!(f, ")")
            }
            AST::FunctionCall { target, args } => {
                write!(f, "{}(", target)?;
                write_args(f, args)?;
                write!(f, ")")
            }
            AST::Pipe { exp, name, args } => {
                write!(f, "({} | {}", exp, name)?;
                for arg in args {
                    write!(f, ":{}", arg)?;
                }
                write!(f, ")")
            }
            AST::LiteralPrimitive(value) => write!(f, "{}", value),
            AST::LiteralArray(values) => {
                write!(f, "[")?;
                write_args(f, values)?;
                write!(f, "]")
            }
            AST::LiteralMap { keys, values } => {
                write!(f, "{{")?;
                for (i, (key, value)) in keys.iter().zip(values).enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            AST::Interpolation {
                strings,
                expressions,
            } => {
                for (i, s) in strings.iter().enumerate() {
                    write!(f, "{}", s)?;
                    if let Some(exp) = expressions.get(i) {
                        write!(f, "{{{{{}}}}}", exp)?;
                    }
                }
                Ok(())
            }
            AST::Binary {
                operation,
                left,
                right,
            } => write!(f, "{} {} {}", left, operation, right),
            AST::PrefixNot(exp) => write!(f, "!{}", exp),
        }
    }
}

/// An expression together with the source it was parsed from and a
/// location description used in error messages.
#[derive(Debug, Clone, PartialEq)]
pub struct ASTWithSource {
    pub ast: AST,
    pub source: String,
    pub location: String,
}

impl ASTWithSource {
    pub fn new(ast: AST, source: impl Into<String>, location: impl Into<String>) -> Self {
        ASTWithSource {
            ast,
            source: source.into(),
            location: location.into(),
        }
    }
}

impl fmt::Display for ASTWithSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.source, self.location)
    }
}

/// One binding of the template microsyntax, e.g. `#item` or `ngForOf items`
/// in `*ng-for="#item of items"`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateBinding {
    pub key: String,
    pub key_is_var: bool,
    pub name: Option<String>,
    pub expression: Option<ASTWithSource>,
}
