//! Directive Bindings
//!
//! Identity of directive types and the values a component view may list in
//! its `directives`.

use crate::render::api::DirectiveMetadata;
use std::fmt;
use std::rc::Rc;

/// Identity of a component or directive type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Type(Rc<str>);

impl Type {
    pub fn new(name: &str) -> Self {
        Type(Rc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Type {
    fn from(name: &str) -> Self {
        Type::new(name)
    }
}

/// Provider-style entry binding `token` to the type that implements it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    pub token: Type,
    pub to_class: Option<Type>,
}

impl Binding {
    pub fn new(token: Type) -> Self {
        Binding { token, to_class: None }
    }

    pub fn to_class(mut self, class: Type) -> Self {
        self.to_class = Some(class);
        self
    }
}

/// An entry of a view's `directives` list
#[derive(Clone)]
pub enum DirectiveValue {
    Type(Type),
    Binding(Binding),
    List(Vec<DirectiveValue>),
    /// Resolved lazily, allowing types declared later to be referenced
    ForwardRef(Rc<dyn Fn() -> DirectiveValue>),
    /// Anything that is not a directive, kept for error reporting
    Invalid(String),
}

impl DirectiveValue {
    pub fn forward_ref(resolve: impl Fn() -> DirectiveValue + 'static) -> Self {
        DirectiveValue::ForwardRef(Rc::new(resolve))
    }

    /// The value with forward references resolved.
    pub fn resolve_forward_ref(&self) -> DirectiveValue {
        let mut value = self.clone();
        loop {
            match value {
                DirectiveValue::ForwardRef(resolve) => value = resolve(),
                resolved => return resolved,
            }
        }
    }

    /// The key type of a directive value, if it is one.
    pub fn token(&self) -> Option<&Type> {
        match self {
            DirectiveValue::Type(ty) => Some(ty),
            DirectiveValue::Binding(binding) => Some(&binding.token),
            _ => None,
        }
    }
}

impl From<Type> for DirectiveValue {
    fn from(ty: Type) -> Self {
        DirectiveValue::Type(ty)
    }
}

impl From<&str> for DirectiveValue {
    fn from(name: &str) -> Self {
        DirectiveValue::Type(Type::new(name))
    }
}

impl From<Binding> for DirectiveValue {
    fn from(binding: Binding) -> Self {
        DirectiveValue::Binding(binding)
    }
}

impl<T: Into<DirectiveValue>> From<Vec<T>> for DirectiveValue {
    fn from(values: Vec<T>) -> Self {
        DirectiveValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl fmt::Debug for DirectiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveValue::Type(ty) => f.debug_tuple("Type").field(ty).finish(),
            DirectiveValue::Binding(binding) => f.debug_tuple("Binding").field(binding).finish(),
            DirectiveValue::List(values) => f.debug_tuple("List").field(values).finish(),
            DirectiveValue::ForwardRef(_) => f.write_str("ForwardRef(..)"),
            DirectiveValue::Invalid(value) => f.debug_tuple("Invalid").field(value).finish(),
        }
    }
}

impl fmt::Display for DirectiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveValue::Type(ty) => write!(f, "{}", ty),
            DirectiveValue::Binding(binding) => write!(f, "Binding({})", binding.token),
            DirectiveValue::List(values) => {
                let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            DirectiveValue::ForwardRef(_) => write!(f, "{}", self.resolve_forward_ref()),
            DirectiveValue::Invalid(value) => f.write_str(value),
        }
    }
}

/// A directive type together with its resolved metadata
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveBinding {
    pub key: Type,
    pub metadata: DirectiveMetadata,
}

impl DirectiveBinding {
    pub fn new(key: Type, metadata: DirectiveMetadata) -> Self {
        DirectiveBinding { key, metadata }
    }

    pub fn is_component(&self) -> bool {
        self.metadata.is_component()
    }
}
