//! Proto Records
//!
//! A flattened binding expression: each record is one evaluation step whose
//! operands are earlier records, referenced by their 1-based `self_index`.

use super::binding_record::BindingRecord;
use super::directive_record::DirectiveIndex;
use crate::expression_parser::LiteralValue;
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordType {
    /// Alias for the value of an earlier terminal record
    SelfReference,
    Const,
    PrimitiveOp,
    #[default]
    PropertyRead,
    PropertyWrite,
    Local,
    InvokeMethod,
    InvokeClosure,
    KeyedRead,
    KeyedWrite,
    Pipe,
    Interpolate,
    SafeProperty,
    SafeMethodInvoke,
    CollectionLiteral,
    DirectiveLifecycle,
    Chain,
}

impl RecordType {
    /// Pure functions are recomputed only when an argument changes.
    pub fn is_pure_function(self) -> bool {
        matches!(
            self,
            RecordType::Interpolate | RecordType::CollectionLiteral | RecordType::PrimitiveOp
        )
    }
}

/// Pure operations performed by `PrimitiveOp` and `CollectionLiteral`
/// records.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveOp {
    Binary(String),
    Negate,
    Conditional,
    ArrayLiteral(usize),
    MapLiteral(Vec<String>),
}

impl PrimitiveOp {
    pub fn name(&self) -> String {
        match self {
            PrimitiveOp::Binary(op) => format!("operation_{}", binary_operation_name(op)),
            PrimitiveOp::Negate => "operation_negate".to_string(),
            PrimitiveOp::Conditional => "cond".to_string(),
            PrimitiveOp::ArrayLiteral(len) => format!("arrayFn{}", len),
            PrimitiveOp::MapLiteral(keys) => format!("mapFn([{}])", keys.join(",")),
        }
    }
}

fn binary_operation_name(op: &str) -> &str {
    match op {
        "+" => "add",
        "-" => "subtract",
        "*" => "multiply",
        "/" => "divide",
        "%" => "remainder",
        "==" => "equals",
        "!=" => "not_equals",
        "===" => "identical",
        "!==" => "not_identical",
        "<" => "less_then",
        ">" => "greater_then",
        "<=" => "less_or_equals_then",
        ">=" => "greater_or_equals_then",
        "&&" => "logical_and",
        "||" => "logical_or",
        other => other,
    }
}

/// A host function whose equality is identity, not behavior.
#[derive(Clone)]
pub struct FunctionRef(Rc<str>);

impl FunctionRef {
    pub fn new(name: &str) -> Self {
        FunctionRef(Rc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionRef({})", self.0)
    }
}

/// The accessor, constant or function a record evaluates
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FuncOrValue {
    #[default]
    None,
    Const(LiteralValue),
    /// Getter, setter, method or pipe looked up by name
    Accessor(String),
    Operation(PrimitiveOp),
    Interpolation(Vec<String>),
    Function(FunctionRef),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProtoRecord {
    pub mode: RecordType,
    pub name: String,
    pub func_or_value: FuncOrValue,
    pub args: SmallVec<[usize; 4]>,
    pub fixed_args: Vec<String>,
    /// 0 is the root context
    pub context_index: usize,
    pub directive_index: Option<DirectiveIndex>,
    pub self_index: usize,
    pub binding_record: Option<Rc<BindingRecord>>,
    pub last_in_binding: bool,
    pub last_in_directive: bool,
    pub argument_to_pure_function: bool,
    pub referenced_by_self: bool,
    pub property_binding_index: usize,
}

impl ProtoRecord {
    pub fn new(mode: RecordType, name: impl Into<String>, self_index: usize) -> Self {
        ProtoRecord {
            mode,
            name: name.into(),
            self_index,
            ..ProtoRecord::default()
        }
    }

    pub fn is_pure_function(&self) -> bool {
        self.mode.is_pure_function()
    }

    pub fn is_used_by_other_record(&self) -> bool {
        !self.last_in_binding || self.referenced_by_self
    }

    pub fn should_be_checked(&self) -> bool {
        self.argument_to_pure_function
            || self.last_in_binding
            || self.is_pure_function()
            || self.is_pipe_record()
    }

    pub fn is_pipe_record(&self) -> bool {
        self.mode == RecordType::Pipe
    }

    pub fn is_lifecycle_record(&self) -> bool {
        self.mode == RecordType::DirectiveLifecycle
    }
}
