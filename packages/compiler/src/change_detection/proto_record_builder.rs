//! Proto Record Builder
//!
//! Lowers binding expressions into a flat list of [`ProtoRecord`]s.

use super::binding_record::{BindingRecord, BindingTarget, ImplicitReceiver};
use super::directive_record::DirectiveIndex;
use super::proto_record::{FuncOrValue, PrimitiveOp, ProtoRecord, RecordType};
use crate::error::{CompilerError, Result};
use crate::expression_parser::{LiteralValue, AST};
use smallvec::SmallVec;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct ProtoRecordBuilder {
    records: Vec<ProtoRecord>,
}

impl ProtoRecordBuilder {
    pub fn new() -> Self {
        ProtoRecordBuilder::default()
    }

    /// Append the records for one binding. `variable_names` are the locals
    /// visible to the expression.
    pub fn add(
        &mut self,
        binding: Rc<BindingRecord>,
        variable_names: &[String],
        binding_index: usize,
    ) -> Result<()> {
        if let Some(old_last) = self.records.last_mut() {
            let same_directive = old_last
                .binding_record
                .as_ref()
                .map_or(false, |b| b.same_directive(&binding));
            if same_directive {
                old_last.last_in_directive = false;
            }
        }

        let records_before = self.records.len();
        self.append_records(&binding, variable_names, binding_index)?;

        if self.records.len() > records_before {
            if let Some(new_last) = self.records.last_mut() {
                new_last.last_in_binding = true;
                new_last.last_in_directive = true;
            }
            self.set_argument_to_pure_function(records_before);
        }
        Ok(())
    }

    pub fn records(&self) -> &[ProtoRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ProtoRecord> {
        self.records
    }

    fn set_argument_to_pure_function(&mut self, start: usize) {
        for i in start..self.records.len() {
            let record = &self.records[i];
            let mut operands: SmallVec<[usize; 4]> = SmallVec::new();
            if record.is_pure_function() || record.is_pipe_record() {
                operands.extend(record.args.iter().copied());
            }
            if record.is_pipe_record() && record.context_index > 0 {
                operands.push(record.context_index);
            }
            for operand in operands {
                self.records[operand - 1].argument_to_pure_function = true;
            }
        }
    }

    fn append_records(
        &mut self,
        binding: &Rc<BindingRecord>,
        variable_names: &[String],
        binding_index: usize,
    ) -> Result<()> {
        match (&binding.target, &binding.ast) {
            (BindingTarget::DirectiveLifecycle(event), _) => {
                let self_index = self.records.len() + 1;
                self.records.push(ProtoRecord {
                    directive_index: binding.directive_index(),
                    binding_record: Some(binding.clone()),
                    property_binding_index: binding_index,
                    ..ProtoRecord::new(RecordType::DirectiveLifecycle, event.name(), self_index)
                });
                Ok(())
            }
            (_, Some(ast)) => {
                let mut converter = AstConverter {
                    records: &mut self.records,
                    binding,
                    variable_names,
                    binding_index,
                };
                converter.visit(ast).map(|_| ())
            }
            (_, None) => Ok(()),
        }
    }
}

/// Result of visiting a node: the record holding its value, or a directive
/// instance when the node is the implicit receiver of a host binding.
#[derive(Debug, Clone, Copy)]
enum Context {
    Record(usize),
    Directive(DirectiveIndex),
}

impl Context {
    fn index(self) -> usize {
        match self {
            Context::Record(index) => index,
            Context::Directive(_) => 0,
        }
    }
}

struct AstConverter<'a> {
    records: &'a mut Vec<ProtoRecord>,
    binding: &'a Rc<BindingRecord>,
    variable_names: &'a [String],
    binding_index: usize,
}

impl<'a> AstConverter<'a> {
    fn is_variable(&self, receiver: &AST, name: &str) -> bool {
        receiver.is_implicit_receiver() && self.variable_names.iter().any(|v| v == name)
    }

    fn visit_all(&mut self, asts: &[AST]) -> Result<SmallVec<[usize; 4]>> {
        asts.iter().map(|ast| self.visit(ast).map(Context::index)).collect()
    }

    fn visit(&mut self, ast: &AST) -> Result<Context> {
        let index = match ast {
            AST::ImplicitReceiver => {
                return Ok(match self.binding.implicit_receiver {
                    ImplicitReceiver::Context => Context::Record(0),
                    ImplicitReceiver::Directive(directive) => Context::Directive(directive),
                })
            }
            AST::EmptyExpr => self.add_record(
                RecordType::Const,
                "literal",
                FuncOrValue::Const(LiteralValue::Undefined),
                SmallVec::new(),
                Vec::new(),
                Context::Record(0),
            ),
            AST::Interpolation {
                strings,
                expressions,
            } => {
                let args = self.visit_all(expressions)?;
                self.add_record(
                    RecordType::Interpolate,
                    "interpolate",
                    FuncOrValue::Interpolation(strings.clone()),
                    args,
                    strings.clone(),
                    Context::Record(0),
                )
            }
            AST::LiteralPrimitive(value) => self.add_record(
                RecordType::Const,
                "literal",
                FuncOrValue::Const(value.clone()),
                SmallVec::new(),
                Vec::new(),
                Context::Record(0),
            ),
            AST::PropertyRead { receiver, name } => {
                let context = self.visit(receiver)?;
                let mode = if self.is_variable(receiver, name) {
                    RecordType::Local
                } else {
                    RecordType::PropertyRead
                };
                self.add_record(
                    mode,
                    name,
                    FuncOrValue::Accessor(name.clone()),
                    SmallVec::new(),
                    Vec::new(),
                    context,
                )
            }
            AST::SafePropertyRead { receiver, name } => {
                let context = self.visit(receiver)?;
                self.add_record(
                    RecordType::SafeProperty,
                    name,
                    FuncOrValue::Accessor(name.clone()),
                    SmallVec::new(),
                    Vec::new(),
                    context,
                )
            }
            AST::PropertyWrite {
                receiver,
                name,
                value,
            } => {
                if self.is_variable(receiver, name) {
                    return Err(CompilerError::VariableReassignment { name: name.clone() });
                }
                let context = self.visit(receiver)?;
                let value = self.visit(value)?.index();
                self.add_record(
                    RecordType::PropertyWrite,
                    name,
                    FuncOrValue::Accessor(name.clone()),
                    SmallVec::from_slice(&[value]),
                    Vec::new(),
                    context,
                )
            }
            AST::KeyedRead { obj, key } => {
                let context = self.visit(obj)?;
                let key = self.visit(key)?.index();
                self.add_record(
                    RecordType::KeyedRead,
                    "keyedAccess",
                    FuncOrValue::None,
                    SmallVec::from_slice(&[key]),
                    Vec::new(),
                    context,
                )
            }
            AST::KeyedWrite { obj, key, value } => {
                let context = self.visit(obj)?;
                let key = self.visit(key)?.index();
                let value = self.visit(value)?.index();
                self.add_record(
                    RecordType::KeyedWrite,
                    "keyedWrite",
                    FuncOrValue::None,
                    SmallVec::from_slice(&[key, value]),
                    Vec::new(),
                    context,
                )
            }
            AST::MethodCall {
                receiver,
                name,
                args,
            } => {
                let context = self.visit(receiver)?;
                let args = self.visit_all(args)?;
                if self.is_variable(receiver, name) {
                    let target = self.add_record(
                        RecordType::Local,
                        name,
                        FuncOrValue::Accessor(name.clone()),
                        SmallVec::new(),
                        Vec::new(),
                        context,
                    );
                    self.add_record(
                        RecordType::InvokeClosure,
                        "closure",
                        FuncOrValue::None,
                        args,
                        Vec::new(),
                        Context::Record(target),
                    )
                } else {
                    self.add_record(
                        RecordType::InvokeMethod,
                        name,
                        FuncOrValue::Accessor(name.clone()),
                        args,
                        Vec::new(),
                        context,
                    )
                }
            }
            AST::SafeMethodCall {
                receiver,
                name,
                args,
            } => {
                let context = self.visit(receiver)?;
                let args = self.visit_all(args)?;
                self.add_record(
                    RecordType::SafeMethodInvoke,
                    name,
                    FuncOrValue::Accessor(name.clone()),
                    args,
                    Vec::new(),
                    context,
                )
            }
            AST::FunctionCall { target, args } => {
                let target = self.visit(target)?;
                let args = self.visit_all(args)?;
                self.add_record(
                    RecordType::InvokeClosure,
                    "closure",
                    FuncOrValue::None,
                    args,
                    Vec::new(),
                    target,
                )
            }
            AST::LiteralArray(values) => {
                let op = PrimitiveOp::ArrayLiteral(values.len());
                let args = self.visit_all(values)?;
                self.add_record(
                    RecordType::CollectionLiteral,
                    &op.name(),
                    FuncOrValue::Operation(op),
                    args,
                    Vec::new(),
                    Context::Record(0),
                )
            }
            AST::LiteralMap { keys, values } => {
                let op = PrimitiveOp::MapLiteral(keys.clone());
                let args = self.visit_all(values)?;
                self.add_record(
                    RecordType::CollectionLiteral,
                    &op.name(),
                    FuncOrValue::Operation(op),
                    args,
                    Vec::new(),
                    Context::Record(0),
                )
            }
            AST::Binary {
                operation,
                left,
                right,
            } => {
                let left = self.visit(left)?.index();
                let right = self.visit(right)?.index();
                let op = PrimitiveOp::Binary(operation.clone());
                self.add_record(
                    RecordType::PrimitiveOp,
                    &op.name(),
                    FuncOrValue::Operation(op),
                    SmallVec::from_slice(&[left, right]),
                    Vec::new(),
                    Context::Record(0),
                )
            }
            AST::PrefixNot(exp) => {
                let exp = self.visit(exp)?.index();
                let op = PrimitiveOp::Negate;
                self.add_record(
                    RecordType::PrimitiveOp,
                    &op.name(),
                    FuncOrValue::Operation(op),
                    SmallVec::from_slice(&[exp]),
                    Vec::new(),
                    Context::Record(0),
                )
            }
            AST::Conditional {
                condition,
                true_exp,
                false_exp,
            } => {
                let condition = self.visit(condition)?.index();
                let true_exp = self.visit(true_exp)?.index();
                let false_exp = self.visit(false_exp)?.index();
                let op = PrimitiveOp::Conditional;
                self.add_record(
                    RecordType::PrimitiveOp,
                    &op.name(),
                    FuncOrValue::Operation(op),
                    SmallVec::from_slice(&[condition, true_exp, false_exp]),
                    Vec::new(),
                    Context::Record(0),
                )
            }
            AST::Pipe { exp, name, args } => {
                let value = self.visit(exp)?;
                let args = self.visit_all(args)?;
                self.add_record(
                    RecordType::Pipe,
                    name,
                    FuncOrValue::Accessor(name.clone()),
                    args,
                    Vec::new(),
                    value,
                )
            }
            AST::Chain(expressions) => {
                let args = self.visit_all(expressions)?;
                self.add_record(
                    RecordType::Chain,
                    "chain",
                    FuncOrValue::None,
                    args,
                    Vec::new(),
                    Context::Record(0),
                )
            }
        };
        Ok(Context::Record(index))
    }

    fn add_record(
        &mut self,
        mode: RecordType,
        name: &str,
        func_or_value: FuncOrValue,
        args: SmallVec<[usize; 4]>,
        fixed_args: Vec<String>,
        context: Context,
    ) -> usize {
        let self_index = self.records.len() + 1;
        let (context_index, directive_index) = match context {
            Context::Record(index) => (index, None),
            Context::Directive(directive) => (0, Some(directive)),
        };
        self.records.push(ProtoRecord {
            func_or_value,
            args,
            fixed_args,
            context_index,
            directive_index,
            binding_record: Some(self.binding.clone()),
            property_binding_index: self.binding_index,
            ..ProtoRecord::new(mode, name, self_index)
        });
        self_index
    }
}
