//! Change Detection Records
//!
//! Binding expressions lowered into flat evaluation steps and deduplicated
//! across bindings.

pub mod binding_record;
pub mod coalesce;
pub mod directive_record;
pub mod proto_record;
pub mod proto_record_builder;

pub use binding_record::{BindingRecord, BindingTarget, ImplicitReceiver};
pub use coalesce::coalesce;
pub use directive_record::{
    ChangeDetectionStrategy, DirectiveIndex, DirectiveRecord, LifecycleEvent, LifecycleHooks,
};
pub use proto_record::{FuncOrValue, FunctionRef, PrimitiveOp, ProtoRecord, RecordType};
pub use proto_record_builder::ProtoRecordBuilder;
