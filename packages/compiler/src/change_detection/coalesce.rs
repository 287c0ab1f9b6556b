//! Record Coalescing
//!
//! Removes records that repeat an earlier evaluation step so shared
//! sub-expressions are computed once per change detection pass.

use super::proto_record::{FuncOrValue, ProtoRecord, RecordType};
use log::trace;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Returns an equivalent list of records without duplicated steps.
///
/// - A duplicate that is not the last record of its binding is dropped and
///   references to it are redirected to the kept record.
/// - A duplicate that is last in its binding becomes a `SelfReference`
///   record pointing at the kept record, so every binding still ends in a
///   record of its own.
/// - Lifecycle records are never merged.
///
/// Input must be well formed: every `args` entry and `context_index` refers
/// to an earlier record.
pub fn coalesce(records: &[ProtoRecord]) -> Vec<ProtoRecord> {
    let mut res: Vec<ProtoRecord> = Vec::with_capacity(records.len());
    let mut index_map: HashMap<usize, usize> = HashMap::new();

    for r in records {
        let record = replace_indices(r, res.len() + 1, &index_map);

        match find_matching(&record, &res) {
            Some(pos) if record.last_in_binding => {
                let matched = res[pos].self_index;
                let alias = self_record(&record, matched, res.len() + 1);
                res.push(alias);
                index_map.insert(r.self_index, matched);
                res[pos].referenced_by_self = true;
            }
            Some(pos) => {
                if record.argument_to_pure_function {
                    res[pos].argument_to_pure_function = true;
                }
                index_map.insert(r.self_index, res[pos].self_index);
            }
            None => {
                index_map.insert(r.self_index, record.self_index);
                res.push(record);
            }
        }
    }

    trace!("coalesced {} records into {}", records.len(), res.len());
    res
}

fn self_record(r: &ProtoRecord, context_index: usize, self_index: usize) -> ProtoRecord {
    ProtoRecord {
        mode: RecordType::SelfReference,
        name: "self".to_string(),
        func_or_value: FuncOrValue::None,
        args: SmallVec::new(),
        fixed_args: r.fixed_args.clone(),
        context_index,
        directive_index: r.directive_index,
        self_index,
        binding_record: r.binding_record.clone(),
        last_in_binding: r.last_in_binding,
        last_in_directive: r.last_in_directive,
        argument_to_pure_function: false,
        referenced_by_self: false,
        property_binding_index: r.property_binding_index,
    }
}

fn find_matching(r: &ProtoRecord, rs: &[ProtoRecord]) -> Option<usize> {
    if matches!(r.mode, RecordType::DirectiveLifecycle | RecordType::SelfReference) {
        return None;
    }
    rs.iter().position(|candidate| {
        candidate.mode == r.mode
            && candidate.name == r.name
            && candidate.func_or_value == r.func_or_value
            && candidate.context_index == r.context_index
            && candidate.directive_index == r.directive_index
            && candidate.args == r.args
    })
}

fn replace_indices(r: &ProtoRecord, self_index: usize, index_map: &HashMap<usize, usize>) -> ProtoRecord {
    let map = |index: usize| index_map.get(&index).copied().unwrap_or(index);
    ProtoRecord {
        args: r.args.iter().map(|&a| map(a)).collect(),
        context_index: map(r.context_index),
        self_index,
        ..r.clone()
    }
}
