//! Render View Store
//!
//! Keeps every render proto view handed out by the render compiler, both
//! freshly compiled ones and the flat views produced by merging.

use super::api::{MergeChild, MergeTree, ProtoViewDto, RenderProtoViewMergeMapping, RenderProtoViewRef, ViewType};
use crate::error::{CompilerError, Result};
use log::trace;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
enum StoredView {
    Compiled(CompiledView),
    Merged(MergedView),
}

#[derive(Debug, Clone, PartialEq)]
struct CompiledView {
    view_type: ViewType,
    element_count: usize,
    /// Binders hosting a component or an embedded view, in binder order
    slots: Vec<NestedSlot>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NestedSlot {
    Component { element_index: usize },
    Embedded { element_index: usize, view: RenderProtoViewRef },
}

#[derive(Debug, Clone, PartialEq)]
struct MergedView {
    element_count: usize,
    views: Vec<MergedViewInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MergedViewInfo {
    /// Host element within the merged view, `None` for the root view
    host_element_index: Option<usize>,
    nested_view_count: usize,
}

#[derive(Debug, Default)]
pub struct RenderViewStore {
    views: HashMap<RenderProtoViewRef, StoredView>,
    next_id: usize,
}

impl RenderViewStore {
    pub fn new() -> Self {
        RenderViewStore::default()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn contains(&self, view: RenderProtoViewRef) -> bool {
        self.views.contains_key(&view)
    }

    /// Register a compiled view. Nested embedded views must already carry
    /// their own reference.
    pub fn register_compiled(&mut self, dto: &ProtoViewDto) -> RenderProtoViewRef {
        let slots = dto
            .element_binders
            .iter()
            .filter_map(|binder| {
                if binder.component_directive.is_some() {
                    Some(NestedSlot::Component {
                        element_index: binder.element_index,
                    })
                } else {
                    binder.nested_proto_view.as_ref().map(|nested| NestedSlot::Embedded {
                        element_index: binder.element_index,
                        view: nested.render,
                    })
                }
            })
            .collect();
        self.allocate(StoredView::Compiled(CompiledView {
            view_type: dto.view_type,
            element_count: dto.element_count,
            slots,
        }))
    }

    /// Merge `tree` and every embedded subtree in it. Mappings are returned
    /// in pre-order; unresolved subtrees are skipped.
    pub fn merge(&mut self, tree: &MergeTree) -> Result<Vec<RenderProtoViewMergeMapping>> {
        let mut mappings = Vec::new();
        self.merge_into(tree, &mut mappings)?;
        Ok(mappings)
    }

    fn merge_into(&mut self, tree: &MergeTree, out: &mut Vec<RenderProtoViewMergeMapping>) -> Result<()> {
        let slot = out.len();
        let root = match self.views.get(&tree.root) {
            Some(StoredView::Compiled(view)) => view.clone(),
            Some(StoredView::Merged(_)) => {
                return Err(CompilerError::InvalidMergeTree {
                    message: format!("{} is already merged", tree.root),
                })
            }
            None => return Err(CompilerError::UnknownRenderProtoView(tree.root.0)),
        };
        if tree.children.len() > root.slots.len() {
            return Err(CompilerError::InvalidMergeTree {
                message: format!(
                    "{} has {} nested views but {} were given",
                    tree.root,
                    root.slots.len(),
                    tree.children.len()
                ),
            });
        }

        let mut element_count = root.element_count;
        let mut mapped_element_indices: Vec<usize> = (0..element_count).collect();
        let mut host_element_indices = vec![None];
        let mut nested_view_counts = vec![0];

        for (nested_slot, child) in root.slots.iter().zip(&tree.children) {
            match (nested_slot, child) {
                (_, MergeChild::Unresolved) => {}
                (NestedSlot::Component { element_index }, MergeChild::Component(component)) => {
                    let component = self.merged_view(*component)?;
                    let offset = element_count;
                    for info in &component.views {
                        host_element_indices.push(Some(
                            info.host_element_index.map_or(*element_index, |host| host + offset),
                        ));
                        nested_view_counts.push(info.nested_view_count);
                    }
                    mapped_element_indices.extend(offset..offset + component.element_count);
                    element_count += component.element_count;
                }
                (NestedSlot::Embedded { view, .. }, MergeChild::Embedded(subtree)) if subtree.root == *view => {
                    self.merge_into(subtree, out)?;
                }
                _ => {
                    return Err(CompilerError::InvalidMergeTree {
                        message: format!("nested views do not match the element binders of {}", tree.root),
                    })
                }
            }
        }

        nested_view_counts[0] = host_element_indices.len() - 1;
        let views = host_element_indices
            .iter()
            .zip(&nested_view_counts)
            .map(|(&host_element_index, &nested_view_count)| MergedViewInfo {
                host_element_index,
                nested_view_count,
            })
            .collect();
        let merged_proto_view_ref = self.allocate(StoredView::Merged(MergedView { element_count, views }));
        trace!(
            "Merged {} ({:?}) into {} with {} views",
            tree.root,
            root.view_type,
            merged_proto_view_ref,
            host_element_indices.len()
        );

        out.insert(
            slot,
            RenderProtoViewMergeMapping {
                merged_proto_view_ref,
                fragment_count: 1,
                mapped_element_indices,
                host_element_indices_by_view_index: host_element_indices,
                nested_view_count_by_view_index: nested_view_counts,
            },
        );
        Ok(())
    }

    /// A view to inline into its host. Unmerged views count as a single view.
    fn merged_view(&self, view: RenderProtoViewRef) -> Result<MergedView> {
        match self.views.get(&view) {
            Some(StoredView::Merged(merged)) => Ok(merged.clone()),
            Some(StoredView::Compiled(compiled)) => Ok(MergedView {
                element_count: compiled.element_count,
                views: vec![MergedViewInfo {
                    host_element_index: None,
                    nested_view_count: 0,
                }],
            }),
            None => Err(CompilerError::UnknownRenderProtoView(view.0)),
        }
    }

    fn allocate(&mut self, view: StoredView) -> RenderProtoViewRef {
        let view_ref = RenderProtoViewRef(self.next_id);
        self.next_id += 1;
        self.views.insert(view_ref, view);
        view_ref
    }
}
