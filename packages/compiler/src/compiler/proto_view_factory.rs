//! Proto View Factory
//!
//! Turns the render compiler's proto view DTOs into app proto views: binds
//! element binders to their directives and lowers every binding into
//! change-detection records.

use super::directive_binding::DirectiveBinding;
use super::view::{AppProtoView, ElementBinder, ProtoChangeDetector};
use crate::change_detection::{
    coalesce, BindingRecord, DirectiveIndex, DirectiveRecord, LifecycleEvent, ProtoRecordBuilder,
};
use crate::config::CompilerConfig;
use crate::error::{CompilerError, Result};
use crate::render::api::{ProtoViewDto, ViewType};
use log::trace;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct ProtoViewFactory {
    coalesce_records: bool,
}

impl ProtoViewFactory {
    pub fn new(config: &CompilerConfig) -> Self {
        ProtoViewFactory {
            coalesce_records: config.coalesce_records,
        }
    }

    /// Build the app proto view of `render` and of its embedded views.
    /// `directives` are indexed by the directive indices of the DTO.
    pub fn create_app_proto_views(
        &self,
        component: &DirectiveBinding,
        render: &ProtoViewDto,
        directives: &[DirectiveBinding],
    ) -> Result<Rc<AppProtoView>> {
        let mut view_index = 0;
        self.create_view(component, render, directives, &[], &mut view_index)
    }

    fn create_view(
        &self,
        component: &DirectiveBinding,
        dto: &ProtoViewDto,
        directives: &[DirectiveBinding],
        parent_variables: &[String],
        view_index: &mut usize,
    ) -> Result<Rc<AppProtoView>> {
        let id = format!("{}_{:?}_{}", component.key, dto.view_type, view_index).to_lowercase();
        *view_index += 1;

        let mut variable_names = parent_variables.to_vec();
        variable_names.extend(dto.variable_bindings.keys().cloned());
        for binder in &dto.element_binders {
            variable_names.extend(binder.variable_bindings.keys().cloned());
        }

        let (bindings, directive_records) = create_binding_records(dto, directives)?;
        let mut builder = ProtoRecordBuilder::new();
        for (binding_index, binding) in bindings.into_iter().enumerate() {
            builder.add(Rc::new(binding), &variable_names, binding_index)?;
        }
        let records = if self.coalesce_records {
            coalesce(builder.records())
        } else {
            builder.into_records()
        };
        trace!("Change detector {} has {} records", id, records.len());

        let mut element_binders = Vec::with_capacity(dto.element_binders.len());
        for binder in &dto.element_binders {
            let bound: Vec<DirectiveBinding> = binder
                .directives
                .iter()
                .map(|d| lookup_directive(directives, d.directive_index).cloned())
                .collect::<Result<_>>()?;
            let component_directive = binder
                .component_directive
                .and_then(|position| bound.get(position).cloned());
            let embedded = match (&component_directive, &binder.nested_proto_view) {
                (None, Some(nested)) => Some(self.create_view(
                    component,
                    nested,
                    directives,
                    &variable_names,
                    view_index,
                )?),
                _ => None,
            };
            element_binders.push(ElementBinder::new(
                binder.index,
                binder.parent_index,
                binder.distance_to_parent,
                bound,
                component_directive,
                embedded,
            ));
        }

        let strategy = if dto.view_type == ViewType::Component {
            component.metadata.change_detection
        } else {
            Default::default()
        };
        Ok(Rc::new(AppProtoView::new(
            dto.view_type,
            dto.render,
            element_binders,
            dto.variable_bindings.clone(),
            ProtoChangeDetector {
                id,
                strategy,
                records,
                directive_records,
            },
        )))
    }
}

fn lookup_directive(directives: &[DirectiveBinding], index: usize) -> Result<&DirectiveBinding> {
    directives.get(index).ok_or_else(|| CompilerError::InvalidDirective {
        value: format!("#{}", index),
        component: "render proto view".to_string(),
    })
}

/// Binding records of one view, in evaluation order: per element binder its
/// text nodes, element properties, then each directive's inputs, host
/// properties and lifecycle events.
fn create_binding_records(
    dto: &ProtoViewDto,
    directives: &[DirectiveBinding],
) -> Result<(Vec<BindingRecord>, Vec<Rc<DirectiveRecord>>)> {
    let mut bindings = Vec::new();
    let mut directive_records = Vec::new();
    let mut text_index = 0;

    for binder in &dto.element_binders {
        for text in &binder.text_bindings {
            bindings.push(BindingRecord::text_node(text_index, text.ast.clone()));
            text_index += 1;
        }
        for (property, ast) in &binder.property_bindings {
            bindings.push(BindingRecord::element_property(binder.index, property.clone(), ast.ast.clone()));
        }
        for (position, directive_binder) in binder.directives.iter().enumerate() {
            let metadata = &lookup_directive(directives, directive_binder.directive_index)?.metadata;
            let mut record = DirectiveRecord::new(DirectiveIndex::new(binder.index, position), metadata.hooks);
            record.change_detection = metadata.change_detection;
            let record = Rc::new(record);

            for (property, ast) in &directive_binder.property_bindings {
                bindings.push(BindingRecord::directive_property(record.clone(), property.clone(), ast.ast.clone()));
            }
            for (property, ast) in &directive_binder.host_property_bindings {
                bindings.push(BindingRecord::host_property(record.clone(), property.clone(), ast.ast.clone()));
            }
            for event in LifecycleEvent::for_hooks(metadata.hooks) {
                bindings.push(BindingRecord::directive_lifecycle(record.clone(), event));
            }
            directive_records.push(record);
        }
    }
    Ok((bindings, directive_records))
}
