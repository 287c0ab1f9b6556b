//! Directive Records
//!
//! Identify a directive instance within a view and the lifecycle hooks the
//! change detector must call on it.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a directive: which element it sits on and which of that
/// element's directives it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DirectiveIndex {
    pub element_index: usize,
    pub directive_index: usize,
}

impl DirectiveIndex {
    pub fn new(element_index: usize, directive_index: usize) -> Self {
        DirectiveIndex {
            element_index,
            directive_index,
        }
    }

    pub fn name(&self) -> String {
        format!("{}_{}", self.element_index, self.directive_index)
    }
}

bitflags! {
    /// Lifecycle hooks implemented by a directive
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LifecycleHooks: u32 {
        const ON_CHANGES = 1 << 0;
        const ON_INIT = 1 << 1;
        const DO_CHECK = 1 << 2;
        const AFTER_CONTENT_INIT = 1 << 3;
        const AFTER_CONTENT_CHECKED = 1 << 4;
        const AFTER_VIEW_INIT = 1 << 5;
        const AFTER_VIEW_CHECKED = 1 << 6;
        const ON_DESTROY = 1 << 7;
    }
}

/// A lifecycle hook that the change detector itself dispatches while
/// checking bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    OnChanges,
    OnInit,
    DoCheck,
}

impl LifecycleEvent {
    pub fn name(self) -> &'static str {
        match self {
            LifecycleEvent::OnChanges => "onChanges",
            LifecycleEvent::OnInit => "onInit",
            LifecycleEvent::DoCheck => "doCheck",
        }
    }

    /// Events to dispatch for a directive implementing `hooks`, in call order.
    pub fn for_hooks(hooks: LifecycleHooks) -> Vec<LifecycleEvent> {
        let mut events = Vec::new();
        if hooks.contains(LifecycleHooks::ON_CHANGES) {
            events.push(LifecycleEvent::OnChanges);
        }
        if hooks.contains(LifecycleHooks::ON_INIT) {
            events.push(LifecycleEvent::OnInit);
        }
        if hooks.contains(LifecycleHooks::DO_CHECK) {
            events.push(LifecycleEvent::DoCheck);
        }
        events
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeDetectionStrategy {
    #[default]
    Default,
    OnPush,
}

/// A directive instance as seen by the change detector
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveRecord {
    pub directive_index: DirectiveIndex,
    pub hooks: LifecycleHooks,
    pub change_detection: ChangeDetectionStrategy,
}

impl DirectiveRecord {
    pub fn new(directive_index: DirectiveIndex, hooks: LifecycleHooks) -> Self {
        DirectiveRecord {
            directive_index,
            hooks,
            change_detection: ChangeDetectionStrategy::Default,
        }
    }

    pub fn calls_on_changes(&self) -> bool {
        self.hooks.contains(LifecycleHooks::ON_CHANGES)
    }

    pub fn is_on_push(&self) -> bool {
        self.change_detection == ChangeDetectionStrategy::OnPush
    }
}
