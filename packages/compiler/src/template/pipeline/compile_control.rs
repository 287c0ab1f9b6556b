//! Compile Control
//!
//! Lets a compile step influence the traversal of the element it is
//! processing.

use super::compile_element::CompileElement;

#[derive(Debug, Default)]
pub struct CompileControl {
    additional_children: Vec<CompileElement>,
    ignore_children: bool,
}

impl CompileControl {
    pub fn new() -> Self {
        CompileControl::default()
    }

    /// Process `element` as a child of the current element, after its real
    /// children.
    pub fn add_child(&mut self, element: CompileElement) {
        self.additional_children.push(element);
    }

    /// Do not descend into the children of the current element.
    pub fn ignore_current_children(&mut self) {
        self.ignore_children = true;
    }

    pub(crate) fn ignores_children(&self) -> bool {
        self.ignore_children
    }

    pub(crate) fn take_additional_children(&mut self) -> Vec<CompileElement> {
        std::mem::take(&mut self.additional_children)
    }
}
