//! Compile Pipeline
//!
//! Walks an element tree once, running every compile step on each element
//! before descending into its children.

use super::compile_control::CompileControl;
use super::compile_element::CompileElement;
use super::compile_step::CompileStep;
use crate::error::Result;
use crate::ml_parser::Element;
use std::rc::Rc;

pub struct CompilePipeline {
    steps: Vec<Box<dyn CompileStep>>,
}

impl CompilePipeline {
    pub fn new(steps: Vec<Box<dyn CompileStep>>) -> Self {
        CompilePipeline { steps }
    }

    /// Process `root` and its descendants. Elements are returned in
    /// pre-order, including children added by steps.
    pub fn process(&self, root: CompileElement) -> Result<Vec<CompileElement>> {
        let mut results = Vec::new();
        self.process_element(&mut results, None, root)?;
        Ok(results)
    }

    pub fn process_element_tree(&self, root: Element) -> Result<Vec<CompileElement>> {
        self.process(CompileElement::from_element(root))
    }

    fn process_element(
        &self,
        results: &mut Vec<CompileElement>,
        parent: Option<&CompileElement>,
        mut current: CompileElement,
    ) -> Result<()> {
        let mut control = CompileControl::new();
        for step in &self.steps {
            step.process(parent, &mut current, &mut control)?;
        }

        let slot = results.len();
        if current.compile_children && !control.ignores_children() {
            let children: Vec<Rc<Element>> = current.element.child_elements().cloned().collect();
            for child in children {
                self.process_element(results, Some(&current), CompileElement::new(child))?;
            }
        }
        for child in control.take_additional_children() {
            self.process_element(results, Some(&current), child)?;
        }

        results.insert(slot, current);
        Ok(())
    }
}
