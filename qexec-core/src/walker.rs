//! Depth-first traversal of instruction trees

use crate::{Composite, Instruction};

/// What the walker yields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Composites (before their children) and gate leaves
    All,
    /// Gate leaves only; composites are still descended into
    Leaves,
}

/// Pre-order iterator over the enabled part of a tree
///
/// The root composite itself is not yielded. A disabled node is skipped
/// together with everything beneath it.
#[derive(Debug, Clone)]
pub struct InstructionIter<'a> {
    stack: Vec<std::slice::Iter<'a, Instruction>>,
    mode: WalkMode,
}

impl<'a> InstructionIter<'a> {
    pub fn new(root: &'a Composite, mode: WalkMode) -> Self {
        Self {
            stack: vec![root.children().iter()],
            mode,
        }
    }
}

impl<'a> Iterator for InstructionIter<'a> {
    type Item = &'a Instruction;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(instruction) = self.stack.last_mut()?.next() else {
                self.stack.pop();
                continue;
            };

            if !instruction.is_enabled() {
                continue;
            }

            if let Instruction::Composite(composite) = instruction {
                self.stack.push(composite.children().iter());
                if self.mode == WalkMode::Leaves {
                    continue;
                }
            }
            return Some(instruction);
        }
    }
}
