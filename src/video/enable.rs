//! Reference counted enable/disable of texture targets, a replacement for the
//! deprecated attribute stack. Only works as it should if nobody else toggles
//! the same targets on the driver directly.

use std::collections::HashMap;

use crate::errors::*;
use crate::video::backends::Visitor;
use crate::video::texture::Target;

#[derive(Debug, Default)]
pub struct EnableCounter {
    counts: HashMap<Target, u32>,
}

impl EnableCounter {
    pub fn new() -> Self {
        EnableCounter::default()
    }

    /// Increments the counter of `target`, asserting the toggle on the driver
    /// when it leaves zero.
    pub unsafe fn acquire(&mut self, visitor: &mut dyn Visitor, target: Target) -> Result<()> {
        let count = self.counts.entry(target).or_insert(0);
        if *count == 0 {
            visitor.enable(target)?;
        }

        *count += 1;
        Ok(())
    }

    /// Decrements the counter of `target`, clearing the toggle on the driver
    /// when it reaches zero. Never goes below zero.
    pub unsafe fn release(&mut self, visitor: &mut dyn Visitor, target: Target) -> Result<()> {
        let count = self.counts.entry(target).or_insert(0);
        match *count {
            0 => Ok(()),
            1 => {
                *count = 0;
                visitor.disable(target)
            }
            _ => {
                *count -= 1;
                Ok(())
            }
        }
    }

    pub fn count(&self, target: Target) -> u32 {
        self.counts.get(&target).cloned().unwrap_or(0)
    }
}
