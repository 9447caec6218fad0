//! Pipeline Stage and Latch Interfaces.
//!
//! A cycle runs in two phases. In phase 0 every stage computes its output
//! from the state committed at the end of the previous cycle, through a
//! shared borrow of the CPU. In phase 1 the outputs are committed. Because
//! `compute` cannot mutate, no stage can observe another stage's result
//! from the same cycle.

use crate::core::Cpu;

/// A stage in the instruction pipeline.
pub trait PipelineStage {
    /// Everything the stage wants to publish this cycle.
    type Output;

    /// Phase 0: computes the stage's output from committed state.
    fn compute(cpu: &Cpu) -> Self::Output;

    /// Phase 1: publishes the output.
    fn commit(cpu: &mut Cpu, out: Self::Output);
}

/// A pipeline latch (inter-stage buffer).
pub trait PipelineLatch {
    /// Returns `true` if the latch carries no instruction.
    fn is_bubble(&self) -> bool;
}
