//! # Deadline-Aware Annotation
//!
//! A partially annotated graph must never reach readers, so the budget is
//! checked exactly once, before the first rule. A run that starts in time
//! finishes even if it overruns.

use std::time::{Duration, Instant};

use tracing::warn;

use lexgraph_core::LegalGraph;

use crate::effectiveness::{AnnotationReport, EffectivenessEngine};
use crate::error::{EngineError, EngineResult};

/// A time budget measured from its creation.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    /// A deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// A deadline `ms` milliseconds from now.
    pub fn after_millis(ms: u64) -> Self {
        Self::after(Duration::from_millis(ms))
    }

    /// The full budget.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Budget left; zero once expired.
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.started.elapsed())
    }

    /// Whether the budget has been spent.
    pub fn expired(&self) -> bool {
        self.started.elapsed() >= self.budget
    }

    /// `Err(DeadlineExceeded)` once expired.
    pub fn check(&self) -> EngineResult<()> {
        if self.expired() {
            let budget_ms = u64::try_from(self.budget.as_millis()).unwrap_or(u64::MAX);
            warn!(budget_ms, "deadline passed before annotation");
            return Err(EngineError::DeadlineExceeded { budget_ms });
        }
        Ok(())
    }
}

impl EffectivenessEngine {
    /// Run the pipeline unless `deadline` has already passed.
    pub fn run_within(
        &self,
        graph: &mut LegalGraph,
        deadline: &Deadline,
    ) -> EngineResult<AnnotationReport> {
        deadline.check()?;
        self.run(graph)
    }
}

/// [`crate::annotate`] behind a deadline check, with default options.
pub fn annotate_within(
    graph: &mut LegalGraph,
    deadline: &Deadline,
) -> EngineResult<AnnotationReport> {
    EffectivenessEngine::default().run_within(graph, deadline)
}
