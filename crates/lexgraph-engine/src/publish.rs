//! # Graph Publication
//!
//! Readers hold an `Arc` to a finished, annotated graph. A refresh builds
//! and annotates a replacement without touching the published one, then
//! swaps the pointer under a short write lock. On any error the previous
//! graph stays published.
//!
//! The lock is `parking_lot::RwLock`: it is never held across the build or
//! the annotation, only across the pointer swap and snapshot clones.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use lexgraph_build::GraphBuilder;
use lexgraph_core::{LegalGraph, RecordBatches};

use crate::deadline::Deadline;
use crate::effectiveness::{AnnotationReport, EffectivenessEngine};
use crate::error::EngineResult;

/// One published generation of the graph.
#[derive(Debug)]
pub struct Published {
    /// Increments with every successful refresh; 0 is the empty graph.
    pub generation: u64,
    /// The annotated graph.
    pub graph: LegalGraph,
    /// Report from the annotation that produced `graph`.
    pub report: AnnotationReport,
    /// [`LegalGraph::fingerprint`] of `graph`.
    pub fingerprint: String,
}

/// Owner of the currently published graph.
#[derive(Debug)]
pub struct GraphPublisher {
    builder: GraphBuilder,
    engine: EffectivenessEngine,
    current: RwLock<Arc<Published>>,
}

impl GraphPublisher {
    /// A publisher serving an empty graph at generation 0.
    pub fn new(builder: GraphBuilder, engine: EffectivenessEngine) -> Self {
        let graph = LegalGraph::new();
        let fingerprint = graph.fingerprint();
        Self {
            builder,
            engine,
            current: RwLock::new(Arc::new(Published {
                generation: 0,
                graph,
                report: AnnotationReport::default(),
                fingerprint,
            })),
        }
    }

    /// The currently published generation.
    pub fn snapshot(&self) -> Arc<Published> {
        Arc::clone(&self.current.read())
    }

    /// Rebuild from a full snapshot of batches, annotate, and publish.
    ///
    /// With a `deadline`, annotation is refused once it has passed. Errors
    /// leave the current generation in place.
    pub fn refresh(
        &self,
        batches: &RecordBatches,
        deadline: Option<&Deadline>,
    ) -> EngineResult<Arc<Published>> {
        let outcome = self.prepare(batches, deadline);
        let (graph, report) = match outcome {
            Ok(ready) => ready,
            Err(err) => {
                warn!(error = %err, "refresh failed, keeping current graph");
                return Err(err);
            }
        };
        let fingerprint = graph.fingerprint();

        let mut slot = self.current.write();
        let next = Arc::new(Published {
            generation: slot.generation + 1,
            graph,
            report,
            fingerprint,
        });
        *slot = Arc::clone(&next);
        drop(slot);

        info!(
            generation = next.generation,
            fingerprint = %next.fingerprint,
            "graph published"
        );
        Ok(next)
    }

    fn prepare(
        &self,
        batches: &RecordBatches,
        deadline: Option<&Deadline>,
    ) -> EngineResult<(LegalGraph, AnnotationReport)> {
        let mut graph = self.builder.build(batches)?;
        let report = match deadline {
            Some(deadline) => self.engine.run_within(&mut graph, deadline)?,
            None => self.engine.run(&mut graph)?,
        };
        Ok((graph, report))
    }
}

impl Default for GraphPublisher {
    fn default() -> Self {
        Self::new(GraphBuilder::default(), EffectivenessEngine::default())
    }
}
