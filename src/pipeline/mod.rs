//! Order processing pipeline
//!
//! Implements the staged order flow: each stage reads and annotates a typed
//! [`OrderContext`] without undoing the work of earlier stages. The routing
//! stage runs after upstream safety screening and is skipped entirely when
//! the order was blocked.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::scheduling::{Decision, OrderItem, Scheduler};

/// A stage failed in a way that should abort the whole pipeline.
///
/// Stages signal ordinary negative outcomes (blocked order, fallback
/// assignment) through the context, not through errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: &'static str, message: String },
}

/// Mutable state threaded through the pipeline stages.
#[derive(Debug, Clone, Default)]
pub struct OrderContext {
    pub patient_id: u64,
    pub items: Vec<OrderItem>,

    /// Set by upstream safety screening; downstream stages must not act on
    /// a blocked order
    pub has_blocks: bool,
    pub block_reasons: Vec<String>,

    pub assigned_pharmacy: String,
    pub routing_reason: String,
    pub decision: Option<Decision>,
}

impl OrderContext {
    pub fn new(patient_id: u64, items: Vec<OrderItem>) -> Self {
        Self {
            patient_id,
            items,
            ..Default::default()
        }
    }

    /// Record a safety block. Once set, blocks are never cleared.
    pub fn block(&mut self, reason: impl Into<String>) {
        self.has_blocks = true;
        self.block_reasons.push(reason.into());
    }
}

/// A pipeline stage. Stages annotate the context in order; a stage must
/// never remove blocks or annotations added by earlier stages.
pub trait OrderStage: Send + Sync {
    /// Stage identifier for logging and metrics.
    fn name(&self) -> &'static str;

    /// Process the order context.
    ///
    /// Returns an error only for failures that should abort the pipeline;
    /// blocked or unroutable orders are recorded on the context instead.
    fn process(&self, context: &mut OrderContext) -> Result<(), PipelineError>;
}

/// Executes a fixed sequence of stages on an order context.
pub struct OrderPipeline {
    stages: Vec<Box<dyn OrderStage>>,
}

impl OrderPipeline {
    /// Create a pipeline; stages execute in the order provided.
    pub fn new(stages: Vec<Box<dyn OrderStage>>) -> Self {
        Self { stages }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in sequence. The first stage error aborts the run.
    pub fn execute(&self, context: &mut OrderContext) -> Result<(), PipelineError> {
        let pipeline_start = Instant::now();

        tracing::trace!(
            patient_id = context.patient_id,
            items = context.items.len(),
            stage_count = self.stages.len(),
            "Pipeline execution started"
        );

        for stage in &self.stages {
            let stage_start = Instant::now();

            stage.process(context)?;

            let stage_elapsed = stage_start.elapsed();
            metrics::histogram!(
                "rxgrid_stage_duration_seconds",
                "stage" => stage.name().to_string(),
            )
            .record(stage_elapsed.as_secs_f64());

            tracing::trace!(
                patient_id = context.patient_id,
                stage = stage.name(),
                elapsed_us = stage_elapsed.as_micros() as u64,
                blocked = context.has_blocks,
                "Stage completed"
            );
        }

        metrics::histogram!("rxgrid_pipeline_duration_seconds")
            .record(pipeline_start.elapsed().as_secs_f64());

        tracing::trace!(
            patient_id = context.patient_id,
            elapsed_us = pipeline_start.elapsed().as_micros() as u64,
            assigned = %context.assigned_pharmacy,
            "Pipeline execution completed"
        );
        Ok(())
    }
}

/// Routing stage: invokes the scheduler for unblocked orders.
///
/// A blocked order is skipped with a no-op outcome (empty assignment, no
/// decision) rather than consuming a load slot.
pub struct SchedulerStage {
    scheduler: Arc<Scheduler>,
}

impl SchedulerStage {
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        Self { scheduler }
    }
}

impl OrderStage for SchedulerStage {
    fn name(&self) -> &'static str {
        "scheduler"
    }

    fn process(&self, context: &mut OrderContext) -> Result<(), PipelineError> {
        if context.has_blocks {
            context.assigned_pharmacy = String::new();
            context.routing_reason = "Blocked by safety - skip.".to_string();
            context.decision = None;
            tracing::debug!(
                patient_id = context.patient_id,
                blocks = context.block_reasons.len(),
                "Order blocked upstream, routing skipped"
            );
            return Ok(());
        }

        let decision = self
            .scheduler
            .route_order(context.patient_id, &context.items, false);
        context.assigned_pharmacy = decision.assigned_pharmacy.clone();
        context.routing_reason = decision.routing_reason.clone();
        context.decision = Some(decision);
        Ok(())
    }
}
