//! The bracketed dispatch contract (spec §4.3): construct a fresh
//! controller, load its persisted state, invoke the requested operation,
//! then save state unconditionally before surfacing any error.

use exo_controllers::{build_controller, ProcessRegistry};
use exo_core::{ExoError, Result};
use exo_store::{ComponentPatch, Store};

/// A `Lifecycle` operation, dispatched against every component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOp {
    Initialize,
    Refresh,
    Dispose,
}

/// A `Process` operation, dispatched only against process-capable types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOp {
    Start,
    Stop,
    Restart,
}

/// Everything `dispatch_lifecycle`/`dispatch_process` need about the
/// target component, read from the store by the caller.
pub struct Target<'a> {
    pub id: &'a str,
    pub type_: &'a str,
    pub spec: &'a str,
    pub state: &'a str,
}

/// Run a [`LifecycleOp`] through the bracketed dispatch contract.
///
/// `InitResource` failures (the controller could not even load its
/// existing state) return immediately with no save attempt, matching the
/// original implementation: there is no meaningful state to persist when
/// the controller never got constructed against its prior resource.
pub async fn dispatch_lifecycle(
    store: &Store,
    registry: &ProcessRegistry,
    target: Target<'_>,
    op: LifecycleOp,
) -> Result<()> {
    let mut controller = build_controller(target.type_, registry);
    controller.init_resource(target.id, target.spec, target.state)?;

    let op_result = match op {
        LifecycleOp::Initialize => controller.initialize(target.spec).await,
        LifecycleOp::Refresh => controller.refresh(target.spec).await,
        LifecycleOp::Dispose => controller.dispose().await,
    };
    save_and_surface(store, target.id, controller.marshal_state(), op_result)
}

/// Run a [`ProcessOp`] through the same bracketed dispatch contract. A
/// component type whose controller lacks the `Process` capability fails
/// with `Validation` — state is still saved, since `InitResource` already
/// ran and a marshal is cheap and harmless.
pub async fn dispatch_process(
    store: &Store,
    registry: &ProcessRegistry,
    target: Target<'_>,
    op: ProcessOp,
) -> Result<()> {
    let mut controller = build_controller(target.type_, registry);
    controller.init_resource(target.id, target.spec, target.state)?;

    let op_result = match controller.as_process_mut() {
        Some(process) => match op {
            ProcessOp::Start => process.start().await,
            ProcessOp::Stop => process.stop().await,
            ProcessOp::Restart => process.restart().await,
        },
        None => Err(ExoError::Validation(format!(
            "component type {:?} does not support process operations",
            target.type_
        ))),
    };
    save_and_surface(store, target.id, controller.marshal_state(), op_result)
}

fn save_and_surface(
    store: &Store,
    id: &str,
    marshaled: String,
    op_result: Result<()>,
) -> Result<()> {
    let save_result = store.patch_component(
        id,
        ComponentPatch {
            state: Some(marshaled),
            ..Default::default()
        },
    );
    match op_result {
        Err(e) => Err(e),
        Ok(()) => save_result,
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
