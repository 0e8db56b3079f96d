//! The controller capability surface (spec §4.3): every component type
//! implements `Lifecycle` and the resource protocol; types whose
//! components are controllable at runtime additionally implement
//! `Process`.

use async_trait::async_trait;
use exo_core::Result;

/// Operations every controller supports, regardless of component type.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Refs of components this one depends on, parsed from `spec`.
    async fn dependencies(&self, spec: &str) -> Result<Vec<String>>;
    async fn initialize(&mut self, spec: &str) -> Result<()>;
    async fn refresh(&mut self, spec: &str) -> Result<()>;
    async fn dispose(&mut self) -> Result<()>;
}

/// Operations available on controllers whose components are
/// controllable at runtime (spec: "process-like" types).
#[async_trait]
pub trait Process: Send + Sync {
    async fn start(&mut self) -> Result<()>;
    async fn stop(&mut self) -> Result<()>;
    async fn restart(&mut self) -> Result<()>;
}

/// The resource protocol (spec §4.3): the only points at which the
/// engine touches the contents of a component's persisted `state`.
pub trait Resource {
    /// Load persisted `state` (opaque JSON, `""` if none yet) into this
    /// controller instance, freshly constructed for this dispatch.
    fn init_resource(&mut self, id: &str, spec: &str, state: &str) -> Result<()>;

    /// Serialize the controller's current in-memory resource.
    fn marshal_state(&self) -> String;
}

/// The full capability set a controller factory returns, with optional
/// access to the `Process` capability via [`Controller::as_process_mut`].
pub trait Controller: Lifecycle + Resource + Send + Sync {
    fn as_process_mut(&mut self) -> Option<&mut dyn Process> {
        None
    }
}
