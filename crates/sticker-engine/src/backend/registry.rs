use state::InitCell;
use thiserror::Error;

use super::RenderBackend;

/// Builds a backend from a host-provided context (for example the window).
pub type BackendFactory<C> = dyn Fn(C) -> Box<dyn RenderBackend> + Send + Sync;

/// No backend factory has been registered yet.
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
#[error("no render backend has been registered")]
pub struct NotRegistered;

/// Process-wide, init-once slot for a backend factory.
///
/// A backend is registered explicitly at process start, before any surface is
/// created. The first registration wins; later attempts are rejected.
pub struct BackendRegistry<C> {
    factory: InitCell<Box<BackendFactory<C>>>,
}

impl<C> BackendRegistry<C> {
    pub const fn new() -> Self {
        Self {
            factory: InitCell::new(),
        }
    }

    /// Registers `factory`. Returns `false` if a factory was already registered.
    pub fn register<F>(&self, factory: F) -> bool
    where
        F: Fn(C) -> Box<dyn RenderBackend> + Send + Sync + 'static,
    {
        let accepted = self.factory.set(Box::new(factory));
        if accepted {
            log::debug!("render backend registered");
        } else {
            log::warn!("render backend already registered; ignoring new registration");
        }
        accepted
    }

    pub fn is_registered(&self) -> bool {
        self.factory.try_get().is_some()
    }

    /// Builds a fresh backend for `ctx` using the registered factory.
    pub fn create(&self, ctx: C) -> Result<Box<dyn RenderBackend>, NotRegistered> {
        let factory = self.factory.try_get().ok_or(NotRegistered)?;
        Ok(factory(ctx))
    }
}

impl<C> Default for BackendRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
