use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use crate::foundation::error::{ExportError, ExportResult};
use crate::scene::composition::Composition;

/// Mount point of the live composition.
///
/// Clones share the same slot. Exports take a [`StageLease`] for their whole duration; while one
/// is held, other exports and remounts fail fast with [`ExportError::CompositionBusy`] instead
/// of interleaving frame mutations.
#[derive(Clone, Debug, Default)]
pub struct Stage {
    slot: Arc<Mutex<Option<Composition>>>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_composition(composition: Composition) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(composition))),
        }
    }

    /// Mount `composition`, returning the one it replaced.
    pub fn mount(&self, composition: Composition) -> ExportResult<Option<Composition>> {
        Ok(self.try_guard()?.replace(composition))
    }

    pub fn unmount(&self) -> ExportResult<Option<Composition>> {
        Ok(self.try_guard()?.take())
    }

    /// `true` while a composition is mounted (or an export currently holds it).
    pub fn is_mounted(&self) -> bool {
        match self.slot.try_lock() {
            Ok(g) => g.is_some(),
            Err(TryLockError::Poisoned(p)) => p.into_inner().is_some(),
            Err(TryLockError::WouldBlock) => true,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.slot.try_lock(), Err(TryLockError::WouldBlock))
    }

    /// Take exclusive ownership of the slot for one export.
    pub fn lease(&self) -> ExportResult<StageLease<'_>> {
        Ok(StageLease {
            guard: self.try_guard()?,
        })
    }

    /// Snapshot of the mounted composition.
    pub fn snapshot(&self) -> ExportResult<Option<Composition>> {
        Ok(self.try_guard()?.clone())
    }

    fn try_guard(&self) -> ExportResult<MutexGuard<'_, Option<Composition>>> {
        match self.slot.try_lock() {
            Ok(g) => Ok(g),
            // poisoned by a panicking export; the next export resets highlight state
            Err(TryLockError::Poisoned(p)) => Ok(p.into_inner()),
            Err(TryLockError::WouldBlock) => Err(ExportError::CompositionBusy),
        }
    }
}

/// Exclusive access to the mounted composition, released on drop.
#[derive(Debug)]
pub struct StageLease<'a> {
    guard: MutexGuard<'a, Option<Composition>>,
}

impl StageLease<'_> {
    /// The mounted composition, or [`ExportError::NoPreviewAvailable`] if none or empty.
    pub fn composition(&self) -> ExportResult<&Composition> {
        self.guard
            .as_ref()
            .filter(|c| !c.is_empty())
            .ok_or(ExportError::NoPreviewAvailable)
    }

    pub fn composition_mut(&mut self) -> ExportResult<&mut Composition> {
        self.guard
            .as_mut()
            .filter(|c| !c.is_empty())
            .ok_or(ExportError::NoPreviewAvailable)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/stage.rs"]
mod tests;
