//! Load state published by a resource loader.
//!
//! # State Transitions
//! ```text
//! Idle ──load──▶ Loading ──ok──────────▶ Success
//!                   │    ──exhausted───▶ Failed
//!                   ▲
//! Success/Failed ───┘ (reload, new params, refresh signal)
//! ```

use crate::api::TransportError;

/// Identifies one fetch cycle. Strictly increasing per loader.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Success,
    Failed,
}

/// Snapshot of a loaded resource.
///
/// `data` keeps the last successfully fetched value while a reload is in
/// flight and after a reload fails.
#[derive(Debug, Clone)]
pub struct LoadState<T> {
    pub data: T,
    phase: LoadPhase,
    generation: Generation,
    failure: Option<TransportError>,
}

impl<T> LoadState<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            phase: LoadPhase::Idle,
            generation: 0,
            failure: None,
        }
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// Generation of the most recently issued fetch cycle.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    /// True once every attempt of the latest cycle failed.
    pub fn is_error(&self) -> bool {
        self.phase == LoadPhase::Failed
    }

    /// Last error of the latest cycle, when it failed.
    pub fn failure(&self) -> Option<&TransportError> {
        self.failure.as_ref()
    }

    pub(crate) fn begin(&mut self, generation: Generation) {
        self.phase = LoadPhase::Loading;
        self.generation = generation;
        self.failure = None;
    }

    pub(crate) fn succeed(&mut self, data: T) {
        self.data = data;
        self.phase = LoadPhase::Success;
    }

    pub(crate) fn fail(&mut self, error: TransportError) {
        self.phase = LoadPhase::Failed;
        self.failure = Some(error);
    }
}

impl<T: Default> Default for LoadState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
