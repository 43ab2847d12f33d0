use std::collections::BTreeMap;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{KymoError, KymoResult};
use crate::foundation::geom::Polyline;

/// User-drawn reference paths keyed by 1-based frame, iterated in ascending frame order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyFrameSet {
    keys: BTreeMap<FrameIndex, Polyline>,
}

impl KeyFrameSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of `polyline` for `frame`, replacing any previous key on that frame.
    ///
    /// Returns the replaced polyline, if any.
    pub fn insert(&mut self, frame: FrameIndex, polyline: &Polyline) -> KymoResult<Option<Polyline>> {
        if frame.0 == 0 {
            return Err(KymoError::validation("key frame indices start at 1"));
        }
        polyline.validate()?;
        Ok(self.keys.insert(frame, polyline.clone()))
    }

    /// Remove the key on `frame`.
    pub fn remove(&mut self, frame: FrameIndex) -> Option<Polyline> {
        self.keys.remove(&frame)
    }

    /// Drop every key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Key on `frame`, if recorded.
    pub fn get(&self, frame: FrameIndex) -> Option<&Polyline> {
        self.keys.get(&frame)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Return `true` when no key is recorded.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in ascending frame order.
    pub fn iter(&self) -> impl Iterator<Item = (FrameIndex, &Polyline)> + '_ {
        self.keys.iter().map(|(&f, p)| (f, p))
    }

    /// Sorted key frame indices.
    pub fn frames(&self) -> Vec<FrameIndex> {
        self.keys.keys().copied().collect()
    }

    /// First and last key frame.
    pub fn bounds(&self) -> Option<(FrameIndex, FrameIndex)> {
        let first = *self.keys.keys().next()?;
        let last = *self.keys.keys().next_back()?;
        Some((first, last))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/keyframe/store.rs"]
mod tests;
