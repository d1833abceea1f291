use hqta_core::model::DirectionKey;
use serde::{Deserialize, Serialize};

/// trip counts bucketed by direction. trips without direction data are kept in
/// the combined bucket.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionalTrips {
    pub dir0: usize,
    pub dir1: usize,
    pub combined: usize,
}

impl DirectionalTrips {
    pub fn add(&mut self, direction: DirectionKey, trips: usize) {
        match direction {
            DirectionKey::Zero => self.dir0 += trips,
            DirectionKey::One => self.dir1 += trips,
            DirectionKey::Combined => self.combined += trips,
        }
    }

    pub fn get(&self, direction: DirectionKey) -> usize {
        match direction {
            DirectionKey::Zero => self.dir0,
            DirectionKey::One => self.dir1,
            DirectionKey::Combined => self.combined,
        }
    }

    pub fn total(&self) -> usize {
        self.dir0 + self.dir1 + self.combined
    }
}
