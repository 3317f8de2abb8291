//! Dense legal-action mask.
//!
//! Shape is `(width, height, HAND_SIZE)` in row-major order, matching the
//! array layout handed to learning code.

use crate::core::Placement;
use crate::economy::HAND_SIZE;

/// `true` where placing hand slot `s` on cell `(x, y)` is legal.
///
/// ```
/// use arena_sim::rules::ActionMask;
/// use arena_sim::core::Placement;
///
/// let mut mask = ActionMask::new(18, 32);
/// mask.set(3, 20, 1, true);
///
/// assert!(mask.is_legal(&Placement::new(3, 20, 1)));
/// assert_eq!(mask.count(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionMask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl ActionMask {
    /// An all-illegal mask.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize * HAND_SIZE],
        }
    }

    /// `(width, height, hand size)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.width as usize, self.height as usize, HAND_SIZE)
    }

    fn offset(&self, x: u32, y: u32, slot: usize) -> Option<usize> {
        if x >= self.width || y >= self.height || slot >= HAND_SIZE {
            return None;
        }
        Some((x as usize * self.height as usize + y as usize) * HAND_SIZE + slot)
    }

    /// Panics if the coordinates are outside the mask.
    pub fn set(&mut self, x: u32, y: u32, slot: usize, legal: bool) {
        let offset = self
            .offset(x, y, slot)
            .unwrap_or_else(|| panic!("mask index ({}, {}, {}) out of range", x, y, slot));
        self.data[offset] = legal;
    }

    #[must_use]
    pub fn get(&self, x: u32, y: u32, slot: usize) -> bool {
        self.offset(x, y, slot)
            .map_or(false, |offset| self.data[offset])
    }

    /// Whether `placement` is marked legal. Out-of-range placements are not.
    #[must_use]
    pub fn is_legal(&self, placement: &Placement) -> bool {
        match (u32::try_from(placement.x), u32::try_from(placement.y)) {
            (Ok(x), Ok(y)) => self.get(x, y, placement.hand_index),
            _ => false,
        }
    }

    /// Number of legal placements.
    #[must_use]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|legal| **legal).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|legal| *legal)
    }

    /// Legal placements in mask order.
    pub fn iter_legal(&self) -> impl Iterator<Item = Placement> + '_ {
        let height = self.height as usize;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, legal)| **legal)
            .map(move |(offset, _)| {
                let slot = offset % HAND_SIZE;
                let cell = offset / HAND_SIZE;
                Placement::new((cell / height) as i32, (cell % height) as i32, slot)
            })
    }

    /// Flat row-major view.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    /// Flat row-major copy as `0.0` / `1.0`.
    #[must_use]
    pub fn to_f64(&self) -> Vec<f64> {
        self.data
            .iter()
            .map(|legal| if *legal { 1.0 } else { 0.0 })
            .collect()
    }
}
