use std::cell::Cell;
use std::rc::Rc;

/// Tolerance below which a rate multiplier counts as zero.
pub const ZERO_RATE_TOLERANCE: f64 = 1e-7;

/// A shared rate multiplier.
///
/// Cloning yields another handle to the same value, so the owner of an
/// adjustment (e.g. a practice-mode slider) can change it after registering it.
#[derive(Debug, Clone)]
pub struct RateAdjustment(Rc<Cell<f64>>);

impl RateAdjustment {
    pub fn new(value: f64) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.0.set(value);
    }

    /// Returns `true` if both handles share the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Ordered set of non-gameplay rate multipliers.
#[derive(Debug, Clone, Default)]
pub struct RateAdjustments {
    items: Vec<RateAdjustment>,
}

impl RateAdjustments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, adjustment: RateAdjustment) {
        self.items.push(adjustment);
    }

    /// Removes `adjustment` by identity. Returns `false` if it was not registered.
    pub fn remove(&mut self, adjustment: &RateAdjustment) -> bool {
        match self.items.iter().position(|a| a.ptr_eq(adjustment)) {
            Some(i) => {
                self.items.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current multiplier values, read on demand.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.items.iter().map(RateAdjustment::get)
    }
}

/// Divides `base_rate` by every adjustment in turn.
///
/// Saturates to exactly `0.0` as soon as an adjustment is within
/// [`ZERO_RATE_TOLERANCE`] of zero; the remaining adjustments are not read.
pub fn true_gameplay_rate(base_rate: f64, adjustments: impl IntoIterator<Item = f64>) -> f64 {
    let mut rate = base_rate;

    for adjustment in adjustments {
        if adjustment.abs() <= ZERO_RATE_TOLERANCE {
            return 0.0;
        }
        rate /= adjustment;
    }

    rate
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── true_gameplay_rate ────────────────────────────────────────────────

    #[test]
    fn no_adjustments_is_identity() {
        assert_eq!(true_gameplay_rate(1.25, Vec::new()), 1.25);
    }

    #[test]
    fn adjustments_are_divided_out() {
        assert_eq!(true_gameplay_rate(1.0, [0.5, 2.0]), 1.0);
        assert_eq!(true_gameplay_rate(1.5, [0.75]), 2.0);
    }

    #[test]
    fn zero_adjustment_saturates_to_zero() {
        assert_eq!(true_gameplay_rate(1.0, [0.5, 0.0, 2.0]), 0.0);
    }

    #[test]
    fn near_zero_adjustment_saturates_to_zero() {
        assert_eq!(true_gameplay_rate(1.0, [ZERO_RATE_TOLERANCE / 2.0]), 0.0);
        assert_eq!(true_gameplay_rate(1.0, [-ZERO_RATE_TOLERANCE / 2.0]), 0.0);
    }

    #[test]
    fn small_but_distinct_adjustment_still_divides() {
        let rate = true_gameplay_rate(1.0, [1e-3]);
        assert!((rate - 1000.0).abs() < 1e-9);
    }

    // ── RateAdjustments ───────────────────────────────────────────────────

    #[test]
    fn shared_handle_updates_are_visible() {
        let slowdown = RateAdjustment::new(0.5);
        let mut set = RateAdjustments::new();
        set.add(slowdown.clone());

        slowdown.set(0.25);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0.25]);
    }

    #[test]
    fn remove_is_by_identity() {
        let a = RateAdjustment::new(0.5);
        let b = RateAdjustment::new(0.5);
        let mut set = RateAdjustments::new();
        set.add(a.clone());

        assert!(!set.remove(&b));
        assert_eq!(set.len(), 1);
        assert!(set.remove(&a));
        assert!(set.is_empty());
    }
}
