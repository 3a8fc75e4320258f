// Window module - bounded FIFO windows and their summary statistics
//
// Every rolling quantity in the analyzer (ratio histories, the beta/alpha
// variability window, the raw state history) is a fixed-capacity FIFO:
// push the newest value, evict the oldest once full.

use std::collections::VecDeque;

/// Fixed-capacity FIFO window
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create an empty window holding at most `capacity` values
    ///
    /// A zero capacity is bumped to 1 so the newest value is always retained.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push `value`, evicting the oldest entry when the window is full
    pub fn push(&mut self, value: T) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl RollingWindow<f64> {
    /// Median of the current contents (0.0 when empty)
    pub fn median(&self) -> f64 {
        let values: Vec<f64> = self.values.iter().copied().collect();
        median(&values)
    }

    /// Population standard deviation of the current contents
    pub fn std_dev(&self) -> f64 {
        let values: Vec<f64> = self.values.iter().copied().collect();
        std_dev(&values)
    }
}

/// Median of `values`; even-length inputs average the two middle values
///
/// Returns 0.0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population standard deviation (divides by N)
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
