use ahash::AHashMap;

/// Raw station name bytes as they appear before the delimiter.
pub type StationKey = Box<[u8]>;

/// Station name -> running statistics, owned by a single worker or by the
/// reducer.
pub type StationMap = AHashMap<StationKey, StationAggregate>;

/// Running count/sum/min/max for one station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationAggregate {
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl StationAggregate {
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn from_value(value: f64) -> Self {
        let mut aggregate = Self::new();
        aggregate.observe(value);
        aggregate
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Fold one measurement into the running statistics.
    pub fn observe(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            if value < self.min {
                self.min = value;
            }
            if value > self.max {
                self.max = value;
            }
        }
        self.count += 1;
        self.sum += value;
    }

    /// Combine with another aggregate as if its observations had been
    /// applied to `self`.
    pub fn merge(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
        self.count += other.count;
        self.sum += other.sum;
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }

    /// `min/mean/max` with the mean rounded to one decimal place.
    /// `None` when nothing has been observed.
    pub fn render(&self) -> Option<String> {
        let mean = self.mean()?;
        Some(format!("{:?}/{}/{:?}", self.min, format_tenths(mean), self.max))
    }
}

impl Default for StationAggregate {
    fn default() -> Self {
        Self::new()
    }
}

fn format_tenths(value: f64) -> String {
    let formatted = format!("{:.1}", value);
    if formatted == "-0.0" {
        "0.0".to_string()
    } else {
        formatted
    }
}
