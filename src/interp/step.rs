/// Nearest-neighbour step function.
///
/// A query exactly halfway between two samples resolves to the lower one.
/// Queries outside the grid hold the boundary sample.
#[derive(Debug, Clone)]
pub struct NearestStep {
    midpoints: Vec<f64>,
    values: Vec<f64>,
}

impl NearestStep {
    pub fn new(times: &[f64], values: &[f64]) -> Self {
        let midpoints = times.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
        Self {
            midpoints,
            values: values.to_vec(),
        }
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let idx = self.midpoints.partition_point(|&m| m < t);
        self.values[idx]
    }
}

/// Zero-order hold: the value of the latest sample at or before `t`.
#[derive(Debug, Clone)]
pub struct ZeroHold {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl ZeroHold {
    pub fn new(times: &[f64], values: &[f64]) -> Self {
        Self {
            times: times.to_vec(),
            values: values.to_vec(),
        }
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let idx = self.times.partition_point(|&x| x <= t).saturating_sub(1);
        self.values[idx]
    }
}
