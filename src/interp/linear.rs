/// Piecewise-linear interpolant, extended along the first and last segment.
#[derive(Debug, Clone)]
pub struct PiecewiseLinear {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl PiecewiseLinear {
    pub fn new(times: &[f64], values: &[f64]) -> Self {
        Self {
            times: times.to_vec(),
            values: values.to_vec(),
        }
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let n = self.times.len();
        // segment index in [0, n - 2]
        let seg = self.times[1..n - 1].partition_point(|&x| x <= t);

        let (t0, t1) = (self.times[seg], self.times[seg + 1]);
        let (y0, y1) = (self.values[seg], self.values[seg + 1]);
        y0 + (y1 - y0) * (t - t0) / (t1 - t0)
    }
}
