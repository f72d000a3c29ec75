//! Interpolating B-splines of degree 1 to 3.
//!
//! Knot placement:
//! - odd degree `k`: not-a-knot, i.e. boundary knots repeated `k + 1` times
//!   and interior knots at `x[(k+1)/2 .. n-(k+1)/2]`
//! - degree 2: interior knots at the midpoints between samples, with the
//!   first and last midpoint dropped
//!
//! The collocation matrix is banded (at most `k` entries either side of the
//! diagonal) and totally positive for these knots, so it is factored by
//! plain Gaussian elimination inside the band.

/// B-spline interpolant; evaluation outside `[t_0, t_{n-1}]` continues the
/// boundary polynomial piece.
#[derive(Debug, Clone)]
pub struct BSpline {
    degree: usize,
    knots: Vec<f64>,
    coeffs: Vec<f64>,
}

impl BSpline {
    /// Fit a spline of `degree` through every `(times[i], values[i])`.
    ///
    /// Callers guarantee `times` is strictly increasing, lengths match and
    /// `1 <= degree < times.len()`.
    pub fn interpolate(times: &[f64], values: &[f64], degree: usize) -> Self {
        let knots = interpolation_knots(times, degree);
        let mut spline = Self {
            degree,
            knots,
            coeffs: Vec::new(),
        };

        let n = times.len();
        let mut band = BandMatrix::new(n, degree);
        let mut basis = vec![0.0; degree + 1];
        for (row, &x) in times.iter().enumerate() {
            let span = spline.span(x);
            spline.basis_into(span, x, &mut basis);
            for (r, &b) in basis.iter().enumerate() {
                band.set(row, span - degree + r, b);
            }
        }

        spline.coeffs = band.solve(values.to_vec());
        spline
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Value at `x`. Outside the domain the boundary basis terms grow like
    /// `(d / h)^k` for a distance `d` past the end and knot spacing `h`, and
    /// their sum cancels back to `O(1)`. Rounding error grows with them: a
    /// few sample periods out stays near machine precision, thousands of
    /// periods out (e.g. a 1 s offset at 44.1 kHz) does not.
    pub fn evaluate(&self, x: f64) -> f64 {
        let span = self.span(x);
        let mut basis = [0.0; 4];
        let basis = &mut basis[..=self.degree];
        self.basis_into(span, x, basis);

        basis
            .iter()
            .enumerate()
            .map(|(r, &b)| b * self.coeffs[span - self.degree + r])
            .sum()
    }

    /// Knot span `l` in `[k, n-1]` with `t_l <= x < t_{l+1}`, clamped for
    /// queries outside the domain.
    fn span(&self, x: f64) -> usize {
        let k = self.degree;
        let n = self.knots.len() - k - 1;
        k + self.knots[k + 1..n].partition_point(|&t| t <= x)
    }

    /// Cox-de Boor recurrence for the `k + 1` basis functions that are
    /// non-zero on `span`. The recurrence is polynomial in `x`, so it is
    /// also valid for `x` outside the span.
    fn basis_into(&self, span: usize, x: f64, out: &mut [f64]) {
        let k = self.degree;
        let t = &self.knots;
        let mut left = [0.0; 4];
        let mut right = [0.0; 4];

        out[0] = 1.0;
        for j in 1..=k {
            left[j] = x - t[span + 1 - j];
            right[j] = t[span + j] - x;
            let mut saved = 0.0;
            for r in 0..j {
                let temp = out[r] / (right[r + 1] + left[j - r]);
                out[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            out[j] = saved;
        }
    }
}

fn interpolation_knots(x: &[f64], k: usize) -> Vec<f64> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];

    let mut knots = Vec::with_capacity(n + k + 1);
    knots.extend(std::iter::repeat(first).take(k + 1));
    if k % 2 == 1 {
        let m = (k + 1) / 2;
        knots.extend_from_slice(&x[m..n - m]);
    } else {
        // midpoints 1 ..= n-3
        knots.extend(x[1..n - 1].windows(2).map(|w| 0.5 * (w[0] + w[1])));
    }
    knots.extend(std::iter::repeat(last).take(k + 1));

    debug_assert_eq!(knots.len(), n + k + 1);
    knots
}

/// Square matrix storing only the diagonals `-bw ..= bw`.
struct BandMatrix {
    n: usize,
    bw: usize,
    data: Vec<f64>,
}

impl BandMatrix {
    fn new(n: usize, bw: usize) -> Self {
        Self {
            n,
            bw,
            data: vec![0.0; n * (2 * bw + 1)],
        }
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        row * (2 * self.bw + 1) + (col + self.bw - row)
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.idx(row, col)]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        let i = self.idx(row, col);
        self.data[i] = value;
    }

    /// Solve `A x = rhs` in place of `rhs`. No pivoting: every leading
    /// minor of a totally positive matrix is positive.
    fn solve(mut self, mut rhs: Vec<f64>) -> Vec<f64> {
        let (n, bw) = (self.n, self.bw);

        for p in 0..n {
            let pivot = self.get(p, p);
            let end = (p + bw + 1).min(n);
            for i in p + 1..end {
                let factor = self.get(i, p) / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in p..end {
                    let v = self.get(i, j) - factor * self.get(p, j);
                    self.set(i, j, v);
                }
                rhs[i] -= factor * rhs[p];
            }
        }

        for p in (0..n).rev() {
            let end = (p + bw + 1).min(n);
            let mut acc = rhs[p];
            for j in p + 1..end {
                acc -= self.get(p, j) * rhs[j];
            }
            rhs[p] = acc / self.get(p, p);
        }

        rhs
    }
}
