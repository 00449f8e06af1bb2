//! Nelder-Mead simplex minimization used for CSS estimation

/// Outcome of a minimization
#[derive(Debug, Clone)]
pub struct Minimum {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the simplex met the tolerance before `max_iter`
    pub converged: bool,
}

/// Nelder-Mead settings
#[derive(Debug, Clone)]
pub struct NelderMead {
    /// Maximum iterations
    pub max_iter: usize,
    /// Stop when the spread of objective values falls below this
    pub tolerance: f64,
    /// Initial simplex step (relative to the coordinate, absolute near zero)
    pub initial_step: f64,
    /// Per-coordinate `(min, max)` bounds
    pub bounds: Option<Vec<(f64, f64)>>,
}

impl Default for NelderMead {
    fn default() -> Self {
        NelderMead {
            max_iter: 2000,
            tolerance: 1e-10,
            initial_step: 0.05,
            bounds: None,
        }
    }
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

impl NelderMead {
    pub fn with_bounds(mut self, bounds: Vec<(f64, f64)>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Minimize `objective` from `initial`
    pub fn minimize<F>(&self, objective: F, initial: &[f64]) -> Minimum
    where
        F: Fn(&[f64]) -> f64,
    {
        let n = initial.len();
        if n == 0 {
            return Minimum {
                point: vec![],
                value: objective(&[]),
                iterations: 0,
                converged: true,
            };
        }

        let start = self.clamp(initial.to_vec());
        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        simplex.push(start.clone());
        for i in 0..n {
            let mut vertex = start.clone();
            vertex[i] += if start[i].abs() > 1e-8 {
                self.initial_step * start[i].abs()
            } else {
                self.initial_step
            };
            simplex.push(self.clamp(vertex));
        }
        let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;

            let mut order: Vec<usize> = (0..=n).collect();
            order.sort_by(|&a, &b| {
                values[a]
                    .partial_cmp(&values[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let (best, worst, second_worst) = (order[0], order[n], order[n - 1]);

            if (values[worst] - values[best]).abs()
                <= self.tolerance * (1.0 + values[best].abs())
            {
                converged = true;
                break;
            }

            let centroid = centroid_without(&simplex, worst);

            let reflected = self.clamp(towards(&centroid, &simplex[worst], -REFLECTION));
            let reflected_value = objective(&reflected);

            if reflected_value < values[best] {
                let expanded = self.clamp(towards(&centroid, &reflected, EXPANSION));
                let expanded_value = objective(&expanded);
                if expanded_value < reflected_value {
                    simplex[worst] = expanded;
                    values[worst] = expanded_value;
                } else {
                    simplex[worst] = reflected;
                    values[worst] = reflected_value;
                }
                continue;
            }

            if reflected_value < values[second_worst] {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
                continue;
            }

            // Outside contraction if the reflection helped at all, inside otherwise
            let (target, target_value) = if reflected_value < values[worst] {
                (reflected, reflected_value)
            } else {
                (simplex[worst].clone(), values[worst])
            };
            let contracted = self.clamp(towards(&centroid, &target, CONTRACTION));
            let contracted_value = objective(&contracted);
            if contracted_value < target_value {
                simplex[worst] = contracted;
                values[worst] = contracted_value;
                continue;
            }

            let anchor = simplex[best].clone();
            for i in 0..=n {
                if i != best {
                    let shrunk = self.clamp(towards(&anchor, &simplex[i], SHRINK));
                    values[i] = objective(&shrunk);
                    simplex[i] = shrunk;
                }
            }
        }

        let best = values
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);

        Minimum {
            point: simplex[best].clone(),
            value: values[best],
            iterations,
            converged,
        }
    }

    fn clamp(&self, mut point: Vec<f64>) -> Vec<f64> {
        if let Some(bounds) = &self.bounds {
            for (x, (lo, hi)) in point.iter_mut().zip(bounds.iter()) {
                *x = x.clamp(*lo, *hi);
            }
        }
        point
    }
}

/// `origin + scale * (point - origin)`
fn towards(origin: &[f64], point: &[f64], scale: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point.iter())
        .map(|(o, p)| o + scale * (p - o))
        .collect()
}

fn centroid_without(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let dim = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; dim];
    for (_, vertex) in simplex.iter().enumerate().filter(|(i, _)| *i != exclude) {
        for (c, v) in centroid.iter_mut().zip(vertex.iter()) {
            *c += v;
        }
    }
    centroid.iter_mut().for_each(|c| *c /= count);
    centroid
}
