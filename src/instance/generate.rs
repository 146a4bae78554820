//! Random instance generation.
//!
//! Produces instances shaped like the benchmark workload families (SoD,
//! at-most, SUAL, Wang-Li, assignment-dependent mixes). Used by the
//! criterion bench and the differential tests; generated instances are
//! always structurally feasible (every step has at least one authorised
//! user), though not necessarily satisfiable.

use super::model::{Authorisation, Constraint, Instance};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

/// Configuration for the instance generator.
///
/// # Examples
///
/// ```
/// use wsp_kit::instance::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_steps(6)
///     .with_users(12)
///     .with_not_equals(3)
///     .with_seed(7);
/// let instance = config.generate();
/// assert_eq!(instance.k(), 6);
/// assert_eq!(instance.constraints().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of steps.
    pub steps: usize,
    /// Number of users.
    pub users: usize,
    /// Probability that a given user is authorised for a given step.
    pub authorisation_density: f64,
    /// Number of separation-of-duty constraints.
    pub not_equals: usize,
    /// Number of at-most constraints.
    pub at_most: usize,
    /// Number of SUAL constraints.
    pub sual: usize,
    /// Number of Wang-Li constraints.
    pub wang_li: usize,
    /// Number of assignment-dependent constraints.
    pub assignment_dependent: usize,
    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            steps: 8,
            users: 16,
            authorisation_density: 0.3,
            not_equals: 4,
            at_most: 0,
            sual: 0,
            wang_li: 0,
            assignment_dependent: 0,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Sets the step count.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Sets the user count.
    pub fn with_users(mut self, users: usize) -> Self {
        self.users = users;
        self
    }

    /// Sets the authorisation density.
    pub fn with_density(mut self, density: f64) -> Self {
        self.authorisation_density = density;
        self
    }

    /// Sets the number of separation-of-duty constraints.
    pub fn with_not_equals(mut self, count: usize) -> Self {
        self.not_equals = count;
        self
    }

    /// Sets the number of at-most constraints.
    pub fn with_at_most(mut self, count: usize) -> Self {
        self.at_most = count;
        self
    }

    /// Sets the number of SUAL constraints.
    pub fn with_sual(mut self, count: usize) -> Self {
        self.sual = count;
        self
    }

    /// Sets the number of Wang-Li constraints.
    pub fn with_wang_li(mut self, count: usize) -> Self {
        self.wang_li = count;
        self
    }

    /// Sets the number of assignment-dependent constraints.
    pub fn with_assignment_dependent(mut self, count: usize) -> Self {
        self.assignment_dependent = count;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.steps == 0 {
            return Err("steps must be positive".into());
        }
        if self.users == 0 {
            return Err("users must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.authorisation_density) {
            return Err("authorisation_density must be within [0, 1]".into());
        }
        if self.steps < 2 && self.not_equals > 0 {
            return Err("separation of duty needs at least two steps".into());
        }
        Ok(())
    }

    /// Generates a random instance.
    pub fn generate(&self) -> Instance {
        self.validate().expect("invalid GeneratorConfig");

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let k = self.steps;
        let n = self.users;
        let mut instance = Instance::new(k, n).expect("positive counts");

        let mut grid: Vec<Vec<bool>> = (0..n)
            .map(|_| {
                (0..k)
                    .map(|_| rng.random_bool(self.authorisation_density))
                    .collect()
            })
            .collect();
        // Every step gets at least one authorised user.
        for s in 0..k {
            if !(0..n).any(|u| grid[u][s]) {
                let u = rng.random_range(0..n);
                grid[u][s] = true;
            }
        }
        for (u, steps) in grid.into_iter().enumerate() {
            instance
                .push_authorisation(Authorisation::new(u, steps))
                .expect("generated authorisation is feasible");
        }

        let mut push = |instance: &mut Instance, constraint: Constraint| {
            instance
                .push_constraint(constraint)
                .expect("generated constraint is feasible");
        };

        for _ in 0..self.not_equals {
            let pair = sample(&mut rng, k, 2).into_vec();
            push(
                &mut instance,
                Constraint::NotEquals {
                    s1: pair[0],
                    s2: pair[1],
                },
            );
        }

        for _ in 0..self.at_most {
            let scope_len = k.min(3).max(2.min(k));
            let scope = sample(&mut rng, k, scope_len).into_vec();
            let limit = rng.random_range(1..=scope_len.saturating_sub(1).max(1));
            push(&mut instance, Constraint::AtMost { limit, scope });
        }

        for _ in 0..self.sual {
            let scope_len = k.min(3);
            let scope = sample(&mut rng, k, scope_len).into_vec();
            let limit = rng.random_range(1..=scope_len);
            let group_len = rng.random_range(1..=n.div_ceil(2));
            let user_group = sample(&mut rng, n, group_len).into_vec();
            push(
                &mut instance,
                Constraint::Sual {
                    scope,
                    limit,
                    user_group,
                },
            );
        }

        for _ in 0..self.wang_li {
            let scope_len = k.min(2);
            let steps = sample(&mut rng, k, scope_len).into_vec();
            let pool_len = n.min(4).max(2.min(n));
            let pool = sample(&mut rng, n, pool_len).into_vec();
            let user_groups = if pool.len() < 2 {
                vec![pool]
            } else {
                let split = pool.len() / 2;
                vec![pool[..split].to_vec(), pool[split..].to_vec()]
            };
            push(&mut instance, Constraint::WangLi { steps, user_groups });
        }

        for _ in 0..self.assignment_dependent {
            let (s1, s2) = if k >= 2 {
                let pair = sample(&mut rng, k, 2).into_vec();
                (pair[0], pair[1])
            } else {
                (0, 0)
            };
            let u1_len = rng.random_range(1..=n.div_ceil(2));
            let u1 = sample(&mut rng, n, u1_len).into_vec();
            let u2_len = rng.random_range(1..=n.div_ceil(2));
            let u2 = sample(&mut rng, n, u2_len).into_vec();
            push(
                &mut instance,
                Constraint::AssignmentDependent { s1, s2, u1, u2 },
            );
        }

        instance
    }
}
