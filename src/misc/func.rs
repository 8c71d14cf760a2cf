use rand::Rng;
use special::Gamma;
use std::fmt::Debug;

/// Convert a Vector to a printable string
///
/// # Example
///
/// ```rust
/// # use ldagibbs::misc::vec_to_string;
/// let xs: Vec<u8> = vec![0, 1, 2, 3, 4, 5];
///
/// assert_eq!(vec_to_string(&xs, 6).as_str(), "[0, 1, 2, 3, 4, 5]");
/// assert_eq!(vec_to_string(&xs, 5).as_str(), "[0, 1, 2, 3, ... , 5]");
///
/// ```
pub fn vec_to_string<T: Debug>(xs: &[T], max_entries: usize) -> String {
    let mut out = String::new();
    out += "[";
    let n = xs.len();
    xs.iter().enumerate().for_each(|(i, x)| {
        let to_push = if i == n - 1 {
            format!("{:?}", x)
        } else if i < max_entries - 1 {
            format!("{:?}, ", x)
        } else if i == max_entries - 1 {
            String::from("... , ")
        } else {
            String::new()
        };

        out.push_str(to_push.as_str());
    });
    out += "]";

    out
}

/// Draw an index in proportion to un-normalized `pvals`
///
/// Draws `u` uniformly from `[0, pvals_sum)` and returns the smallest index
/// whose cumulative weight exceeds `u`. `pvals_sum` is passed in because the
/// caller usually accumulates it while building the weights.
///
/// # Panics
///
/// If `pvals` is empty or `pvals_sum` is not a positive finite number.
///
/// # Example
///
/// ```rust
/// # use ldagibbs::misc::draw_multinomial;
/// # use rand::SeedableRng;
/// let mut rng = rand_xoshiro::Xoshiro256Plus::seed_from_u64(1337);
///
/// let pvals = vec![1.0, 0.0, 0.0];
/// assert_eq!(draw_multinomial(&pvals, 1.0, &mut rng), 0);
///
/// // weights need not be normalized
/// let pvals = vec![0.0, 2.0, 6.0];
/// let ix = draw_multinomial(&pvals, 8.0, &mut rng);
/// assert!(ix == 1 || ix == 2);
/// ```
pub fn draw_multinomial<R: Rng>(
    pvals: &[f64],
    pvals_sum: f64,
    rng: &mut R,
) -> usize {
    if pvals.is_empty() {
        panic!("Empty container");
    }

    if !(pvals_sum > 0.0 && pvals_sum.is_finite()) {
        panic!(
            "Could not draw from {}: weight sum {} is not positive and finite",
            vec_to_string(pvals, 10),
            pvals_sum
        );
    }

    if pvals.len() == 1 {
        return 0;
    }

    let u = rng.gen::<f64>() * pvals_sum;
    let mut cumulative = 0.0;
    for (ix, &p) in pvals.iter().enumerate() {
        cumulative += p;
        if cumulative > u {
            return ix;
        }
    }

    // A pre-computed sum can exceed the running sum by rounding error, which
    // leaves u just past the end. That mass belongs to the last live index.
    match pvals.iter().rposition(|&p| p > 0.0) {
        Some(ix) => ix,
        None => panic!("Could not draw from {}", vec_to_string(pvals, 10)),
    }
}

/// Natural log of the multivariate Beta function,
/// `Σ lnΓ(a_i) - lnΓ(Σ a_i)`
///
/// This is the log normalizing constant of a Dirichlet with weights `alphas`.
///
/// # Example
///
/// ```rust
/// # use ldagibbs::misc::ln_multivariate_beta;
/// // B(1, 1) = 1
/// assert!(ln_multivariate_beta(&[1.0, 1.0]).abs() < 1E-12);
///
/// // B(2, 3) = Γ(2)Γ(3)/Γ(5) = 2/24
/// let b = ln_multivariate_beta(&[2.0, 3.0]);
/// assert!((b - (2.0_f64 / 24.0).ln()).abs() < 1E-12);
/// ```
pub fn ln_multivariate_beta(alphas: &[f64]) -> f64 {
    let (sum, sum_ln_gamma) = alphas
        .iter()
        .fold((0.0, 0.0), |(sum, lng), &a| (sum + a, lng + a.ln_gamma().0));
    sum_ln_gamma - sum.ln_gamma().0
}

/// Numerically stable `ln(Σ exp(x_i))`
///
/// # Panics
///
/// If `xs` is empty.
///
/// # Example
///
/// ```rust
/// # use ldagibbs::misc::logsumexp;
/// // exp(-800) underflows to zero on its own
/// let lse = logsumexp(&[-800.0, -800.0]);
/// assert!((lse - (-800.0 + 2.0_f64.ln())).abs() < 1E-10);
/// ```
pub fn logsumexp(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        panic!("Empty container");
    } else if xs.len() == 1 {
        xs[0]
    } else {
        let maxval = xs.iter().fold(f64::NEG_INFINITY, |acc, &x| acc.max(x));
        xs.iter().fold(0.0, |acc, x| acc + (x - maxval).exp()).ln() + maxval
    }
}
