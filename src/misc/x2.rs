use special::Gamma;

/// Χ<sup>2</sup> (Chi-squared) goodness-of-fit test of draw counts against
/// un-normalized multinomial weights.
///
/// Returns the test statistic and the p-value. Categories with zero weight
/// are skipped; a draw landing in one of them yields a p-value of zero.
///
/// # Example
///
/// Test whether the observed counts were generated in proportion to
/// `[1, 1, 2]`.
///
/// ```
/// use ldagibbs::misc::x2_test;
///
/// let counts: Vec<usize> = vec![26, 24, 50];
/// let weights: Vec<f64> = vec![1.0, 1.0, 2.0];
///
/// let (_stat, p) = x2_test(&counts, &weights);
/// assert!(p > 0.05);
/// ```
pub fn x2_test(counts: &[usize], weights: &[f64]) -> (f64, f64) {
    assert_eq!(counts.len(), weights.len());

    let n = counts.iter().sum::<usize>() as f64;
    let total: f64 = weights.iter().sum();

    let mut df = -1.0;
    let mut x2 = 0.0;
    for (&ct, &w) in counts.iter().zip(weights.iter()) {
        if w > 0.0 {
            let expected = n * w / total;
            x2 += (ct as f64 - expected).powi(2) / expected;
            df += 1.0;
        } else if ct > 0 {
            return (f64::INFINITY, 0.0);
        }
    }

    if df < 1.0 {
        return (x2, 1.0);
    }

    let p = 1.0 - (x2 / 2.0).inc_gamma(df / 2.0);
    (x2, p)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1E-12;

    #[test]
    fn uniform_known_statistic() {
        let counts: Vec<usize> = vec![28, 31, 40, 35];
        let (x2, p) = x2_test(&counts, &[1.0; 4]);

        assert::close(x2, 2.417_910_447_761_194, TOL);
        assert::close(p, 0.490_309_306_965_388_33, TOL);
    }

    #[test]
    fn weight_scale_does_not_matter() {
        let counts: Vec<usize> = vec![28, 31, 40, 35];
        let (x2_a, p_a) = x2_test(&counts, &[1.0; 4]);
        let (x2_b, p_b) = x2_test(&counts, &[0.25; 4]);

        assert::close(x2_a, x2_b, TOL);
        assert::close(p_a, p_b, TOL);
    }

    #[test]
    fn skewed_counts_reject_uniform() {
        let counts: Vec<usize> = vec![900, 50, 25, 25];
        let (_, p) = x2_test(&counts, &[1.0; 4]);

        assert!(p < 1E-6);
    }

    #[test]
    fn draw_in_zero_weight_category_rejects() {
        let counts: Vec<usize> = vec![10, 1];
        let (x2, p) = x2_test(&counts, &[1.0, 0.0]);

        assert!(x2.is_infinite());
        assert_eq!(p, 0.0);
    }
}
