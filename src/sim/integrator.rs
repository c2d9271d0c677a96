//! Classical 4th-order Runge-Kutta stepper
//!
//! Explicit and conditionally stable: nothing here guards against a large
//! step. Callers clamp `h`; an oversized step shows up as growing amplitude.

/// State vector with `N` components
pub type OdeState<const N: usize> = [f64; N];

/// Advance `state` by one step of size `h` using derivative function `f`.
///
/// `state += (h/6)(k1 + 2k2 + 2k3 + k4)` with
/// `k1 = f(s)`, `k2 = f(s + h/2·k1)`, `k3 = f(s + h/2·k2)`, `k4 = f(s + h·k3)`.
pub fn rk4_step<const N: usize, F>(state: &OdeState<N>, h: f64, f: F) -> OdeState<N>
where
    F: Fn(&OdeState<N>) -> OdeState<N>,
{
    let k1 = f(state);
    let k2 = f(&offset(state, &k1, h / 2.0));
    let k3 = f(&offset(state, &k2, h / 2.0));
    let k4 = f(&offset(state, &k3, h));

    let mut next = *state;
    for i in 0..N {
        next[i] += (h / 6.0) * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    next
}

/// `state + scale·slope`
#[inline]
fn offset<const N: usize>(state: &OdeState<N>, slope: &OdeState<N>, scale: f64) -> OdeState<N> {
    let mut out = *state;
    for i in 0..N {
        out[i] += scale * slope[i];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_decay_matches_closed_form() {
        // y' = -y, y(0) = 1
        let mut y = [1.0];
        let h = 0.01;
        for _ in 0..100 {
            y = rk4_step(&y, h, |s| [-s[0]]);
        }
        let exact = (-1.0_f64).exp();
        assert!((y[0] - exact).abs() < 1e-9);
    }

    #[test]
    fn test_zero_step_is_identity() {
        let s = [0.3, -1.2];
        let next = rk4_step(&s, 0.0, |s| [s[1], -s[0]]);
        assert_eq!(next, s);
    }

    #[test]
    fn test_harmonic_oscillator_conserves_energy_over_period() {
        // x'' = -x, one full period
        let mut s = [1.0, 0.0];
        let steps = 1000;
        let h = std::f64::consts::TAU / steps as f64;
        for _ in 0..steps {
            s = rk4_step(&s, h, |s| [s[1], -s[0]]);
        }
        assert!((s[0] - 1.0).abs() < 1e-8);
        assert!(s[1].abs() < 1e-8);
    }
}
