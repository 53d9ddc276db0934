//! Time-to-progress curves. All map `[0, 1]` onto `[0, 1]` monotonically.

pub type Easing = fn(f32) -> f32;

pub fn linear(t: f32) -> f32 {
    t
}

pub fn ease_in(t: f32) -> f32 {
    t * t
}

pub fn ease_out(t: f32) -> f32 {
    t * (2.0 - t)
}

/// Quadratic ease-in-out; the default morph curve.
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Looks up a curve by its kebab-case name.
pub fn by_name(name: &str) -> Option<Easing> {
    let easing: Easing = match name {
        "linear" => linear,
        "ease-in" => ease_in,
        "ease-out" => ease_out,
        "ease-in-out" => ease_in_out,
        _ => return None,
    };

    Some(easing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_boundaries(f: impl Fn(f32) -> f32) {
        assert!(f(0.0).abs() < 1e-6, "f(0) = {}, expected 0", f(0.0));
        assert!((f(1.0) - 1.0).abs() < 1e-6, "f(1) = {}, expected 1", f(1.0));
    }

    fn assert_monotonic(f: impl Fn(f32) -> f32) {
        let mut prev = f(0.0);

        for i in 1..=1000 {
            let t = i as f32 / 1000.0;
            let val = f(t);
            assert!(val >= prev - 1e-6, "non-monotonic at t={t}: {prev} > {val}");
            prev = val;
        }
    }

    #[test]
    fn builtin_boundaries() {
        assert_boundaries(linear);
        assert_boundaries(ease_in);
        assert_boundaries(ease_out);
        assert_boundaries(ease_in_out);
    }

    #[test]
    fn builtin_monotonic() {
        assert_monotonic(ease_in);
        assert_monotonic(ease_out);
        assert_monotonic(ease_in_out);
    }

    #[test]
    fn ease_in_out_midpoint_is_exact() {
        assert_eq!(ease_in_out(0.5), 0.5);
    }

    #[test]
    fn ease_in_out_branches_meet() {
        let below = ease_in_out(0.5 - 1e-4);
        let above = ease_in_out(0.5);

        assert!((above - below).abs() < 1e-3);
        assert!((ease_in_out(0.25) - 0.125).abs() < 1e-6);
        assert!((ease_in_out(0.75) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn names_resolve() {
        assert_eq!(by_name("ease-in-out").map(|f| f(0.25)), Some(0.125));
        assert_eq!(by_name("linear").map(|f| f(0.3)), Some(0.3));
        assert!(by_name("bounce").is_none());
    }
}
