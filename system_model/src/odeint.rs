use prelude::*;

pub fn rk4<F>(dt: float, num_steps: u32, t_0: float, y_0: &Vector, mut f: F) -> Vector
where
    F: FnMut(&Vector, float) -> Vector,
{
    let h = dt / float::from(num_steps);
    let mut y = y_0.clone();
    let mut t = t_0;
    for _ in 0..num_steps {
        let k1 = f(&y, t) * h;
        let k2 = f(&(&y + 0.5 * &k1), t + 0.5 * h) * h;
        let k3 = f(&(&y + 0.5 * &k2), t + 0.5 * h) * h;
        let k4 = f(&(&y + &k3), t + h) * h;
        y += (k1 + 2.0 * (k2 + k3) + k4) / 6.0;
        t += h;
    }
    y
}
