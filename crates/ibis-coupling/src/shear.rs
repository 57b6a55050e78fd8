//! Pluggable wall-shear-stress estimation.
//!
//! The precise tensor projection for the viscous term of the surface
//! traction is a modelling choice, not a fixed formula, so it enters
//! the force transfer as a policy trait. The default estimates shear
//! from the near-wall tangential velocity gradient.

/// Policy for turning a near-wall velocity sample into a wall shear
/// stress magnitude along the surface tangent.
pub trait WallShearModel: Send + Sync {
    /// Policy name for logs and design records.
    fn name(&self) -> &str;

    /// Shear stress (force per unit length, signed along the tangent)
    /// given the tangential velocity of the fluid relative to the
    /// wall, the wall-normal sampling distance, and the dynamic
    /// viscosity.
    fn wall_shear(&self, tangential_velocity: f64, wall_distance: f64, viscosity: f64) -> f64;
}

/// One-sided gradient estimate: `tau = mu * u_t / d`.
///
/// The simplest defensible closure of the near-wall gradient; suitable
/// for laminar and low-Reynolds runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallGradientShear;

impl WallShearModel for WallGradientShear {
    fn name(&self) -> &str {
        "wallGradient"
    }

    fn wall_shear(&self, tangential_velocity: f64, wall_distance: f64, viscosity: f64) -> f64 {
        if wall_distance <= 0.0 {
            return 0.0;
        }
        viscosity * tangential_velocity / wall_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_shear_is_linear_in_velocity() {
        let model = WallGradientShear;
        let tau1 = model.wall_shear(1.0, 0.1, 1e-3);
        let tau2 = model.wall_shear(2.0, 0.1, 1e-3);
        assert!((tau2 - 2.0 * tau1).abs() < 1e-15);
    }

    #[test]
    fn zero_distance_yields_zero_shear() {
        let model = WallGradientShear;
        assert_eq!(model.wall_shear(1.0, 0.0, 1e-3), 0.0);
    }

    #[test]
    fn shear_carries_velocity_sign() {
        let model = WallGradientShear;
        assert!(model.wall_shear(-1.0, 0.1, 1e-3) < 0.0);
    }
}
