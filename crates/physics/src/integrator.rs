//! # Cart-pole integration
//!
//! Equations of motion for a pole hinged on a cart, and the fixed-step
//! methods that advance them. The accelerations follow R. V. Florian,
//! "Correct equations for the dynamics of the cart-pole system" (2007),
//! without friction terms.
//!
//! Expressions are evaluated in a fixed order so that runs with the same
//! configuration produce identical trajectories.

use serde::{Deserialize, Serialize};

use crate::types::SimulationState;

/// Physical constants of the cart and pole.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Dynamics {
    pub gravity: f64,
    pub cart_mass: f64,
    pub pole_mass: f64,
    pub pole_half_length: f64,
}

/// Linear and angular acceleration at a given state.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Accelerations {
    pub x: f64,
    pub theta: f64,
}

impl Dynamics {
    #[must_use]
    pub fn accelerations(&self, state: &SimulationState, force: f64) -> Accelerations {
        let g = self.gravity;
        let mp = self.pole_mass;
        let mt = self.cart_mass + self.pole_mass;
        let l = self.pole_half_length;

        let st = state.theta.sin();
        let ct = state.theta.cos();
        let dtheta_sq = state.dtheta * state.dtheta;

        let theta = (g * st + ct * (-force - mp * l * dtheta_sq * st) / mt)
            / (l * (4.0 / 3.0 - mp * (ct * ct) / mt));
        let x = (force + mp * l * (dtheta_sq * st - theta * ct)) / mt;

        Accelerations { x, theta }
    }

    fn derivative(&self, state: &SimulationState, force: f64) -> SimulationState {
        let acc = self.accelerations(state, force);
        SimulationState::new(state.dx, acc.x, state.dtheta, acc.theta)
    }
}

/// Fixed-step integration method.
///
/// Changing the method changes which trajectories fail, so reference
/// fitness values are only comparable under the same method and time step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    /// Velocity form of leapfrog:
    /// `x' = x + v dt + a dt²/2`, `v' = v + (a + a') dt / 2`.
    #[default]
    Leapfrog,
    SemiImplicitEuler,
    RungeKutta4,
}

impl Integrator {
    /// Advance `state` by `dt` under a constant `force`.
    ///
    /// `memory` holds the accelerations computed by the previous step; it is
    /// read by leapfrog and refreshed by every method.
    pub fn advance(
        self,
        dynamics: &Dynamics,
        state: &mut SimulationState,
        memory: &mut Accelerations,
        force: f64,
        dt: f64,
    ) {
        match self {
            Integrator::Leapfrog => leapfrog(dynamics, state, memory, force, dt),
            Integrator::SemiImplicitEuler => {
                let acc = dynamics.accelerations(state, force);
                state.dx += acc.x * dt;
                state.dtheta += acc.theta * dt;
                state.x += state.dx * dt;
                state.theta += state.dtheta * dt;
                *memory = acc;
            }
            Integrator::RungeKutta4 => {
                *state = runge_kutta4(dynamics, state, force, dt);
                *memory = dynamics.accelerations(state, force);
            }
        }
    }
}

fn leapfrog(
    dynamics: &Dynamics,
    state: &mut SimulationState,
    memory: &mut Accelerations,
    force: f64,
    dt: f64,
) {
    let acc0 = *memory;

    state.x += dt * state.dx + 0.5 * acc0.x * (dt * dt);
    state.theta += dt * state.dtheta + 0.5 * acc0.theta * (dt * dt);

    let acc1 = dynamics.accelerations(state, force);

    state.dx += 0.5 * (acc0.x + acc1.x) * dt;
    state.dtheta += 0.5 * (acc0.theta + acc1.theta) * dt;

    *memory = acc1;
}

fn runge_kutta4(dynamics: &Dynamics, s: &SimulationState, force: f64, dt: f64) -> SimulationState {
    let offset = |base: &SimulationState, d: &SimulationState, h: f64| {
        SimulationState::new(
            base.x + d.x * h,
            base.dx + d.dx * h,
            base.theta + d.theta * h,
            base.dtheta + d.dtheta * h,
        )
    };

    let k1 = dynamics.derivative(s, force);
    let k2 = dynamics.derivative(&offset(s, &k1, dt / 2.0), force);
    let k3 = dynamics.derivative(&offset(s, &k2, dt / 2.0), force);
    let k4 = dynamics.derivative(&offset(s, &k3, dt), force);

    let blend = |a: f64, b: f64, c: f64, d: f64| (a + 2.0 * b + 2.0 * c + d) * dt / 6.0;
    SimulationState::new(
        s.x + blend(k1.x, k2.x, k3.x, k4.x),
        s.dx + blend(k1.dx, k2.dx, k3.dx, k4.dx),
        s.theta + blend(k1.theta, k2.theta, k3.theta, k4.theta),
        s.dtheta + blend(k1.dtheta, k2.dtheta, k3.dtheta, k4.dtheta),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dynamics() -> Dynamics {
        Dynamics { gravity: 9.8, cart_mass: 1.0, pole_mass: 0.1, pole_half_length: 0.5 }
    }

    #[test]
    fn upright_at_rest_has_no_acceleration() {
        let acc = dynamics().accelerations(&SimulationState::UPRIGHT, 0.0);
        assert_eq!(acc, Accelerations::default());
    }

    #[test]
    fn pushing_right_tips_pole_left() {
        let acc = dynamics().accelerations(&SimulationState::UPRIGHT, 10.0);
        assert!(acc.x > 0.0);
        assert!(acc.theta < 0.0);
    }

    #[test]
    fn gravity_pulls_tilted_pole_further() {
        let tilted = SimulationState::new(0.0, 0.0, 0.1, 0.0);
        let acc = dynamics().accelerations(&tilted, 0.0);
        assert!(acc.theta > 0.0);
    }

    #[test]
    fn every_method_keeps_equilibrium() {
        for method in [Integrator::Leapfrog, Integrator::SemiImplicitEuler, Integrator::RungeKutta4] {
            let mut state = SimulationState::UPRIGHT;
            let mut memory = Accelerations::default();
            for _ in 0..1000 {
                method.advance(&dynamics(), &mut state, &mut memory, 0.0, 0.01);
            }
            assert_eq!(state, SimulationState::UPRIGHT, "{method:?}");
        }
    }
}
