mod forces;
mod quadtree;

use std::ops::RangeInclusive;

use eframe::egui::{Vec2, vec2};
use tracing::{debug, warn};

use forces::{
    CollisionScratch, SpringLink, apply_centering, apply_charge, apply_collision, apply_links,
};

const ALPHA_MIN: f32 = 0.001;
const ALPHA_TARGET: f32 = 0.0;
const VELOCITY_DECAY: f32 = 0.4;
const LINK_REST_LENGTH: f32 = 150.0;
const INITIAL_SPIRAL_RADIUS: f32 = 10.0;

fn alpha_decay() -> f32 {
    1.0 - ALPHA_MIN.powf(1.0 / 300.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceParameter {
    ChargeStrength,
    CollideFactor,
    LinkStrength,
}

impl ForceParameter {
    pub const ALL: [Self; 3] = [Self::ChargeStrength, Self::CollideFactor, Self::LinkStrength];

    pub fn label(self) -> &'static str {
        match self {
            Self::ChargeStrength => "Charge strength",
            Self::CollideFactor => "Collision factor",
            Self::LinkStrength => "Link strength",
        }
    }

    pub fn hover_text(self) -> &'static str {
        match self {
            Self::ChargeStrength => "Negative values push authors apart, positive pulls them in.",
            Self::CollideFactor => "Multiplier on node radius that keeps circles apart.",
            Self::LinkStrength => "How strongly co-authors are pulled toward the link rest length.",
        }
    }

    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            Self::ChargeStrength => -100.0..=100.0,
            Self::CollideFactor => 1.0..=5.0,
            Self::LinkStrength => 0.01..=1.0,
        }
    }

    pub fn step(self) -> f64 {
        match self {
            Self::ChargeStrength => 1.0,
            Self::CollideFactor => 0.1,
            Self::LinkStrength => 0.01,
        }
    }

    pub fn default_value(self) -> f32 {
        ForceConfig::default().get(self)
    }
}

/// Live force coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceConfig {
    pub charge_strength: f32,
    pub collide_factor: f32,
    pub link_strength: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            charge_strength: -50.0,
            collide_factor: 1.5,
            link_strength: 0.5,
        }
    }
}

impl ForceConfig {
    pub fn get(&self, parameter: ForceParameter) -> f32 {
        match parameter {
            ForceParameter::ChargeStrength => self.charge_strength,
            ForceParameter::CollideFactor => self.collide_factor,
            ForceParameter::LinkStrength => self.link_strength,
        }
    }

    /// Stores `value` clamped to the parameter's range and returns what was stored.
    pub fn set(&mut self, parameter: ForceParameter, value: f32) -> f32 {
        let range = parameter.range();
        let value = if value.is_nan() {
            parameter.default_value()
        } else {
            value.clamp(*range.start(), *range.end())
        };
        match parameter {
            ForceParameter::ChargeStrength => self.charge_strength = value,
            ForceParameter::CollideFactor => self.collide_factor = value,
            ForceParameter::LinkStrength => self.link_strength = value,
        }
        value
    }

    pub fn validated(charge_strength: f32, collide_factor: f32, link_strength: f32) -> Self {
        let mut config = Self::default();
        for (parameter, requested) in [
            (ForceParameter::ChargeStrength, charge_strength),
            (ForceParameter::CollideFactor, collide_factor),
            (ForceParameter::LinkStrength, link_strength),
        ] {
            let stored = config.set(parameter, requested);
            if stored != requested {
                warn!(
                    parameter = parameter.label(),
                    requested,
                    stored,
                    "force parameter outside its range; clamped"
                );
            }
        }
        config
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum SimulationState {
    Idle,
    Converging,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Body {
    pub(in crate::app) position: Vec2,
    pub(in crate::app) velocity: Vec2,
}

/// Positions republished after every tick for the renderer.
#[derive(Default)]
pub(in crate::app) struct LayoutFrame {
    pub(in crate::app) node_positions: Vec<Vec2>,
    pub(in crate::app) edge_segments: Vec<(Vec2, Vec2)>,
}

/// Fixed topology the forces act on.
pub(in crate::app) struct LayoutTopology {
    radii: Vec<f32>,
    links: Vec<SpringLink>,
}

impl LayoutTopology {
    pub(in crate::app) fn new(radii: Vec<f32>, links: &[(usize, usize)]) -> Self {
        let links = SpringLink::with_bias(links, radii.len());
        Self { radii, links }
    }
}

#[derive(Default)]
pub(in crate::app) struct PhysicsScratch {
    positions: Vec<Vec2>,
    collide_radii: Vec<f32>,
    collision: CollisionScratch,
}

/// Advances every body by one tick of the force simulation.
///
/// Forces run in a fixed order (collision, centering, charge, links) and
/// each sees the velocities left by the previous one.
pub(in crate::app) fn step_bodies(
    bodies: &mut [Body],
    topology: &LayoutTopology,
    config: ForceConfig,
    alpha: f32,
    scratch: &mut PhysicsScratch,
) {
    if bodies.is_empty() {
        return;
    }

    scratch.collide_radii.clear();
    scratch.collide_radii.extend(
        topology
            .radii
            .iter()
            .map(|radius| radius * config.collide_factor),
    );
    apply_collision(bodies, &scratch.collide_radii, &mut scratch.collision);

    apply_centering(bodies, alpha);

    scratch.positions.clear();
    scratch.positions.extend(bodies.iter().map(|body| body.position));
    apply_charge(bodies, &scratch.positions, config.charge_strength, alpha);

    apply_links(
        bodies,
        &topology.links,
        LINK_REST_LENGTH,
        config.link_strength,
        alpha,
    );

    for body in bodies.iter_mut() {
        body.velocity *= 1.0 - VELOCITY_DECAY;
        body.position += body.velocity;
    }
}

fn spiral_position(index: usize) -> Vec2 {
    let radius = INITIAL_SPIRAL_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    vec2(angle.cos(), angle.sin()) * radius
}

pub(in crate::app) struct LayoutEngine {
    bodies: Vec<Body>,
    topology: LayoutTopology,
    config: ForceConfig,
    alpha: f32,
    state: SimulationState,
    scratch: PhysicsScratch,
    frame: LayoutFrame,
}

impl LayoutEngine {
    pub(in crate::app) fn new(topology: LayoutTopology, config: ForceConfig) -> Self {
        let bodies = (0..topology.radii.len())
            .map(|index| Body {
                position: spiral_position(index),
                velocity: Vec2::ZERO,
            })
            .collect::<Vec<_>>();

        let mut engine = Self {
            bodies,
            topology,
            config,
            alpha: 1.0,
            state: SimulationState::Converging,
            scratch: PhysicsScratch::default(),
            frame: LayoutFrame::default(),
        };
        engine.publish();
        engine
    }

    pub(in crate::app) fn state(&self) -> SimulationState {
        self.state
    }

    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn config(&self) -> ForceConfig {
        self.config
    }

    pub(in crate::app) fn frame(&self) -> &LayoutFrame {
        &self.frame
    }

    pub(in crate::app) fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub(in crate::app) fn restart(&mut self) {
        self.alpha = 1.0;
        self.state = SimulationState::Converging;
        debug!(nodes = self.bodies.len(), "layout restarted");
    }

    /// Rebinds one force coefficient and restarts convergence.
    pub(in crate::app) fn reconfigure(&mut self, parameter: ForceParameter, value: f32) {
        let stored = self.config.set(parameter, value);
        debug!(parameter = parameter.label(), value = stored, "force reconfigured");
        self.restart();
    }

    pub(in crate::app) fn replace_config(&mut self, config: ForceConfig) {
        for parameter in ForceParameter::ALL {
            self.config.set(parameter, config.get(parameter));
        }
        self.restart();
    }

    /// Runs one tick while converging. Returns whether anything moved.
    pub(in crate::app) fn tick(&mut self) -> bool {
        if self.state == SimulationState::Idle {
            return false;
        }

        self.alpha += (ALPHA_TARGET - self.alpha) * alpha_decay();
        step_bodies(
            &mut self.bodies,
            &self.topology,
            self.config,
            self.alpha,
            &mut self.scratch,
        );
        self.publish();

        if self.alpha < ALPHA_MIN {
            self.state = SimulationState::Idle;
            debug!(nodes = self.bodies.len(), "layout converged");
        }
        true
    }

    fn publish(&mut self) {
        let frame = &mut self.frame;
        frame.node_positions.clear();
        frame
            .node_positions
            .extend(self.bodies.iter().map(|body| body.position));

        frame.edge_segments.clear();
        frame.edge_segments.extend(self.topology.links.iter().map(|link| {
            (
                self.bodies[link.source].position,
                self.bodies[link.target].position,
            )
        }));
    }
}
