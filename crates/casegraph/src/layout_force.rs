//! Force-directed layout driven one step at a time.
//!
//! The host owns the loop: it calls [`ForceLayout::step`] with the ticket
//! returned by [`ForceLayout::start`] until the outcome is no longer
//! `Running`. Positions then stay frozen until the next run or a reset.

use crate::graph::RelationshipGraph;
use crate::layout_settings::ForceSettings;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use tracing::{debug, info};

/// Distances are never taken below this, so coincident nodes stay finite.
const MIN_DISTANCE: f32 = 1.0;

/// Steps taken before a run may converge. Velocities start at zero, so the
/// first few steps move little however far the nodes are from rest.
const MIN_SETTLE_ITERATIONS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Identifies one layout run. Steps with an older ticket are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RunTicket {
    generation: u64,
}

impl RunTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Running { iteration: usize, displacement: f32 },
    Converged { iterations: usize },
    Capped { iterations: usize },
    /// The run already ended; positions did not change.
    Frozen,
    /// No run has been started.
    Idle,
    /// The ticket belongs to a superseded run; positions did not change.
    Stale,
}

impl StepOutcome {
    pub fn is_running(self) -> bool {
        matches!(self, StepOutcome::Running { .. })
    }

    /// True for the step that ended the run.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StepOutcome::Converged { .. } | StepOutcome::Capped { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPhase {
    #[default]
    Idle,
    Running,
    Frozen,
}

/// Node positions as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionFrame {
    pub generation: u64,
    pub iteration: usize,
    pub frozen: bool,
    pub positions: Vec<Point>,
}

#[derive(Debug, Clone)]
pub struct ForceLayout {
    settings: ForceSettings,
    generation: u64,
    phase: LayoutPhase,
    iteration: usize,
    /// `n x 2`, one row per node.
    positions: Array2<f32>,
    velocities: Array2<f32>,
    masses: Array1<f32>,
    springs: Vec<(usize, usize)>,
    pinned: Option<usize>,
}

impl ForceLayout {
    pub fn new(settings: ForceSettings) -> Self {
        Self {
            settings: settings.clamped(),
            generation: 0,
            phase: LayoutPhase::Idle,
            iteration: 0,
            positions: Array2::zeros((0, 2)),
            velocities: Array2::zeros((0, 2)),
            masses: Array1::zeros(0),
            springs: Vec::new(),
            pinned: None,
        }
    }

    /// Begin a new run for `graph`, cancelling any run in flight.
    pub fn start(&mut self, graph: &RelationshipGraph) -> RunTicket {
        let n = graph.node_count();
        self.springs = graph.edges().iter().map(|e| (e.from, e.to)).collect();
        self.masses =
            Array1::from_iter((0..n).map(|i| 1.0 + graph.degree(i) as f32));
        self.pinned = None;
        let ticket = self.restart();
        info!(
            generation = ticket.generation,
            nodes = n,
            springs = self.springs.len(),
            "layout run started"
        );
        ticket
    }

    /// Throw away the current positions and run again on the same graph
    /// from the seeded placement. Outstanding tickets become stale.
    pub fn reset(&mut self) -> RunTicket {
        self.pinned = None;
        let ticket = self.restart();
        debug!(generation = ticket.generation, "layout reset");
        ticket
    }

    fn restart(&mut self) -> RunTicket {
        self.generation = self.generation.wrapping_add(1);
        self.iteration = 0;
        self.phase = LayoutPhase::Running;
        self.positions = self.initial_positions(self.masses.len());
        self.velocities = Array2::zeros((self.masses.len(), 2));
        RunTicket {
            generation: self.generation,
        }
    }

    /// Seeded placement inside a disc that grows with the node count.
    fn initial_positions(&self, n: usize) -> Array2<f32> {
        let mut rng = StdRng::seed_from_u64(self.settings.seed);
        let radius = self.settings.spring_length * (n as f32).sqrt().max(1.0);
        let mut positions = Array2::zeros((n, 2));
        for i in 0..n {
            let angle = rng.random_range(0.0..TAU);
            let r = radius * rng.random::<f32>().sqrt();
            positions[[i, 0]] = r * angle.cos();
            positions[[i, 1]] = r * angle.sin();
        }
        positions
    }

    /// Advance the run identified by `ticket` by one iteration.
    pub fn step(&mut self, ticket: RunTicket) -> StepOutcome {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "ignoring step for superseded layout run"
            );
            return StepOutcome::Stale;
        }
        match self.phase {
            LayoutPhase::Idle => return StepOutcome::Idle,
            LayoutPhase::Frozen => return StepOutcome::Frozen,
            LayoutPhase::Running => {}
        }

        let n = self.masses.len();
        if n == 0 {
            self.phase = LayoutPhase::Frozen;
            return StepOutcome::Converged { iterations: 0 };
        }

        let forces = self.forces();
        let residual = self.residual(&forces);
        let displacement = self.integrate(&forces);
        self.iteration += 1;

        let settled = self.iteration >= MIN_SETTLE_ITERATIONS
            && displacement < self.settings.displacement_epsilon
            && residual < self.settings.force_epsilon;
        if settled {
            self.phase = LayoutPhase::Frozen;
            info!(iterations = self.iteration, "layout converged");
            StepOutcome::Converged {
                iterations: self.iteration,
            }
        } else if self.iteration >= self.settings.max_iterations {
            self.phase = LayoutPhase::Frozen;
            info!(
                iterations = self.iteration,
                displacement, "layout stopped at the iteration cap"
            );
            StepOutcome::Capped {
                iterations: self.iteration,
            }
        } else {
            StepOutcome::Running {
                iteration: self.iteration,
                displacement,
            }
        }
    }

    /// Step until the run ends. Always terminates within the iteration cap.
    pub fn run_to_end(&mut self, ticket: RunTicket) -> StepOutcome {
        loop {
            let outcome = self.step(ticket);
            if !outcome.is_running() {
                return outcome;
            }
        }
    }

    fn forces(&self) -> Array2<f32> {
        let n = self.masses.len();
        let s = &self.settings;
        let p = &self.positions;
        let mut f = Array2::<f32>::zeros((n, 2));

        // Repulsion between every pair.
        for i in 0..n {
            for j in (i + 1)..n {
                let (ux, uy, d) = direction(p, i, j);
                let push =
                    s.repulsion * self.masses[i] * self.masses[j] / (d * d);
                f[[i, 0]] += ux * push;
                f[[i, 1]] += uy * push;
                f[[j, 0]] -= ux * push;
                f[[j, 1]] -= uy * push;
            }
        }

        // Springs pull connected nodes toward the rest length.
        for &(a, b) in &self.springs {
            let (ux, uy, d) = direction(p, a, b);
            let pull = s.spring_constant * (d - s.spring_length);
            f[[a, 0]] -= ux * pull;
            f[[a, 1]] -= uy * pull;
            f[[b, 0]] += ux * pull;
            f[[b, 1]] += uy * pull;
        }

        for i in 0..n {
            let m = self.masses[i];
            f[[i, 0]] -= s.central_gravity * m * p[[i, 0]];
            f[[i, 1]] -= s.central_gravity * m * p[[i, 1]];
        }

        f
    }

    /// Largest net force per unit mass on a free node. A node at the end of
    /// a swing moves little but is still pulled hard, so this keeps such a
    /// step from counting as converged.
    fn residual(&self, forces: &Array2<f32>) -> f32 {
        (0..self.masses.len())
            .filter(|&i| self.pinned != Some(i))
            .map(|i| forces[[i, 0]].hypot(forces[[i, 1]]) / self.masses[i])
            .fold(0.0, f32::max)
    }

    /// Apply one damped Euler step; returns the summed displacement.
    fn integrate(&mut self, forces: &Array2<f32>) -> f32 {
        let s = self.settings;
        let keep = 1.0 - s.damping;
        let mut displacement = 0.0;
        for i in 0..self.masses.len() {
            if self.pinned == Some(i) {
                self.velocities[[i, 0]] = 0.0;
                self.velocities[[i, 1]] = 0.0;
                continue;
            }
            let m = self.masses[i];
            let ax = forces[[i, 0]] / m;
            let ay = forces[[i, 1]] / m;
            let mut vx = (self.velocities[[i, 0]] + ax * s.timestep) * keep;
            let mut vy = (self.velocities[[i, 1]] + ay * s.timestep) * keep;
            let speed = vx.hypot(vy);
            if speed > s.max_velocity {
                vx *= s.max_velocity / speed;
                vy *= s.max_velocity / speed;
            }
            self.velocities[[i, 0]] = vx;
            self.velocities[[i, 1]] = vy;
            self.positions[[i, 0]] += vx * s.timestep;
            self.positions[[i, 1]] += vy * s.timestep;
            displacement += vx.hypot(vy) * s.timestep;
        }
        displacement
    }

    /// Move `node` to `to` and hold it there until
    /// [`release`](Self::release). A frozen layout is updated in place
    /// without restarting the run.
    pub fn drag(&mut self, node: usize, to: Point) -> bool {
        if node >= self.masses.len() {
            return false;
        }
        self.positions[[node, 0]] = to.x;
        self.positions[[node, 1]] = to.y;
        self.velocities[[node, 0]] = 0.0;
        self.velocities[[node, 1]] = 0.0;
        self.pinned = Some(node);
        true
    }

    pub fn release(&mut self) {
        self.pinned = None;
    }

    pub fn is_pinned(&self, node: usize) -> bool {
        self.pinned == Some(node)
    }

    pub fn position(&self, node: usize) -> Option<Point> {
        (node < self.masses.len()).then(|| {
            Point::new(self.positions[[node, 0]], self.positions[[node, 1]])
        })
    }

    pub fn positions(&self) -> Vec<Point> {
        self.positions
            .rows()
            .into_iter()
            .map(|row| Point::new(row[0], row[1]))
            .collect()
    }

    pub fn frame(&self) -> PositionFrame {
        PositionFrame {
            generation: self.generation,
            iteration: self.iteration,
            frozen: self.phase == LayoutPhase::Frozen,
            positions: self.positions(),
        }
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn settings(&self) -> &ForceSettings {
        &self.settings
    }
}

/// Unit vector from node `i` to node `j` and their (floored) distance.
/// Coincident nodes get a fixed direction derived from their indices.
fn direction(p: &Array2<f32>, i: usize, j: usize) -> (f32, f32, f32) {
    let dx = p[[i, 0]] - p[[j, 0]];
    let dy = p[[i, 1]] - p[[j, 1]];
    let d = dx.hypot(dy);
    if d < MIN_DISTANCE || !d.is_finite() {
        let angle = ((i * 31 + j * 17) % 360) as f32;
        let angle = angle.to_radians();
        return (angle.cos(), angle.sin(), MIN_DISTANCE);
    }
    (dx / d, dy / d, d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Connection, Entity};

    fn star(leaves: usize) -> Vec<Entity> {
        let mut hub = Entity::new("Hub", "Hospital");
        let mut entities = Vec::new();
        for k in 0..leaves {
            let name = format!("Leaf {k}");
            hub = hub.with_connection(name.clone(), "Shared Entity");
            entities.push(Entity::new(name, "Individual - Physician"));
        }
        entities.insert(0, hub);
        entities
    }

    fn random_graph(n: usize, edges: usize, seed: u64) -> Vec<Entity> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut entities: Vec<Entity> = (0..n)
            .map(|i| Entity::new(format!("E{i}"), "Business Entity"))
            .collect();
        for _ in 0..edges {
            let a = rng.random_range(0..n);
            let b = rng.random_range(0..n);
            let target = format!("E{b}");
            entities[a].connections.push(Connection::new(target, "x"));
        }
        entities
    }

    /// Checks the minimum pairwise separation and that connected pairs sit
    /// closer on average than unconnected ones.
    fn assert_readable(
        graph: &RelationshipGraph,
        positions: &[Point],
        min_separation: f32,
    ) {
        let mut connected = Vec::new();
        let mut unconnected = Vec::new();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let d = positions[i].distance(positions[j]);
                assert!(
                    d > min_separation,
                    "nodes {i} and {j} overlap at distance {d}"
                );
                if graph.has_edge(i, j) {
                    connected.push(d);
                } else {
                    unconnected.push(d);
                }
            }
        }
        let mean = |v: &[f32]| v.iter().sum::<f32>() / v.len() as f32;
        assert!(
            mean(&connected) < mean(&unconnected),
            "connected pairs should sit closer: {} vs {}",
            mean(&connected),
            mean(&unconnected)
        );
    }

    #[test]
    fn terminates_within_cap_for_large_graphs() {
        let entities = random_graph(200, 300, 7);
        let graph = RelationshipGraph::build(&entities);
        let mut layout = ForceLayout::new(ForceSettings::default());
        let ticket = layout.start(&graph);
        let outcome = layout.run_to_end(ticket);
        assert!(outcome.is_terminal(), "unexpected outcome {outcome:?}");
        assert!(layout.iteration() <= 150);
        assert_eq!(layout.phase(), LayoutPhase::Frozen);

        let positions = layout.positions();
        assert!(
            positions.iter().all(|p| p.x.is_finite() && p.y.is_finite()),
            "positions must stay finite"
        );
        assert_readable(&graph, &positions, 20.0);
    }

    #[test]
    fn converged_springs_sit_near_rest_length() {
        let pair = [
            Entity::new("A", "Hospital").with_connection("B", "Shared Entity"),
            Entity::new("B", "Business Entity"),
        ];
        let graph = RelationshipGraph::build(&pair);
        let rest = ForceSettings::default().spring_length;
        for seed in 0..16 {
            let mut layout = ForceLayout::new(ForceSettings {
                seed,
                ..ForceSettings::default()
            });
            let ticket = layout.start(&graph);
            let outcome = layout.run_to_end(ticket);
            assert!(outcome.is_terminal(), "seed {seed}: {outcome:?}");
            if let StepOutcome::Converged { iterations } = outcome {
                assert!(iterations >= MIN_SETTLE_ITERATIONS);
                let positions = layout.positions();
                let d = positions[0].distance(positions[1]);
                assert!(
                    (d - rest).abs() < 15.0,
                    "seed {seed}: converged with the spring at {d}"
                );
            }
        }
    }

    #[test]
    fn stretched_spring_does_not_converge_on_first_step() {
        let pair = [
            Entity::new("A", "Hospital").with_connection("B", "Shared Entity"),
            Entity::new("B", "Business Entity"),
        ];
        let graph = RelationshipGraph::build(&pair);
        let mut layout = ForceLayout::new(ForceSettings::default());
        let ticket = layout.start(&graph);
        layout.drag(0, Point::new(-65.0, 0.0));
        layout.drag(1, Point::new(65.0, 0.0));
        layout.release();

        let outcome = layout.step(ticket);
        assert!(outcome.is_running(), "unexpected {outcome:?}");
        let outcome = layout.run_to_end(ticket);
        let StepOutcome::Converged { iterations } = outcome else {
            panic!("unexpected {outcome:?}");
        };
        assert!(iterations >= MIN_SETTLE_ITERATIONS);
        let positions = layout.positions();
        let d = positions[0].distance(positions[1]);
        assert!((d - 100.0).abs() < 15.0, "spring left at {d}");
    }

    #[test]
    fn identical_seeds_give_identical_layouts() {
        let entities = random_graph(40, 60, 3);
        let graph = RelationshipGraph::build(&entities);
        let run = || {
            let mut layout = ForceLayout::new(ForceSettings::default());
            let ticket = layout.start(&graph);
            layout.run_to_end(ticket);
            layout.positions()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn star_topology() {
        let entities = star(5);
        let graph = RelationshipGraph::build(&entities);
        let mut layout = ForceLayout::new(ForceSettings::default());
        let ticket = layout.start(&graph);
        layout.run_to_end(ticket);
        assert_readable(&graph, &layout.positions(), 20.0);
    }

    #[test]
    fn stale_ticket_does_not_move_nodes() {
        let graph = RelationshipGraph::build(&star(3));
        let mut layout = ForceLayout::new(ForceSettings::default());
        let old = layout.start(&graph);
        let current = layout.start(&graph);
        let before = layout.positions();
        assert_eq!(layout.step(old), StepOutcome::Stale);
        assert_eq!(layout.positions(), before);
        assert!(layout.step(current).is_running());
    }

    #[test]
    fn pinned_node_stays_put() {
        let graph = RelationshipGraph::build(&star(4));
        let mut layout = ForceLayout::new(ForceSettings::default());
        let ticket = layout.start(&graph);
        let target = Point::new(500.0, -250.0);
        assert!(layout.drag(0, target));
        assert!(layout.is_pinned(0));
        for _ in 0..10 {
            layout.step(ticket);
        }
        assert_eq!(layout.position(0), Some(target));

        layout.release();
        assert!(!layout.is_pinned(0));
        assert!(!layout.drag(99, target));
    }

    #[test]
    fn frozen_layout_does_not_move() {
        let graph = RelationshipGraph::build(&star(2));
        let mut layout = ForceLayout::new(ForceSettings {
            max_iterations: 3,
            ..ForceSettings::default()
        });
        let ticket = layout.start(&graph);
        let outcome = layout.run_to_end(ticket);
        assert!(outcome.is_terminal());
        let frozen = layout.positions();
        assert_eq!(layout.step(ticket), StepOutcome::Frozen);
        assert_eq!(layout.positions(), frozen);
        assert!(layout.frame().frozen);

        // Dragging a frozen layout moves only that node.
        assert!(layout.drag(1, Point::new(1.0, 2.0)));
        assert_eq!(layout.phase(), LayoutPhase::Frozen);
        assert_eq!(layout.positions()[0], frozen[0]);
    }

    #[test]
    fn reset_supersedes_previous_ticket() {
        let graph = RelationshipGraph::build(&star(3));
        let mut layout = ForceLayout::new(ForceSettings::default());
        let first = layout.start(&graph);
        layout.run_to_end(first);
        let second = layout.reset();
        assert_eq!(layout.step(first), StepOutcome::Stale);
        assert_eq!(layout.phase(), LayoutPhase::Running);
        assert_eq!(layout.iteration(), 0);
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn idle_and_empty() {
        let mut layout = ForceLayout::new(ForceSettings::default());
        let ticket = layout.start(&RelationshipGraph::build(&[]));
        assert_eq!(
            layout.step(ticket),
            StepOutcome::Converged { iterations: 0 }
        );
        assert_eq!(layout.step(ticket), StepOutcome::Frozen);
        assert!(layout.positions().is_empty());

        let mut idle = ForceLayout::new(ForceSettings::default());
        assert_eq!(idle.phase(), LayoutPhase::Idle);
        assert_eq!(idle.frame().generation, 0);
        assert_eq!(idle.step(RunTicket { generation: 0 }), StepOutcome::Idle);
    }
}
