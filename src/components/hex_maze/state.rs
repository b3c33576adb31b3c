use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::agent::MazeLine;
use super::config::MazeConfig;
use super::graph::HexGraph;

/// What the frame loop should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
	/// Some line is still moving; schedule another frame.
	Continue,
	/// Every line has ended; the final frame was drawn and the loop stops.
	Idle,
}

/// All mutable state of one hex maze instance.
///
/// Browser-free: the mount layer feeds it sizes, pointer positions and frame
/// timestamps, and schedules frames whenever a method asks it to.
pub struct HexMazeState {
	config: MazeConfig,
	graph: HexGraph,
	lines: Vec<MazeLine>,
	rng: SmallRng,
	width: f64,
	height: f64,
	pub animation_running: bool,
	last_time: Option<f64>,
	last_move: Option<f64>,
}

impl HexMazeState {
	pub fn new(config: MazeConfig, seed: u64) -> Self {
		Self {
			config,
			graph: HexGraph::default(),
			lines: Vec::new(),
			rng: SmallRng::seed_from_u64(seed),
			width: 0.0,
			height: 0.0,
			animation_running: false,
			last_time: None,
			last_move: None,
		}
	}

	pub fn config(&self) -> &MazeConfig {
		&self.config
	}

	pub fn graph(&self) -> &HexGraph {
		&self.graph
	}

	pub fn lines(&self) -> &[MazeLine] {
		&self.lines
	}

	/// Current drawing surface size, which may be smaller than the graph.
	pub fn surface_size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Record a new surface size. The graph is rebuilt only when the size
	/// grows past what it already covers; doing so drops every line.
	///
	/// Returns true when the caller must schedule a frame.
	pub fn resize(&mut self, width: f64, height: f64) -> bool {
		self.width = width;
		self.height = height;
		if self.graph.covers(width, height) {
			return false;
		}

		self.lines.clear();
		self.graph = HexGraph::build(width, height, &self.config);
		if self.graph.is_empty() {
			debug!("viewport {}x{} has no area, hex graph left empty", width, height);
		} else {
			debug!(
				"rebuilt hex graph for {}x{}: {} nodes",
				width,
				height,
				self.graph.len()
			);
		}
		self.request_frame()
	}

	/// Start `count` lines near `(x, y)`: the first on the nearest node, the
	/// rest scattered over nodes within the spawn radius.
	///
	/// Returns true when the caller must schedule a frame.
	pub fn spawn(&mut self, x: f64, y: f64, count: usize) -> bool {
		let Some(nearest) = self.graph.nearest_node(x, y) else {
			return false;
		};
		let nearby = self.graph.nodes_within(x, y, self.config.spawn_radius());

		for i in 0..count {
			let start = if i > 0 && nearby.len() > 1 {
				nearby[self.rng.random_range(0..nearby.len())]
			} else {
				nearest
			};
			let line = MazeLine::new(start, &self.graph, &self.config, &mut self.rng);
			self.lines.push(line);
		}
		self.request_frame()
	}

	/// Pointer-move throttle. Accepts the first move, then one move per
	/// `move_throttle_ms`.
	pub fn accept_move(&mut self, now_ms: f64) -> bool {
		if let Some(last) = self.last_move {
			if now_ms - last <= self.config.move_throttle_ms {
				return false;
			}
		}
		self.last_move = Some(now_ms);
		true
	}

	/// Advance every moving line to frame time `time_ms`.
	///
	/// The first tick after a (re)start uses a zero delta. Once no line is
	/// moving, the loop is marked stopped and the timing baseline is reset.
	pub fn tick(&mut self, time_ms: f64) -> FrameOutcome {
		let dt = self
			.last_time
			.map(|last| ((time_ms - last) / 1000.0).max(0.0))
			.unwrap_or(0.0);
		self.last_time = Some(time_ms);

		if self.lines.iter().all(MazeLine::is_terminal) {
			self.animation_running = false;
			self.last_time = None;
			return FrameOutcome::Idle;
		}

		let speed = self.config.line_speed;
		for line in self.lines.iter_mut().filter(|l| !l.is_terminal()) {
			line.advance(dt, speed, &self.graph, &mut self.rng);
		}
		FrameOutcome::Continue
	}

	/// Drop every line and stop the loop.
	pub fn clear(&mut self) {
		self.lines.clear();
		self.animation_running = false;
		self.last_time = None;
	}

	fn request_frame(&mut self) -> bool {
		if self.animation_running {
			return false;
		}
		self.animation_running = true;
		self.last_time = None;
		true
	}
}
