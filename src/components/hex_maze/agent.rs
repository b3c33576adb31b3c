use rand::Rng;

use super::config::MazeConfig;
use super::graph::{HexGraph, NodeId};

/// A line that walks the hex graph one edge at a time.
///
/// Holds node ids only, so it must be discarded whenever the graph it was
/// spawned on is rebuilt.
#[derive(Clone, Debug)]
pub struct MazeLine {
	current: NodeId,
	prev: Option<NodeId>,
	target: Option<NodeId>,
	progress: f64,
	vertices: Vec<NodeId>,
	ended: bool,
	segment_budget: usize,
}

impl MazeLine {
	pub fn new<R: Rng + ?Sized>(
		start: NodeId,
		graph: &HexGraph,
		config: &MazeConfig,
		rng: &mut R,
	) -> Self {
		let min = config.min_segments();
		let variance = config.segment_count_variance as usize;
		let segment_budget = if variance == 0 {
			min
		} else {
			min + rng.random_range(0..variance)
		};

		let mut line = Self {
			current: start,
			prev: None,
			target: None,
			progress: 0.0,
			vertices: vec![start],
			ended: false,
			segment_budget,
		};
		if line.vertices.len() >= line.segment_budget {
			line.ended = true;
		} else {
			line.pick_next_target(graph, rng);
		}
		line
	}

	/// Choose the next neighbor, avoiding an immediate backtrack unless it is
	/// the only way out.
	fn pick_next_target<R: Rng + ?Sized>(&mut self, graph: &HexGraph, rng: &mut R) {
		let neighbors = graph.neighbors(self.current);
		if neighbors.is_empty() {
			self.ended = true;
			self.target = None;
			return;
		}

		let forward: Vec<NodeId> = neighbors
			.iter()
			.copied()
			.filter(|&n| Some(n) != self.prev)
			.collect();
		let choices = if forward.is_empty() {
			neighbors
		} else {
			forward.as_slice()
		};
		self.target = Some(choices[rng.random_range(0..choices.len())]);
	}

	/// Move along the graph by `speed * dt` edges.
	///
	/// Large steps may commit several vertices in one call. No-op once ended.
	pub fn advance<R: Rng + ?Sized>(
		&mut self,
		dt: f64,
		speed: f64,
		graph: &HexGraph,
		rng: &mut R,
	) {
		if self.ended || self.target.is_none() {
			return;
		}
		self.progress += speed * dt;

		while self.progress >= 1.0 && !self.ended {
			let Some(target) = self.target else {
				break;
			};
			self.prev = Some(self.current);
			self.current = target;
			self.vertices.push(target);
			self.progress -= 1.0;

			if self.vertices.len() >= self.segment_budget {
				self.ended = true;
				break;
			}
			self.pick_next_target(graph, rng);
		}
	}

	pub fn is_terminal(&self) -> bool {
		self.ended
	}

	#[cfg(test)]
	pub fn current(&self) -> NodeId {
		self.current
	}

	#[cfg(test)]
	pub fn target(&self) -> Option<NodeId> {
		self.target
	}

	#[cfg(test)]
	pub fn progress(&self) -> f64 {
		self.progress
	}

	/// Committed path, start vertex first.
	#[cfg(test)]
	pub fn vertices(&self) -> &[NodeId] {
		&self.vertices
	}

	#[cfg(test)]
	pub fn segment_budget(&self) -> usize {
		self.segment_budget
	}

	/// Points to stroke: every committed vertex, then the partial segment
	/// toward the target while the line is still moving.
	pub fn polyline(&self, graph: &HexGraph) -> Vec<(f64, f64)> {
		let mut points: Vec<(f64, f64)> = self
			.vertices
			.iter()
			.filter_map(|&id| graph.node(id))
			.map(|node| (node.x, node.y))
			.collect();

		if !self.ended && self.progress > 0.0 {
			if let (Some(from), Some(to)) = (
				graph.node(self.current),
				self.target.and_then(|t| graph.node(t)),
			) {
				points.push((
					from.x + (to.x - from.x) * self.progress,
					from.y + (to.y - from.y) * self.progress,
				));
			}
		}
		points
	}
}
