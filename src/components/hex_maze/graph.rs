use std::collections::HashMap;
use std::f64::consts::PI;

use super::config::MazeConfig;

/// Dense, zero-based node index within one [`HexGraph`].
pub type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
	pub id: NodeId,
	pub x: f64,
	pub y: f64,
}

/// Hexagon edge graph covering a viewport plus margin.
///
/// Nodes and their neighbor lists are parallel arrays indexed by [`NodeId`];
/// ids are dense and zero-based after bounds filtering. The graph is only
/// ever rebuilt wholesale.
#[derive(Clone, Debug, Default)]
pub struct HexGraph {
	nodes: Vec<Node>,
	adjacency: Vec<Vec<NodeId>>,
	width: f64,
	height: f64,
}

/// Vertex position quantized to 1/100 px, used to merge vertices shared by
/// neighboring hexagons.
fn vertex_key(x: f64, y: f64) -> (i64, i64) {
	((x * 100.0).round() as i64, (y * 100.0).round() as i64)
}

fn link(adjacency: &mut [Vec<NodeId>], a: NodeId, b: NodeId) {
	if a == b {
		return;
	}
	if !adjacency[a].contains(&b) {
		adjacency[a].push(b);
	}
	if !adjacency[b].contains(&a) {
		adjacency[b].push(a);
	}
}

impl HexGraph {
	/// Build the graph for a `width` x `height` viewport.
	///
	/// Covers `[-margin, width + margin] x [-margin, height + margin]` with
	/// `margin = 3 * hex_radius`. A non-positive or non-finite size yields an
	/// empty graph that still records the requested dimensions.
	pub fn build(width: f64, height: f64, config: &MazeConfig) -> Self {
		let hex_radius = config.hex_radius;
		let usable = |v: f64| v.is_finite() && v > 0.0;
		if !usable(width) || !usable(height) || !usable(hex_radius) {
			return Self {
				width: if width.is_finite() { width } else { 0.0 },
				height: if height.is_finite() { height } else { 0.0 },
				..Self::default()
			};
		}

		let margin = config.margin();
		let (hex_width, hex_height) = (config.hex_width(), config.hex_height());

		let min_col = (-margin / hex_width).floor() as i64;
		let max_col = ((width + margin) / hex_width).ceil() as i64;
		let min_row = (-margin / hex_height).floor() as i64;
		let max_row = ((height + margin) / hex_height).ceil() as i64;

		let mut positions: Vec<(f64, f64)> = Vec::new();
		let mut adjacency: Vec<Vec<NodeId>> = Vec::new();
		let mut by_key: HashMap<(i64, i64), NodeId> = HashMap::new();

		for row in min_row..=max_row {
			for col in min_col..=max_col {
				let cx = col as f64 * hex_width + row.rem_euclid(2) as f64 * hex_width * 0.5;
				let cy = row as f64 * hex_height;

				let mut corners = [0usize; 6];
				for (v, corner) in corners.iter_mut().enumerate() {
					let angle = PI / 3.0 * v as f64 + PI / 6.0;
					let (vx, vy) = (
						cx + hex_radius * angle.cos(),
						cy + hex_radius * angle.sin(),
					);
					*corner = *by_key.entry(vertex_key(vx, vy)).or_insert_with(|| {
						positions.push((vx, vy));
						adjacency.push(Vec::new());
						positions.len() - 1
					});
				}

				for v in 0..6 {
					link(&mut adjacency, corners[v], corners[(v + 1) % 6]);
				}
			}
		}

		// Drop candidates outside the padded bounds and compact the ids.
		let in_bounds = |&(x, y): &(f64, f64)| {
			x >= -margin && x <= width + margin && y >= -margin && y <= height + margin
		};
		let mut remap: Vec<Option<NodeId>> = vec![None; positions.len()];
		let mut nodes = Vec::new();
		for (old, pos) in positions.iter().enumerate() {
			if in_bounds(pos) {
				remap[old] = Some(nodes.len());
				nodes.push(Node {
					id: nodes.len(),
					x: pos.0,
					y: pos.1,
				});
			}
		}

		let adjacency: Vec<Vec<NodeId>> = adjacency
			.into_iter()
			.enumerate()
			.filter(|(old, _)| remap[*old].is_some())
			.map(|(_, neighbors)| neighbors.into_iter().filter_map(|n| remap[n]).collect())
			.collect();

		Self {
			nodes,
			adjacency,
			width,
			height,
		}
	}

	#[cfg(test)]
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(id)
	}

	/// Neighbors of `id`; empty for isolated or unknown ids.
	pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
		self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Viewport width this graph was built for.
	#[cfg(test)]
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Viewport height this graph was built for.
	#[cfg(test)]
	pub fn height(&self) -> f64 {
		self.height
	}

	/// True when a `width` x `height` viewport fits inside the built area.
	pub fn covers(&self, width: f64, height: f64) -> bool {
		width <= self.width && height <= self.height
	}

	/// Closest node by squared distance. Ties keep the lowest id.
	pub fn nearest_node(&self, x: f64, y: f64) -> Option<NodeId> {
		let mut nearest = None;
		let mut best = f64::INFINITY;
		for node in &self.nodes {
			let (dx, dy) = (node.x - x, node.y - y);
			let dist_sq = dx * dx + dy * dy;
			if dist_sq < best {
				best = dist_sq;
				nearest = Some(node.id);
			}
		}
		nearest
	}

	/// Nodes strictly closer than `radius` to `(x, y)`, in id order.
	pub fn nodes_within(&self, x: f64, y: f64, radius: f64) -> Vec<NodeId> {
		let radius_sq = radius * radius;
		self.nodes
			.iter()
			.filter(|node| {
				let (dx, dy) = (node.x - x, node.y - y);
				dx * dx + dy * dy < radius_sq
			})
			.map(|node| node.id)
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use super::*;

	type Edge = ((i64, i64), (i64, i64));

	fn position_set(graph: &HexGraph) -> BTreeSet<(i64, i64)> {
		graph.nodes().iter().map(|n| vertex_key(n.x, n.y)).collect()
	}

	fn edge_set(graph: &HexGraph) -> BTreeSet<Edge> {
		let mut edges = BTreeSet::new();
		for node in graph.nodes() {
			for &n in graph.neighbors(node.id) {
				let other = graph.node(n).unwrap();
				edges.insert((vertex_key(node.x, node.y), vertex_key(other.x, other.y)));
			}
		}
		edges
	}

	#[test]
	fn adjacency_is_symmetric_without_self_loops() {
		let graph = HexGraph::build(400.0, 300.0, &MazeConfig::default());
		assert!(!graph.is_empty());
		for node in graph.nodes() {
			let neighbors = graph.neighbors(node.id);
			assert!(!neighbors.contains(&node.id), "self loop at {}", node.id);
			let unique: BTreeSet<_> = neighbors.iter().collect();
			assert_eq!(unique.len(), neighbors.len(), "duplicate edge at {}", node.id);
			for &n in neighbors {
				assert!(n < graph.len());
				assert!(graph.neighbors(n).contains(&node.id));
			}
		}
	}

	#[test]
	fn ids_are_dense() {
		let graph = HexGraph::build(400.0, 300.0, &MazeConfig::default());
		for (i, node) in graph.nodes().iter().enumerate() {
			assert_eq!(node.id, i);
		}
	}

	#[test]
	fn nodes_stay_within_padded_bounds() {
		let (w, h) = (640.0, 480.0);
		let margin = 60.0;
		let graph = HexGraph::build(w, h, &MazeConfig::default());
		for node in graph.nodes() {
			assert!(node.x >= -margin && node.x <= w + margin, "x out of range: {}", node.x);
			assert!(node.y >= -margin && node.y <= h + margin, "y out of range: {}", node.y);
		}
	}

	#[test]
	fn hex_grid_degrees_for_small_viewport() {
		let graph = HexGraph::build(400.0, 300.0, &MazeConfig::default());
		assert!(!graph.is_empty());
		for node in graph.nodes() {
			let degree = graph.neighbors(node.id).len();
			assert!((1..=3).contains(&degree), "node {} has degree {}", node.id, degree);
		}
	}

	#[test]
	fn neighbors_are_one_radius_apart() {
		let graph = HexGraph::build(300.0, 200.0, &MazeConfig::default());
		for node in graph.nodes() {
			for &n in graph.neighbors(node.id) {
				let other = graph.node(n).unwrap();
				let dist = ((node.x - other.x).powi(2) + (node.y - other.y).powi(2)).sqrt();
				assert!((dist - 20.0).abs() < 0.01, "edge length {}", dist);
			}
		}
	}

	#[test]
	fn rebuild_is_deterministic() {
		let a = HexGraph::build(500.0, 350.0, &MazeConfig::default());
		let b = HexGraph::build(500.0, 350.0, &MazeConfig::default());
		assert_eq!(a.len(), b.len());
		assert_eq!(position_set(&a), position_set(&b));
		assert_eq!(edge_set(&a), edge_set(&b));
	}

	#[test]
	fn degenerate_sizes_build_empty_graphs() {
		for (w, h) in [(0.0, 0.0), (-10.0, 300.0), (400.0, 0.0), (f64::NAN, 100.0)] {
			let graph = HexGraph::build(w, h, &MazeConfig::default());
			assert!(graph.is_empty());
			assert_eq!(graph.nearest_node(0.0, 0.0), None);
			assert!(graph.neighbors(0).is_empty());
		}
	}

	#[test]
	fn nearest_node_picks_closest_vertex() {
		let graph = HexGraph::build(400.0, 300.0, &MazeConfig::default());
		let target = graph.nodes()[graph.len() / 2];
		let nearest = graph.nearest_node(target.x + 0.5, target.y - 0.5).unwrap();
		assert_eq!(nearest, target.id);
	}

	#[test]
	fn nodes_within_respects_radius() {
		let graph = HexGraph::build(400.0, 300.0, &MazeConfig::default());
		let (x, y) = (200.0, 150.0);
		let near = graph.nodes_within(x, y, 60.0);
		assert!(near.len() > 1);
		for node in graph.nodes() {
			let dist_sq = (node.x - x).powi(2) + (node.y - y).powi(2);
			assert_eq!(near.contains(&node.id), dist_sq < 3600.0);
		}
	}

	#[test]
	fn covers_tracks_build_dimensions() {
		let graph = HexGraph::build(800.0, 600.0, &MazeConfig::default());
		assert_eq!((graph.width(), graph.height()), (800.0, 600.0));
		assert!(graph.covers(800.0, 600.0));
		assert!(graph.covers(400.0, 300.0));
		assert!(!graph.covers(801.0, 600.0));
		assert!(!graph.covers(800.0, 601.0));
	}
}
