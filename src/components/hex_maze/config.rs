/// CSS variable read on the host element for the stroke color.
pub const LINE_COLOR_VAR: &str = "--maze-line-color";
/// CSS variable read on the host element for the stroke width.
pub const LINE_WIDTH_VAR: &str = "--maze-line-width";

/// Tunables for one hex maze instance. Read-only once mounted.
#[derive(Clone, Debug, PartialEq)]
pub struct MazeConfig {
	/// Hexagon radius, center to vertex, in pixels.
	pub hex_radius: f64,
	/// Graph nodes traversed per second.
	pub line_speed: f64,
	/// Upper bound (exclusive) of a line's vertex budget.
	pub segment_count_max: u32,
	/// Spread of the vertex budget below `segment_count_max`.
	pub segment_count_variance: u32,
	/// Fallback stroke color when `--maze-line-color` is unset.
	pub line_color: String,
	/// Fallback stroke width when `--maze-line-width` is unset or invalid.
	pub line_width: f64,
	/// Lines spawned per click.
	pub spawn_count_click: usize,
	/// Lines spawned per accepted pointer move.
	pub spawn_count_move: usize,
	/// Lines spawned at the canvas center right after mounting.
	pub spawn_count_seed: usize,
	/// Minimum gap between accepted pointer moves, compared against
	/// `Date.now()` milliseconds.
	pub move_throttle_ms: f64,
	/// Quiet period after the last window resize before the canvas is
	/// resized. `i32` because that is what `setTimeout` takes.
	pub resize_debounce_ms: i32,
}

impl Default for MazeConfig {
	fn default() -> Self {
		Self {
			hex_radius: 20.0,
			line_speed: 3.0,
			segment_count_max: 20,
			segment_count_variance: 10,
			line_color: "#00A69C".into(),
			line_width: 2.0,
			spawn_count_click: 6,
			spawn_count_move: 1,
			spawn_count_seed: 3,
			move_throttle_ms: 150.0,
			resize_debounce_ms: 200,
		}
	}
}

impl MazeConfig {
	/// Horizontal distance between neighboring hex centers in a row.
	pub fn hex_width(&self) -> f64 {
		self.hex_radius * 3f64.sqrt()
	}

	/// Vertical distance between hex rows.
	pub fn hex_height(&self) -> f64 {
		self.hex_radius * 1.5
	}

	/// Padding generated around the viewport so lines can run off-screen.
	pub fn margin(&self) -> f64 {
		self.hex_radius * 3.0
	}

	/// Radius around the pointer from which extra spawns pick their start node.
	pub fn spawn_radius(&self) -> f64 {
		self.hex_radius * 3.0
	}

	/// Smallest segment budget a line can draw. Never below one vertex.
	pub fn min_segments(&self) -> usize {
		self.segment_count_max
			.saturating_sub(self.segment_count_variance)
			.max(1) as usize
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn derived_dimensions_follow_radius() {
		let config = MazeConfig::default();
		assert!((config.hex_width() - 20.0 * 3f64.sqrt()).abs() < 1e-9);
		assert_eq!(config.hex_height(), 30.0);
		assert_eq!(config.margin(), 60.0);
		assert_eq!(config.min_segments(), 10);
	}

	#[test]
	fn min_segments_is_clamped() {
		let config = MazeConfig {
			segment_count_max: 3,
			segment_count_variance: 10,
			..MazeConfig::default()
		};
		assert_eq!(config.min_segments(), 1);
	}
}
