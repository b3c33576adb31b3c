use web_sys::CanvasRenderingContext2d;

use super::agent::MazeLine;
use super::config::MazeConfig;
use super::state::HexMazeState;

/// The slice of an immediate-mode 2D context the maze draws with.
pub trait LineSurface {
	fn clear_rect(&self, x: f64, y: f64, w: f64, h: f64);
	fn begin_path(&self);
	fn move_to(&self, x: f64, y: f64);
	fn line_to(&self, x: f64, y: f64);
	fn set_line_width(&self, width: f64);
	fn set_stroke_style_str(&self, style: &str);
	fn stroke(&self);
}

impl LineSurface for CanvasRenderingContext2d {
	fn clear_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		CanvasRenderingContext2d::clear_rect(self, x, y, w, h);
	}

	fn begin_path(&self) {
		CanvasRenderingContext2d::begin_path(self);
	}

	fn move_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::move_to(self, x, y);
	}

	fn line_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::line_to(self, x, y);
	}

	fn set_line_width(&self, width: f64) {
		CanvasRenderingContext2d::set_line_width(self, width);
	}

	fn set_stroke_style_str(&self, style: &str) {
		CanvasRenderingContext2d::set_stroke_style_str(self, style);
	}

	fn stroke(&self) {
		CanvasRenderingContext2d::stroke(self);
	}
}

/// Stroke settings resolved for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
	pub color: String,
	pub width: f64,
}

impl LineStyle {
	/// Resolve raw CSS variable values, falling back to the configured
	/// defaults for anything missing, blank, or unparsable.
	pub fn resolve(color: Option<&str>, width: Option<&str>, config: &MazeConfig) -> Self {
		let color = color
			.map(str::trim)
			.filter(|c| !c.is_empty())
			.unwrap_or(config.line_color.as_str())
			.to_string();
		let width = width
			.and_then(|w| w.trim().trim_end_matches("px").trim().parse::<f64>().ok())
			.filter(|w| w.is_finite() && *w > 0.0)
			.unwrap_or(config.line_width);
		Self { color, width }
	}
}

/// Clear the surface and stroke every line, in spawn order.
pub fn render<S: LineSurface + ?Sized>(state: &HexMazeState, surface: &S, style: &LineStyle) {
	let (w, h) = state.surface_size();
	surface.clear_rect(0.0, 0.0, w, h);
	for line in state.lines() {
		draw_line(state, line, surface, style);
	}
}

fn draw_line<S: LineSurface + ?Sized>(
	state: &HexMazeState,
	line: &MazeLine,
	surface: &S,
	style: &LineStyle,
) {
	let points = line.polyline(state.graph());
	let Some((&(x0, y0), rest)) = points.split_first() else {
		return;
	};

	surface.begin_path();
	surface.set_line_width(style.width);
	surface.set_stroke_style_str(&style.color);
	surface.move_to(x0, y0);
	for &(x, y) in rest {
		surface.line_to(x, y);
	}
	surface.stroke();
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::*;

	#[derive(Clone, Debug, PartialEq)]
	enum Op {
		Clear(f64, f64),
		Begin,
		MoveTo,
		LineTo,
		Width(f64),
		Style(String),
		Stroke,
	}

	#[derive(Default)]
	struct Recorder {
		ops: RefCell<Vec<Op>>,
	}

	impl LineSurface for Recorder {
		fn clear_rect(&self, _x: f64, _y: f64, w: f64, h: f64) {
			self.ops.borrow_mut().push(Op::Clear(w, h));
		}
		fn begin_path(&self) {
			self.ops.borrow_mut().push(Op::Begin);
		}
		fn move_to(&self, _x: f64, _y: f64) {
			self.ops.borrow_mut().push(Op::MoveTo);
		}
		fn line_to(&self, _x: f64, _y: f64) {
			self.ops.borrow_mut().push(Op::LineTo);
		}
		fn set_line_width(&self, width: f64) {
			self.ops.borrow_mut().push(Op::Width(width));
		}
		fn set_stroke_style_str(&self, style: &str) {
			self.ops.borrow_mut().push(Op::Style(style.to_string()));
		}
		fn stroke(&self) {
			self.ops.borrow_mut().push(Op::Stroke);
		}
	}

	#[test]
	fn style_falls_back_to_defaults() {
		let config = MazeConfig::default();
		let style = LineStyle::resolve(None, None, &config);
		assert_eq!(style.color, "#00A69C");
		assert_eq!(style.width, 2.0);

		let style = LineStyle::resolve(Some("   "), Some("wide"), &config);
		assert_eq!(style.color, "#00A69C");
		assert_eq!(style.width, 2.0);

		let style = LineStyle::resolve(Some(""), Some("0"), &config);
		assert_eq!(style, LineStyle::resolve(None, None, &config));
	}

	#[test]
	fn style_reads_tokens() {
		let config = MazeConfig::default();
		let style = LineStyle::resolve(Some(" rgb(1, 2, 3) "), Some(" 3.5px"), &config);
		assert_eq!(style.color, "rgb(1, 2, 3)");
		assert_eq!(style.width, 3.5);
	}

	#[test]
	fn render_clears_then_strokes_each_line() {
		let mut state = HexMazeState::new(MazeConfig::default(), 99);
		state.resize(400.0, 300.0);
		state.spawn(200.0, 150.0, 2);
		state.tick(0.0);
		state.tick(500.0);

		let recorder = Recorder::default();
		let style = LineStyle::resolve(Some("red"), Some("4"), state.config());
		render(&state, &recorder, &style);

		let ops = recorder.ops.borrow();
		assert_eq!(ops[0], Op::Clear(400.0, 300.0));
		assert_eq!(ops.iter().filter(|op| **op == Op::Stroke).count(), 2);
		assert_eq!(ops.iter().filter(|op| **op == Op::MoveTo).count(), 2);
		assert!(ops.contains(&Op::Width(4.0)));
		assert!(ops.contains(&Op::Style("red".into())));
		assert!(ops.iter().filter(|op| **op == Op::LineTo).count() >= 2);
	}

	#[test]
	fn render_empty_state_only_clears() {
		let state = HexMazeState::new(MazeConfig::default(), 1);
		let recorder = Recorder::default();
		let style = LineStyle::resolve(None, None, state.config());
		render(&state, &recorder, &style);
		assert_eq!(*recorder.ops.borrow(), vec![Op::Clear(0.0, 0.0)]);
	}
}
