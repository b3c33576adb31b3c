use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, MouseEvent, Node,
	PointerEvent, Window,
};

use super::config::{LINE_COLOR_VAR, LINE_WIDTH_VAR, MazeConfig};
use super::render::{self, LineStyle};
use super::state::{FrameOutcome, HexMazeState};

/// Where and how to mount a hex maze.
#[derive(Clone, Debug, Default)]
pub struct MountOptions {
	/// Canvas to draw on. When absent one is created inside the host and
	/// removed again on [`HexMaze::destroy`].
	pub canvas: Option<HtmlCanvasElement>,
	/// Element that receives pointer events and defines the viewport.
	/// Defaults to the document body, sized by the window.
	pub container: Option<HtmlElement>,
	/// Tunables for this instance.
	pub config: MazeConfig,
	/// Fixed RNG seed for reproducible traversals.
	pub seed: Option<u64>,
}

struct Listeners {
	animate: Closure<dyn FnMut(f64)>,
	on_resize: Closure<dyn FnMut()>,
	resize_settled: Closure<dyn FnMut()>,
	on_click: Closure<dyn FnMut(MouseEvent)>,
	on_pointer_move: Closure<dyn FnMut(PointerEvent)>,
}

struct Inner {
	window: Window,
	host: HtmlElement,
	host_is_body: bool,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	created_canvas: bool,
	state: RefCell<HexMazeState>,
	frame_id: Cell<Option<i32>>,
	resize_timeout: Cell<Option<i32>>,
	listeners: RefCell<Option<Listeners>>,
	destroyed: Cell<bool>,
}

/// A running hex maze animation bound to a canvas.
///
/// Dropping the handle tears everything down, same as [`HexMaze::destroy`].
pub struct HexMaze {
	inner: Rc<Inner>,
}

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement, JsValue> {
	let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
	let style = canvas.style();
	for (name, value) in [
		("position", "absolute"),
		("inset", "0"),
		("width", "100%"),
		("height", "100%"),
	] {
		style.set_property(name, value)?;
	}
	Ok(canvas)
}

impl HexMaze {
	/// Attach to the page, build the graph for the current viewport and seed
	/// a few lines at its center.
	pub fn mount(options: MountOptions) -> Result<Self, JsValue> {
		let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
		let document = window
			.document()
			.ok_or_else(|| JsValue::from_str("no document"))?;
		let body = document.body();

		let host = match options.container {
			Some(host) => host,
			None => body
				.clone()
				.ok_or_else(|| JsValue::from_str("no document body"))?,
		};
		let host_is_body = body.as_ref().is_some_and(|body| {
			let host_node: &Node = host.as_ref();
			body.is_same_node(Some(host_node))
		});

		let (canvas, created_canvas) = match options.canvas {
			Some(canvas) => (canvas, false),
			None => (create_canvas(&document)?, true),
		};
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or_else(|| JsValue::from_str("2d context unavailable"))?
			.dyn_into()?;
		if created_canvas {
			host.append_child(&canvas)?;
		}

		let seed = options
			.seed
			.unwrap_or_else(|| (js_sys::Math::random() * u64::MAX as f64) as u64);

		let maze = Self {
			inner: Rc::new(Inner {
				window,
				host,
				host_is_body,
				canvas,
				ctx,
				created_canvas,
				state: RefCell::new(HexMazeState::new(options.config, seed)),
				frame_id: Cell::new(None),
				resize_timeout: Cell::new(None),
				listeners: RefCell::new(None),
				destroyed: Cell::new(false),
			}),
		};
		Inner::install(&maze.inner)?;

		let inner = &maze.inner;
		inner.resize_canvas();
		let (w, h) = inner.state.borrow().surface_size();
		let seed_count = inner.state.borrow().config().spawn_count_seed;
		inner.spawn(w / 2.0, h / 2.0, seed_count);

		info!(
			"hex maze mounted at {}x{} ({} nodes)",
			w,
			h,
			inner.state.borrow().graph().len()
		);
		Ok(maze)
	}

	/// Remove listeners, cancel pending callbacks, drop every line and remove
	/// the canvas if it was created at mount. Safe to call more than once.
	pub fn destroy(&self) {
		self.inner.destroy();
	}

	/// Number of lines currently held, finished ones included.
	pub fn line_count(&self) -> usize {
		self.inner.state.borrow().lines().len()
	}
}

impl Drop for HexMaze {
	fn drop(&mut self) {
		self.inner.destroy();
	}
}

impl Inner {
	fn install(this: &Rc<Self>) -> Result<(), JsValue> {
		let weak: Weak<Self> = Rc::downgrade(this);

		let animate = Closure::<dyn FnMut(f64)>::new({
			let weak = weak.clone();
			move |time: f64| {
				if let Some(inner) = weak.upgrade() {
					inner.on_frame(time);
				}
			}
		});
		let on_resize = Closure::<dyn FnMut()>::new({
			let weak = weak.clone();
			move || {
				if let Some(inner) = weak.upgrade() {
					inner.debounce_resize();
				}
			}
		});
		let resize_settled = Closure::<dyn FnMut()>::new({
			let weak = weak.clone();
			move || {
				if let Some(inner) = weak.upgrade() {
					inner.resize_timeout.set(None);
					inner.resize_canvas();
				}
			}
		});
		let on_click = Closure::<dyn FnMut(MouseEvent)>::new({
			let weak = weak.clone();
			move |ev: MouseEvent| {
				if let Some(inner) = weak.upgrade() {
					let (x, y) = inner.local_coords(&ev);
					let count = inner.state.borrow().config().spawn_count_click;
					inner.spawn(x, y, count);
				}
			}
		});
		let on_pointer_move = Closure::<dyn FnMut(PointerEvent)>::new(move |ev: PointerEvent| {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			let count = {
				let mut state = inner.state.borrow_mut();
				if !state.accept_move(js_sys::Date::now()) {
					return;
				}
				state.config().spawn_count_move
			};
			let (x, y) = inner.local_coords(&ev);
			inner.spawn(x, y, count);
		});

		let mut slot = this.listeners.borrow_mut();
		let listeners = slot.insert(Listeners {
			animate,
			on_resize,
			resize_settled,
			on_click,
			on_pointer_move,
		});
		this.window
			.add_event_listener_with_callback("resize", listeners.on_resize.as_ref().unchecked_ref())?;
		this.host
			.add_event_listener_with_callback("click", listeners.on_click.as_ref().unchecked_ref())?;
		this.host.add_event_listener_with_callback(
			"pointermove",
			listeners.on_pointer_move.as_ref().unchecked_ref(),
		)?;
		Ok(())
	}

	fn schedule_frame(&self) {
		if self.destroyed.get() || self.frame_id.get().is_some() {
			return;
		}
		let listeners = self.listeners.borrow();
		let Some(listeners) = listeners.as_ref() else {
			return;
		};
		match self
			.window
			.request_animation_frame(listeners.animate.as_ref().unchecked_ref())
		{
			Ok(id) => self.frame_id.set(Some(id)),
			Err(err) => {
				warn!("failed to schedule animation frame: {:?}", err);
				self.state.borrow_mut().animation_running = false;
			}
		}
	}

	fn on_frame(&self, time: f64) {
		self.frame_id.set(None);
		let outcome = self.state.borrow_mut().tick(time);
		self.draw();
		if outcome == FrameOutcome::Continue {
			self.schedule_frame();
		}
	}

	fn draw(&self) {
		let style = self.line_style();
		render::render(&self.state.borrow(), &self.ctx, &style);
	}

	/// Stroke settings from the host's computed CSS variables.
	fn line_style(&self) -> LineStyle {
		let computed = self.window.get_computed_style(&self.host).ok().flatten();
		let read = |name: &str| {
			computed
				.as_ref()
				.and_then(|style| style.get_property_value(name).ok())
		};
		let (color, width) = (read(LINE_COLOR_VAR), read(LINE_WIDTH_VAR));
		LineStyle::resolve(
			color.as_deref(),
			width.as_deref(),
			self.state.borrow().config(),
		)
	}

	fn spawn(&self, x: f64, y: f64, count: usize) {
		if self.destroyed.get() {
			return;
		}
		if self.state.borrow_mut().spawn(x, y, count) {
			self.schedule_frame();
		}
	}

	fn local_coords(&self, ev: &MouseEvent) -> (f64, f64) {
		let rect = self.canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	}

	fn viewport_size(&self) -> (f64, f64) {
		if self.host_is_body {
			let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
			(
				read(self.window.inner_width()),
				read(self.window.inner_height()),
			)
		} else {
			let rect = self.host.get_bounding_client_rect();
			(rect.width(), rect.height())
		}
	}

	fn debounce_resize(&self) {
		if let Some(id) = self.resize_timeout.take() {
			self.window.clear_timeout_with_handle(id);
		}
		let listeners = self.listeners.borrow();
		let Some(listeners) = listeners.as_ref() else {
			return;
		};
		let delay = self.state.borrow().config().resize_debounce_ms;
		match self
			.window
			.set_timeout_with_callback_and_timeout_and_arguments_0(
				listeners.resize_settled.as_ref().unchecked_ref(),
				delay,
			) {
			Ok(id) => self.resize_timeout.set(Some(id)),
			Err(err) => warn!("failed to debounce resize: {:?}", err),
		}
	}

	fn resize_canvas(&self) {
		if self.destroyed.get() {
			return;
		}
		let (w, h) = self.viewport_size();
		let (width, height) = (w.round().max(0.0), h.round().max(0.0));

		// Resizing the backing store wipes it.
		self.canvas.set_width(width as u32);
		self.canvas.set_height(height as u32);
		let style = self.canvas.style();
		let _ = style.set_property("width", &format!("{w}px"));
		let _ = style.set_property("height", &format!("{h}px"));

		let rebuilt = self.state.borrow_mut().resize(width, height);
		if rebuilt {
			self.schedule_frame();
		} else if self.frame_id.get().is_none() {
			self.draw();
		}
	}

	fn destroy(&self) {
		if self.destroyed.replace(true) {
			return;
		}
		if let Some(id) = self.frame_id.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		if let Some(id) = self.resize_timeout.take() {
			self.window.clear_timeout_with_handle(id);
		}
		if let Some(listeners) = self.listeners.borrow_mut().take() {
			let _ = self.window.remove_event_listener_with_callback(
				"resize",
				listeners.on_resize.as_ref().unchecked_ref(),
			);
			let _ = self.host.remove_event_listener_with_callback(
				"click",
				listeners.on_click.as_ref().unchecked_ref(),
			);
			let _ = self.host.remove_event_listener_with_callback(
				"pointermove",
				listeners.on_pointer_move.as_ref().unchecked_ref(),
			);
		}
		self.state.borrow_mut().clear();
		if self.created_canvas {
			if let Some(parent) = self.canvas.parent_node() {
				let _ = parent.remove_child(&self.canvas);
			}
		}
		debug!("hex maze destroyed");
	}
}
