use leptos::prelude::*;
use log::error;

use super::config::MazeConfig;
use super::mount::{HexMaze, MountOptions};

/// Animated hex maze background.
///
/// With `fullscreen` the document body is the input host and the window
/// defines the viewport; otherwise the wrapping element does both.
#[component]
pub fn HexMazeCanvas(
	#[prop(default = false)] fullscreen: bool,
	#[prop(optional)] config: Option<MazeConfig>,
	#[prop(optional)] seed: Option<u64>,
) -> impl IntoView {
	let host_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let maze = StoredValue::new_local(None::<HexMaze>);
	let config = config.unwrap_or_default();

	Effect::new(move |_| {
		let (Some(host), Some(canvas)) = (host_ref.get(), canvas_ref.get()) else {
			return;
		};
		if maze.with_value(Option::is_some) {
			return;
		}

		let options = MountOptions {
			canvas: Some(canvas.into()),
			container: (!fullscreen).then(|| host.into()),
			config: config.clone(),
			seed,
		};
		match HexMaze::mount(options) {
			Ok(mounted) => maze.set_value(Some(mounted)),
			Err(err) => error!("failed to mount hex maze: {:?}", err),
		}
	});

	on_cleanup(move || {
		let _ = maze.try_update_value(|slot| {
			if let Some(mounted) = slot.take() {
				mounted.destroy();
			}
		});
	});

	let wrapper_style = if fullscreen {
		"position: fixed; inset: 0; pointer-events: none;"
	} else {
		"position: relative; width: 100%; height: 100%;"
	};

	view! {
		<div node_ref=host_ref class="hex-maze" style=wrapper_style>
			<canvas
				node_ref=canvas_ref
				class="hex-maze-canvas"
				style="position: absolute; inset: 0; display: block;"
			/>
		</div>
	}
}
