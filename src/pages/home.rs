use leptos::prelude::*;

use crate::components::hex_maze::{HexMazeCanvas, MazeConfig};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = MazeConfig::default();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-maze">
				<HexMazeCanvas fullscreen=true config=config />
				<div class="maze-overlay">
					<h1>"Hex Maze"</h1>
					<p class="subtitle">"Click to release a burst of lines. Move the pointer to leave a trail."</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
