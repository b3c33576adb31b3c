use leptos::prelude::*;

use crate::components::hex_maze::HexMazeCanvas;

/// 404 page, drawn over the same maze background as the home page.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="fullscreen-maze">
			<HexMazeCanvas fullscreen=true />
			<div class="maze-overlay">
				<h1>"Nothing here"</h1>
				<p class="subtitle">"Click anywhere to grow a few lines while you find your way back."</p>
				<a href="/">"Home"</a>
			</div>
		</div>
	}
}
