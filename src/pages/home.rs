use std::cell::RefCell;
use std::rc::Rc;

use leptos::either::Either;
use leptos::prelude::*;
use log::{error, warn};
use web_sys::KeyboardEvent;

use crate::components::tree_view::{SharedTreeView, TreeCanvas, TreeViewState};
use crate::config::ViewerConfig;
use crate::data::load_elements;
use crate::tree::Session;

/// Search box, navigation and bulk controls over one tree canvas.
#[component]
fn Explorer(session: Session, config: ViewerConfig) -> impl IntoView {
	let view_state: SharedTreeView = Rc::new(RefCell::new(TreeViewState::new(session, config, 0.0, 0.0)));
	let (status, set_status) = signal(String::new());
	let query = RwSignal::new(String::new());

	let vs = view_state.clone();
	let sync = move || set_status.set(vs.borrow().session.status().to_owned());

	let (vs, sync_search) = (view_state.clone(), sync.clone());
	let run_search = move || {
		if let Err(e) = vs.borrow_mut().search(&query.get_untracked()) {
			warn!("{e}");
		}
		sync_search();
	};
	let run_search_key = run_search.clone();

	let (vs, sync_next) = (view_state.clone(), sync.clone());
	let on_next = move |_| {
		vs.borrow_mut().next_match();
		sync_next();
	};
	let (vs, sync_prev) = (view_state.clone(), sync.clone());
	let on_prev = move |_| {
		vs.borrow_mut().previous_match();
		sync_prev();
	};
	let vs = view_state.clone();
	let on_expand = move |_| vs.borrow_mut().expand_all();
	let vs = view_state.clone();
	let on_collapse = move |_| vs.borrow_mut().collapse_all();
	let (vs, sync_reset) = (view_state.clone(), sync);
	let on_reset = move |_| {
		if let Err(e) = vs.borrow_mut().reset() {
			error!("reset failed: {e}");
		}
		query.set(String::new());
		sync_reset();
	};

	view! {
		<div class="fullscreen-tree">
			<TreeCanvas state=view_state fullscreen=true />
			<div class="tree-toolbar">
				<input
					type="text"
					placeholder="Search elements"
					prop:value=move || query.get()
					on:input=move |ev| query.set(event_target_value(&ev))
					on:keydown=move |ev: KeyboardEvent| {
						if ev.key() == "Enter" {
							run_search_key();
						}
					}
				/>
				<button on:click=move |_| run_search()>"Search"</button>
				<button on:click=on_prev>"Previous"</button>
				<button on:click=on_next>"Next"</button>
				<button on:click=on_expand>"Expand all"</button>
				<button on:click=on_collapse>"Collapse all"</button>
				<button on:click=on_reset>"Reset"</button>
				<span class="result-count">{move || status.get()}</span>
			</div>
		</div>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = ViewerConfig::default();
	let url = config.data_url.clone();
	let elements = LocalResource::new(move || load_elements(url.clone()));

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
			{move || match elements.get() {
				None => Either::Left(view! { <p class="loading">"Loading elements..."</p> }),
				Some(loaded) => {
					let config = config.clone();
					Either::Right(
						loaded
							.and_then(|list| Session::new(list, config.session_options()))
							.map(|session| view! { <Explorer session=session config=config /> }),
					)
				}
			}}
		</ErrorBoundary>
	}
}
