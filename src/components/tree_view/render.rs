use std::collections::HashMap;

use web_sys::CanvasRenderingContext2d;

use super::state::TreeViewState;
use crate::tree::{NodeKey, PositionedNode, Role};

const BACKGROUND: &str = "#fafafa";
const LINK_COLOR: &str = "#999";
const FILL_OPEN: &str = "#ffffff";
const FILL_COLLAPSED: &str = "#b3d9ff";
const FILL_BLOCKED: &str = "#ffb3b3";
const STROKE_DEFAULT: &str = "#666";
const STROKE_BLOCKED: &str = "#cc0000";
const STROKE_TARGET: &str = "#00cc00";

/// Control points of the curve from a parent box edge to a child box
/// edge. Upward curves leave the parent's top and enter the child's
/// bottom.
pub fn connector(source: (f64, f64), target: (f64, f64), upward: bool, half_height: f64) -> [(f64, f64); 4] {
	let (start_y, end_y) = if upward {
		(source.1 - half_height, target.1 + half_height)
	} else {
		(source.1 + half_height, target.1 - half_height)
	};
	let mid_y = (start_y + end_y) / 2.0;
	[
		(source.0, start_y),
		(source.0, mid_y),
		(target.0, mid_y),
		(target.0, end_y),
	]
}

fn node_style(node: &PositionedNode) -> (&'static str, &'static str, f64) {
	let fill = if node.blocked() {
		FILL_BLOCKED
	} else if node.collapsed {
		FILL_COLLAPSED
	} else {
		FILL_OPEN
	};
	let (stroke, width) = if node.role == Role::Target {
		(STROKE_TARGET, 3.0)
	} else if node.blocked() {
		(STROKE_BLOCKED, 1.0)
	} else {
		(STROKE_DEFAULT, 1.0)
	};
	(fill, stroke, width)
}

pub fn render(state: &TreeViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_links(state: &TreeViewState, ctx: &CanvasRenderingContext2d) {
	let positions: HashMap<&NodeKey, (f64, f64)> = state
		.sprites()
		.iter()
		.filter(|s| !s.leaving)
		.map(|s| (&s.node.key, state.sprite_position(s)))
		.collect();
	let layout = state.layout();
	let half_height = state.config.box_height / 2.0;

	ctx.set_stroke_style_str(LINK_COLOR);
	ctx.set_line_width(1.5);
	for link in &layout.links {
		let (source, target) = (&layout.nodes[link.source], &layout.nodes[link.target]);
		let (Some(&s), Some(&t)) = (positions.get(&source.key), positions.get(&target.key)) else {
			continue;
		};
		let [p0, c1, c2, p3] = connector(s, t, link.upward, half_height);
		ctx.begin_path();
		ctx.move_to(p0.0, p0.1);
		ctx.bezier_curve_to(c1.0, c1.1, c2.0, c2.1, p3.0, p3.1);
		ctx.stroke();
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_nodes(state: &TreeViewState, ctx: &CanvasRenderingContext2d) {
	let config = &state.config;
	let fade = 1.0 - state.progress();
	let height = config.box_height;

	ctx.set_font("11px Arial, sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for sprite in state.sprites() {
		let node = &sprite.node;
		let (x, y) = state.sprite_position(sprite);
		let width = config.box_width(&node.name);
		let (fill, stroke, line_width) = node_style(node);

		ctx.set_global_alpha(if sprite.leaving { fade } else { 1.0 });
		rounded_rect(ctx, x - width / 2.0, y - height / 2.0, width, height, 4.0);
		ctx.set_fill_style_str(fill);
		ctx.fill();
		ctx.set_stroke_style_str(stroke);
		ctx.set_line_width(line_width);
		ctx.stroke();

		ctx.set_fill_style_str("#222");
		let _ = ctx.fill_text(&node.name, x, y);
	}
	ctx.set_global_alpha(1.0);
}
