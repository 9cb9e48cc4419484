use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;

use tombs::ecs::resources::GameState;
use tombs::menu::Menu;
use tombs::turn::{Frame, TileView};

pub const SCREEN_WIDTH: i32 = 80;
pub const SCREEN_HEIGHT: i32 = 25;
const PANEL_HEIGHT: i32 = 7;
const BAR_WIDTH: i32 = 20;
const MSG_X: i32 = BAR_WIDTH + 2;

const DARK_WALL: (u8, u8, u8) = (0, 0, 100);
const LIGHT_WALL: (u8, u8, u8) = (130, 110, 50);
const DARK_GROUND: (u8, u8, u8) = (50, 50, 150);
const LIGHT_GROUND: (u8, u8, u8) = (200, 180, 50);
const BAR_FULL: (u8, u8, u8) = (255, 115, 115);
const BAR_EMPTY: (u8, u8, u8) = (127, 0, 0);

fn panel_y(frame: &Frame) -> i32 {
    frame.height.min(SCREEN_HEIGHT - PANEL_HEIGHT)
}

/// Unexplored cells stay black; remembered ones are dimmed.
fn tile_background(tile: &TileView) -> RGB {
    match (tile.visible, tile.block_sight) {
        (true, true) => RGB::named(LIGHT_WALL),
        (true, false) => RGB::named(LIGHT_GROUND),
        (false, _) if !tile.explored => RGB::named(BLACK),
        (false, true) => RGB::named(DARK_WALL),
        (false, false) => RGB::named(DARK_GROUND),
    }
}

pub fn draw_frame(ctx: &mut BTerm, frame: &Frame, look: &str) {
    draw_map(ctx, frame);
    draw_entities(ctx, frame);
    draw_panel(ctx, frame, look);
}

pub fn draw_map(ctx: &mut BTerm, frame: &Frame) {
    let max_y = panel_y(frame);
    for y in 0..frame.height.min(max_y) {
        for x in 0..frame.width.min(SCREEN_WIDTH) {
            if let Some(tile) = frame.tile(x, y) {
                ctx.set_bg(x, y, tile_background(tile));
            }
        }
    }
}

fn draw_entities(ctx: &mut BTerm, frame: &Frame) {
    for entity in &frame.entities {
        let bg = frame
            .tile(entity.x, entity.y)
            .map_or(RGB::named(BLACK), tile_background);
        ctx.set(entity.x, entity.y, entity.color, bg, to_cp437(entity.glyph));
    }
}

fn draw_panel(ctx: &mut BTerm, frame: &Frame, look: &str) {
    let top = panel_y(frame);
    ctx.print_color(1, top, RGB::named(LIGHT_GRAY), RGB::named(BLACK), look);

    for (row, line) in frame.log.iter().enumerate() {
        ctx.print_color(MSG_X, top + 1 + row as i32, line.color, RGB::named(BLACK), &line.text);
    }

    ctx.draw_bar_horizontal(
        1,
        top + 1,
        BAR_WIDTH,
        frame.hp.max(0),
        frame.max_hp.max(1),
        RGB::named(BAR_FULL),
        RGB::named(BAR_EMPTY),
    );
    let label = format!("HP: {}/{}", frame.hp, frame.max_hp);
    let label_x = 1 + (BAR_WIDTH - label.len() as i32) / 2;
    ctx.print_color(label_x, top + 1, RGB::named(WHITE), RGB::named(BAR_EMPTY), &label);

    ctx.print(1, top + 3, format!("Dungeon level {}", frame.dungeon_level));
    ctx.print(
        1,
        top + 4,
        format!("Level {}  XP {}/{}", frame.player_level, frame.xp, frame.xp_to_next),
    );
    if frame.state == GameState::Dead {
        ctx.print_color(1, top + 5, RGB::named(RED), RGB::named(BLACK), "You are dead. Esc");
    }
}

/// Marks the cell under the mouse while an effect waits for a target.
pub fn draw_target_cursor(ctx: &mut BTerm, frame: &Frame, cursor: Point) {
    let valid = frame.tile(cursor.x, cursor.y).is_some_and(|t| t.visible);
    let color = if valid { RGB::named(CYAN) } else { RGB::named(DARK_GRAY) };
    ctx.set_bg(cursor.x, cursor.y, color);
    ctx.print_color(
        1,
        panel_y(frame),
        RGB::named(LIGHT_CYAN),
        RGB::named(BLACK),
        "Left-click a target tile, or Esc to cancel.",
    );
}

/// Draws a menu window centred on the screen, header first.
pub fn draw_menu(ctx: &mut BTerm, menu: &Menu) {
    let header: Vec<&str> = if menu.header.is_empty() {
        Vec::new()
    } else {
        menu.header.lines().collect()
    };
    let options = menu.lines();
    let height = (header.len() + options.len()) as i32;
    let x = SCREEN_WIDTH / 2 - menu.width / 2;
    let y = SCREEN_HEIGHT / 2 - height / 2;

    ctx.draw_box(x - 1, y - 1, menu.width + 1, height + 1, RGB::named(WHITE), RGB::named(BLACK));
    let rows = header.iter().copied().chain(options.iter().map(String::as_str));
    for (row, text) in rows.enumerate() {
        let clipped: String = text.chars().take(menu.width as usize).collect();
        ctx.print_color(x, y + row as i32, RGB::named(WHITE), RGB::named(BLACK), clipped);
    }
}

pub fn draw_title(ctx: &mut BTerm) {
    ctx.print_color_centered(
        SCREEN_HEIGHT / 2 - 6,
        RGB::named(YELLOW),
        RGB::named(BLACK),
        "TOMBS OF THE ANCIENT KINGS",
    );
}
