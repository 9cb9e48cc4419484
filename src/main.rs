mod render;

use std::path::{Path, PathBuf};

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use render::{SCREEN_HEIGHT, SCREEN_WIDTH};
use tombs::items::targeting::{self, ExplicitTarget};
use tombs::menu::{self, Menu};
use tombs::progression::LevelUpChoice;
use tombs::scripted_input::ScriptedInput;
use tombs::session::clock_seed;
use tombs::turn::{self, Frame, Intent, Renderer, RunEnd};
use tombs::{GameConfig, Session, save};

#[derive(Parser, Debug)]
#[command(name = "tombs")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game configuration file
    #[arg(short, long, default_value = "tombs.toml")]
    config: PathBuf,

    /// Random seed (default: from the config, else the clock)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Continue the saved game
    #[arg(short, long)]
    load: bool,

    /// Play a command script without a terminal and print the message log
    #[arg(long)]
    script: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug)]
enum InventoryAction {
    Use,
    Drop,
}

enum Screen {
    MainMenu,
    MessageBox(String),
    Playing,
    Inventory(InventoryAction),
    Targeting { slot: usize },
    LevelUp,
}

struct TombsState {
    config: GameConfig,
    session: Option<Session>,
    screen: Screen,
}

impl GameState for TombsState {
    fn tick(&mut self, ctx: &mut BTerm) {
        ctx.cls();
        let screen = std::mem::replace(&mut self.screen, Screen::MainMenu);
        self.screen = match screen {
            Screen::MainMenu => self.main_menu(ctx),
            Screen::MessageBox(text) => message_box(ctx, text),
            Screen::Playing => self.playing(ctx),
            Screen::Inventory(action) => self.inventory(ctx, action),
            Screen::Targeting { slot } => self.targeting(ctx, slot),
            Screen::LevelUp => self.level_up(ctx),
        };
    }
}

impl TombsState {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            session: None,
            screen: Screen::MainMenu,
        }
    }

    fn main_menu(&mut self, ctx: &mut BTerm) -> Screen {
        render::draw_title(ctx);
        let menu = menu::main_menu();
        render::draw_menu(ctx, &menu);
        let Some(key) = ctx.key else {
            return Screen::MainMenu;
        };
        match menu.select_index(letter_to_option(key)) {
            Ok(0) => {
                self.session = Some(Session::new_game(self.config.clone()));
                Screen::Playing
            }
            Ok(1) => self.continue_game(),
            Ok(_) => {
                ctx.quit();
                Screen::MainMenu
            }
            Err(_) if key == VirtualKeyCode::Escape => {
                ctx.quit();
                Screen::MainMenu
            }
            Err(_) => Screen::MainMenu,
        }
    }

    fn continue_game(&mut self) -> Screen {
        let seed = self.config.game.seed.unwrap_or_else(clock_seed);
        match save::load_from_path(&self.config.game.save_path, self.config.clone(), seed) {
            Ok(session) => {
                self.session = Some(session);
                Screen::Playing
            }
            Err(err) => {
                warn!(error = %err, "no game to continue");
                Screen::MessageBox("No saved game to load.".to_string())
            }
        }
    }

    fn playing(&mut self, ctx: &mut BTerm) -> Screen {
        let Some(session) = self.session.as_mut() else {
            return Screen::MainMenu;
        };
        let frame = session.frame();
        let (mx, my) = ctx.mouse_pos();
        let look = session.names_at(Point::new(mx, my));
        render::draw_frame(ctx, &frame, &look);

        if session.check_level_up() {
            return Screen::LevelUp;
        }
        let Some(key) = ctx.key else {
            return Screen::Playing;
        };
        match key {
            VirtualKeyCode::Escape => {
                save_session(session, &self.config.game.save_path);
                self.session = None;
                Screen::MainMenu
            }
            VirtualKeyCode::I => Screen::Inventory(InventoryAction::Use),
            VirtualKeyCode::D => Screen::Inventory(InventoryAction::Drop),
            _ => {
                if let Some(intent) = intent_for_key(key, ctx.shift) {
                    let outcome = session.play_turn(intent, &mut ExplicitTarget::cancelled());
                    debug!(?intent, ?outcome, "turn");
                }
                Screen::Playing
            }
        }
    }

    fn inventory(&mut self, ctx: &mut BTerm, action: InventoryAction) -> Screen {
        let Some(session) = self.session.as_mut() else {
            return Screen::MainMenu;
        };
        let frame = session.frame();
        render::draw_frame(ctx, &frame, "");

        let header = match action {
            InventoryAction::Use => {
                "Press the key next to an item to use it, or any other to cancel."
            }
            InventoryAction::Drop => {
                "Press the key next to an item to drop it, or any other to cancel."
            }
        };
        let menu = match menu::inventory_menu(session, header) {
            Ok(menu) => menu,
            Err(err) => {
                error!(error = %err, "inventory menu");
                return Screen::Playing;
            }
        };
        render::draw_menu(ctx, &menu);

        let Some(key) = ctx.key else {
            return Screen::Inventory(action);
        };
        let Ok(slot) = menu::inventory_slot(session, &menu, letter_to_option(key)) else {
            return Screen::Playing;
        };
        match action {
            InventoryAction::Drop => {
                session.play_turn(Intent::DropItem(slot), &mut ExplicitTarget::cancelled());
                Screen::Playing
            }
            InventoryAction::Use => {
                let mode = session.config.game.targeting;
                let wants_pick = session
                    .inventory
                    .get(slot)
                    .and_then(|e| e.item)
                    .and_then(|item| item.kind.target_request(&session.config.items))
                    .is_some();
                if wants_pick && mode == tombs::config::TargetingMode::Explicit {
                    return Screen::Targeting { slot };
                }
                let mut targeting = targeting::for_mode(mode);
                session.play_turn(Intent::UseItem(slot), targeting.as_mut());
                Screen::Playing
            }
        }
    }

    fn targeting(&mut self, ctx: &mut BTerm, slot: usize) -> Screen {
        let Some(session) = self.session.as_mut() else {
            return Screen::MainMenu;
        };
        let frame = session.frame();
        let (mx, my) = ctx.mouse_pos();
        let cursor = Point::new(mx, my);
        render::draw_frame(ctx, &frame, "");
        render::draw_target_cursor(ctx, &frame, cursor);

        let mut pick = if ctx.left_click {
            ExplicitTarget::at(cursor)
        } else if ctx.key == Some(VirtualKeyCode::Escape) {
            ExplicitTarget::cancelled()
        } else {
            return Screen::Targeting { slot };
        };
        session.play_turn(Intent::UseItem(slot), &mut pick);
        Screen::Playing
    }

    fn level_up(&mut self, ctx: &mut BTerm) -> Screen {
        let Some(session) = self.session.as_mut() else {
            return Screen::MainMenu;
        };
        let frame = session.frame();
        render::draw_frame(ctx, &frame, "");
        let menu = match menu::level_up_menu(session) {
            Ok(menu) => menu,
            Err(err) => {
                error!(error = %err, "level-up menu");
                return Screen::Playing;
            }
        };
        render::draw_menu(ctx, &menu);

        let Some(key) = ctx.key else {
            return Screen::LevelUp;
        };
        let choice = menu
            .select_index(letter_to_option(key))
            .and_then(LevelUpChoice::from_index);
        match choice {
            Ok(choice) => {
                if let Err(err) = session.apply_level_up(choice) {
                    warn!(error = %err, "level-up not applied");
                }
                Screen::Playing
            }
            Err(_) => Screen::LevelUp,
        }
    }
}

fn message_box(ctx: &mut BTerm, text: String) -> Screen {
    render::draw_menu(ctx, &Menu::message_box(text.as_str(), 24));
    if ctx.key.is_some() {
        Screen::MainMenu
    } else {
        Screen::MessageBox(text)
    }
}

fn intent_for_key(key: VirtualKeyCode, shift: bool) -> Option<Intent> {
    use VirtualKeyCode::*;
    let step = |dx: i32, dy: i32| Some(Intent::Move { dx, dy });
    match key {
        Up | Numpad8 | K => step(0, -1),
        Down | Numpad2 | J => step(0, 1),
        Left | Numpad4 | H => step(-1, 0),
        Right | Numpad6 | L => step(1, 0),
        Numpad7 | Y => step(-1, -1),
        Numpad9 | U => step(1, -1),
        Numpad1 | B => step(-1, 1),
        Numpad3 | N => step(1, 1),
        Numpad5 | Period if !shift => Some(Intent::Wait),
        G => Some(Intent::PickUp),
        // '<'
        Comma if shift => Some(Intent::DescendStairs),
        _ => None,
    }
}

fn save_session(session: &Session, path: &Path) {
    if let Err(err) = save::save_to_path(session, path) {
        error!(error = %err, path = %path.display(), "save failed");
    }
}

/// Logs a line per rendered frame; used when no terminal is attached.
#[derive(Default)]
struct TraceRenderer {
    frames: u64,
}

impl Renderer for TraceRenderer {
    fn render(&mut self, frame: &Frame) {
        self.frames += 1;
        debug!(
            frame = self.frames,
            hp = frame.hp,
            depth = frame.dungeon_level,
            visible = frame.tiles.iter().filter(|t| t.visible).count(),
            entities = frame.entities.len(),
            "frame"
        );
    }
}

fn run_script(config: GameConfig, script: &Path, load: bool) -> BError {
    let mut input = ScriptedInput::from_file(script)?;
    let mut session = if load {
        let seed = config.game.seed.unwrap_or_else(clock_seed);
        save::load_from_path(&config.game.save_path, config.clone(), seed)?
    } else {
        Session::new_game(config.clone())
    };
    let mut renderer = TraceRenderer::default();
    let end = turn::run(&mut session, &mut input, &mut renderer);
    info!(?end, frames = renderer.frames, unread = input.remaining(), "script finished");

    for line in session.log.lines() {
        println!("{}", line.text);
    }
    if end == RunEnd::Quit {
        save::save_to_path(&session, &config.game.save_path)?;
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> BError {
    let args = Args::parse();
    init_tracing();

    let mut config = GameConfig::load_or_default(&args.config);
    if args.seed.is_some() {
        config.game.seed = args.seed;
    }
    if let Some(script) = args.script.as_deref() {
        return run_script(config, script, args.load);
    }

    let mut state = TombsState::new(config);
    if args.load {
        state.screen = state.continue_game();
    }
    let context = BTermBuilder::simple(SCREEN_WIDTH, SCREEN_HEIGHT)?
        .with_title("Tombs of the Ancient Kings")
        .build()?;
    main_loop(context, state)
}
