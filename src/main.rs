use std::path::Path;
use std::process;

use macroquad::prelude::*;
use cell_world::{
    CellWorld, Rule, Session, WorldConfig,
    domain,
    input::InputPoller,
    rendering::{self, MacroquadCanvas},
};

fn window_conf(config: &WorldConfig) -> Conf {
    let (width, height) = config.extent();
    Conf {
        window_title: "Cell World".to_owned(),
        window_width: width as i32,
        window_height: height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn print_usage(program: &str, config: &WorldConfig) {
    eprintln!("Usage: {} [RULE] [CONFIG.json]", program);
    eprintln!();
    eprintln!("  RULE         Built-in name, a rulestring like B36/S23,");
    eprintln!("               or a path to a .json rule file (default: conway)");
    eprintln!("  CONFIG.json  World configuration (see --example-config)");
    eprintln!();
    eprintln!("Built-in rules:");
    for (name, rule) in domain::all_rules(&config.palette) {
        eprintln!("  {:<12} {}", name, rule.description());
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("cell_world");

    match args.get(1).map(String::as_str) {
        Some("-h" | "--help") => {
            print_usage(program, &WorldConfig::default());
            return;
        }
        Some("--example-config") => {
            match serde_json::to_string_pretty(&WorldConfig::default()) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error rendering config: {}", e);
                    process::exit(1);
                }
            }
            return;
        }
        _ => {}
    }

    let config = match args.get(2) {
        Some(path) => WorldConfig::load(Path::new(path)).unwrap_or_else(|e| {
            log::error!("{}", e);
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }),
        None => WorldConfig::default(),
    };

    let rule = match args.get(1) {
        Some(source) => domain::load(source, &config.palette).unwrap_or_else(|e| {
            log::error!("{}", e);
            eprintln!("Error loading rule: {}", e);
            print_usage(program, &config);
            process::exit(1);
        }),
        None => domain::default_rule(&config.palette),
    };
    log::info!("Loaded rule {} ({})", rule.name(), rule.description());

    macroquad::Window::from_config(window_conf(&config), run(config, rule));
}

async fn run(config: WorldConfig, rule: Box<dyn Rule>) {
    prevent_quit();

    rendering::draw_loading(&config);
    next_frame().await;

    let world = match CellWorld::new(rule, &config) {
        Ok(world) => world,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error building world: {}", e);
            process::exit(1);
        }
    };

    println!("Click on any cell to activate.");
    println!("Press the spacebar to clear all cells, R to fill randomly.");
    println!("Press return to start the simulation.");

    let mut canvas = MacroquadCanvas::new(&config);
    let mut input = InputPoller::new(config.pitch() as f32 / 2.0);
    let mut session = Session::new(world, &config);
    let background = rendering::colour(config.palette.background);

    session.start(&mut canvas);

    loop {
        for event in input.poll() {
            session.handle(event, &mut canvas);
        }
        if session.is_stopped() {
            break;
        }

        session.tick(get_frame_time(), &mut canvas);

        clear_background(background);
        canvas.composite();
        rendering::draw_status(&session);

        next_frame().await;
    }
}
