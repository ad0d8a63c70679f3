use anyhow::Error;
use macroquad::{
    color,
    input::KeyCode,
    math::Rect,
    miniquad::window::screen_size,
    text::load_ttf_font,
    time::get_frame_time,
    window::{clear_background, next_frame, Conf},
};
use multigame::{
    config::{Config, DEFAULT_PATH, PATH_VAR},
    games,
    input::Input,
    launcher::Launcher,
    logging::{init_logging, LoggingConfig},
};
use std::{env, path::PathBuf, time::Duration};

fn config_path() -> PathBuf {
    env::var_os(PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PATH))
}

fn window_conf() -> Conf {
    // Errors are reported again from `main`.
    let window = Config::load(&config_path())
        .map(|c| c.window)
        .unwrap_or_default();
    Conf {
        window_title: "Multigame".to_owned(),
        window_width: window.width as i32,
        window_height: window.height as i32,
        fullscreen: window.fullscreen,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() -> Result<(), Error> {
    let path = config_path();
    let config = Config::load(&path)?;
    init_logging(LoggingConfig {
        filter: config.log.clone(),
    });
    if path.exists() {
        log::info!("Loaded config from {}", path.display());
    } else {
        log::info!("No config at {}, using defaults", path.display());
    }

    let font = match &config.font {
        Some(path) => Some(load_ttf_font(path).await?),
        None => None,
    };

    let mut launcher = Launcher::new();
    for builder in games::all(&config) {
        launcher.register(builder);
    }
    if let Some(name) = env::args().nth(1) {
        launcher.launch_by_name(&name)?;
    }

    loop {
        let input = Input::poll();
        if launcher.is_menu_visible() && input.key(KeyCode::Escape) {
            break;
        }
        let (w, h) = screen_size();
        let viewport = Rect::new(0.0, 0.0, w, h);
        launcher.update(
            &input,
            viewport,
            Duration::from_secs_f32(get_frame_time()),
        );

        clear_background(color::BLACK);
        launcher.draw(viewport, font.as_ref());

        next_frame().await
    }

    Ok(())
}
