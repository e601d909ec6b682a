use anyhow::{Context, Result};

use vexray::engine::Engine;
use vexray::window::{FpsCounter, FrameLimiter, Key, Window, WindowEvent, WINDOW_HEIGHT, WINDOW_WIDTH};

const SCREENSHOT_PATH: &str = "vexray_colorbuffer.bmp";

fn resource_dir() -> String {
    std::env::var("VEXRAY_RESOURCES").unwrap_or_else(|_| "resources".to_string())
}

fn main() -> Result<()> {
    env_logger::init();

    let resources = resource_dir();
    let mut window = Window::new("vexray", WINDOW_WIDTH, WINDOW_HEIGHT)
        .map_err(anyhow::Error::msg)
        .context("failed to create window")?;

    let mut engine = Engine::new(
        WINDOW_WIDTH,
        WINDOW_HEIGHT,
        format!("{resources}/vehicle.obj"),
        format!("{resources}/vehicle_diffuse.png"),
        format!("{resources}/vehicle_normal.png"),
        format!("{resources}/vehicle_gloss.png"),
        format!("{resources}/vehicle_specular.png"),
    )
    .context("failed to load scene resources")?;

    let mut frame_limiter = FrameLimiter::new(&window);
    let mut fps_counter = FpsCounter::new();
    let mut console_clear_enabled = true;
    let mut fps_print_enabled = true;

    'running: loop {
        for event in window.poll_events() {
            match event {
                WindowEvent::Quit => break 'running,
                WindowEvent::Resize(w, h) => {
                    window
                        .resize(w, h)
                        .map_err(anyhow::Error::msg)
                        .context("failed to resize window")?;
                    engine.resize(w, h);
                }
                WindowEvent::KeyPress(Key::Screenshot) => {
                    if let Err(err) = engine.save_screenshot(SCREENSHOT_PATH) {
                        log::error!("failed to save screenshot: {err}");
                    } else {
                        log::info!("saved screenshot to {SCREENSHOT_PATH}");
                    }
                }
                WindowEvent::KeyPress(Key::ToggleConsoleClear) => {
                    console_clear_enabled = !console_clear_enabled;
                }
                WindowEvent::KeyPress(Key::ToggleFpsPrint) => {
                    fps_print_enabled = !fps_print_enabled;
                }
                WindowEvent::KeyPress(Key::ToggleDepthView) => engine.toggle_depth_view(),
                WindowEvent::KeyPress(Key::ToggleRotation) => engine.toggle_rotation(),
                WindowEvent::KeyPress(Key::ToggleNormalMap) => engine.toggle_normal_mapping(),
                WindowEvent::KeyPress(Key::CycleShadingMode) => {
                    engine.cycle_shading_mode();
                    log::info!("shading mode: {}", engine.shading_mode());
                }
            }
        }

        let delta_ms = frame_limiter.wait_and_get_delta(&window);
        let dt = (delta_ms as f32 / 1000.0).max(1.0 / 1000.0);

        let input = window.input_snapshot(dt);
        engine.update(dt, &input);
        engine.render();

        window
            .present(engine.frame_buffer())
            .map_err(anyhow::Error::msg)
            .context("failed to present frame")?;

        if let Some(fps) = fps_counter.tick() {
            if console_clear_enabled {
                print!("\x1B[2J\x1B[1;1H");
            }
            if fps_print_enabled {
                println!("fps: {fps:.1}");
            }
        }
    }

    Ok(())
}
