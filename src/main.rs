use tickdown::WaylandSurface;

const SCREEN_WIDTH: u32 = 2160;
const SCREEN_HEIGHT: u32 = 1080;

fn main() {
    env_logger::init();

    // Requested size is a fallback; the fullscreen configure overrides it.
    let mut surface =
        match WaylandSurface::new("Countdown Timer", SCREEN_WIDTH, SCREEN_HEIGHT, true) {
            Ok(surface) => surface,
            Err(err) => {
                eprintln!("tickdown: failed to initialize rendering surface: {err}");
                std::process::exit(1);
            }
        };

    tickdown::run(&mut surface);
}
