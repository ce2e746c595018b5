use smithay_client_toolkit::{
    compositor::{CompositorHandler, CompositorState},
    output::{OutputHandler, OutputState},
    reexports::client::{
        Connection, EventQueue, QueueHandle,
        globals::registry_queue_init,
        protocol::{wl_output, wl_pointer, wl_seat, wl_shm, wl_surface},
    },
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
    seat::{
        SeatHandler, SeatState,
        pointer::{PointerEvent as SctkPointerEvent, PointerHandler},
    },
    shell::{
        WaylandSurface,
        xdg::{
            XdgShell,
            window::{Window as XdgWindow, WindowConfigure, WindowDecorations, WindowHandler},
        },
    },
    shm::{Shm, ShmHandler, slot::SlotPool},
};

use crate::input::{PointerButton, PointerEvent, PointerEventKind};
use crate::render::Canvas;

/// Wayland client state for the one timer window.
///
/// Keyboard, popups and layer surfaces are deliberately absent; the timer is
/// driven entirely by the pointer and the close button.
pub struct App {
    pub running: bool,
    registry_state: RegistryState,
    seat_state: SeatState,
    output_state: OutputState,
    compositor_state: CompositorState,
    xdg_shell: XdgShell,
    shm: Shm,
    pool: Option<SlotPool>,
    window: Option<TimerWindow>,
    pointer_x: f64,
    pointer_y: f64,
    pointer_events: Vec<PointerEvent>,
}

struct TimerWindow {
    xdg: XdgWindow,
    width: u32,
    height: u32,
    configured: bool,
}

impl App {
    pub fn new() -> Result<(Self, EventQueue<Self>), Box<dyn std::error::Error>> {
        let conn = Connection::connect_to_env()?;
        let (globals, event_queue) = registry_queue_init(&conn)?;
        let qh = event_queue.handle();

        let registry_state = RegistryState::new(&globals);
        let seat_state = SeatState::new(&globals, &qh);
        let output_state = OutputState::new(&globals, &qh);
        let compositor_state = CompositorState::bind(&globals, &qh)?;
        let xdg_shell = XdgShell::bind(&globals, &qh)?;
        let shm = Shm::bind(&globals, &qh)?;

        let pool = SlotPool::new(1920 * 1080 * 4, &shm)?;

        Ok((
            Self {
                running: true,
                registry_state,
                seat_state,
                output_state,
                compositor_state,
                xdg_shell,
                shm,
                pool: Some(pool),
                window: None,
                pointer_x: 0.0,
                pointer_y: 0.0,
                pointer_events: Vec::new(),
            },
            event_queue,
        ))
    }

    pub fn create_window(
        &mut self,
        qh: &QueueHandle<Self>,
        title: &str,
        width: u32,
        height: u32,
        fullscreen: bool,
    ) {
        let surface = self.compositor_state.create_surface(qh);
        let xdg = self
            .xdg_shell
            .create_window(surface, WindowDecorations::ServerDefault, qh);
        xdg.set_title(title.to_string());
        xdg.set_app_id("tickdown".to_string());
        xdg.set_min_size(Some((100, 100)));
        if fullscreen {
            // Compositor picks the output; configure reports the real size.
            xdg.set_fullscreen(None);
        }
        xdg.commit();

        self.window = Some(TimerWindow {
            xdg,
            width,
            height,
            configured: false,
        });
    }

    pub fn is_configured(&self) -> bool {
        self.window.as_ref().is_some_and(|w| w.configured)
    }

    pub fn window_size(&self) -> Option<(u32, u32)> {
        self.window.as_ref().map(|w| (w.width, w.height))
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Drain the pointer events received since the last call.
    pub fn poll_pointer_events(&mut self) -> Vec<PointerEvent> {
        std::mem::take(&mut self.pointer_events)
    }

    pub fn pointer_position(&self) -> (f64, f64) {
        (self.pointer_x, self.pointer_y)
    }

    /// Draw one frame into a fresh shm buffer and commit it.
    pub fn render_window<F>(&mut self, mut draw: F)
    where
        F: FnMut(&mut Canvas),
    {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let width = window.width;
        let height = window.height;
        let surface = window.xdg.wl_surface().clone();

        let Some(pool) = self.pool.as_mut() else {
            return;
        };

        let stride = width * 4;
        let buffer_size = (stride * height) as usize;
        if pool.len() < buffer_size {
            if let Err(err) = pool.resize(buffer_size) {
                log::warn!("failed to grow shm pool to {buffer_size} bytes: {err}");
                return;
            }
        }

        let (buffer, canvas_data) = match pool.create_buffer(
            width as i32,
            height as i32,
            stride as i32,
            wl_shm::Format::Argb8888,
        ) {
            Ok((buf, data)) => (buf, data),
            Err(err) => {
                log::warn!("failed to create shm buffer: {err}");
                return;
            }
        };

        {
            let mut canvas = Canvas::new(canvas_data, width, height);
            draw(&mut canvas);
            canvas.finalize_for_wayland();
        }

        surface.attach(Some(buffer.wl_buffer()), 0, 0);
        surface.damage_buffer(0, 0, width as i32, height as i32);
        surface.commit();
    }
}

impl CompositorHandler for App {
    fn scale_factor_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_factor: i32,
    ) {
    }

    fn transform_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_transform: wl_output::Transform,
    ) {
    }

    fn frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _time: u32,
    ) {
    }

    fn surface_enter(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }

    fn surface_leave(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }
}

impl OutputHandler for App {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    fn new_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }

    fn update_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }

    fn output_destroyed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }
}

impl WindowHandler for App {
    fn request_close(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _window: &XdgWindow) {
        self.quit();
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        window: &XdgWindow,
        configure: WindowConfigure,
        _serial: u32,
    ) {
        if let Some(w) = self.window.as_mut()
            && w.xdg.wl_surface() == window.wl_surface()
        {
            let (width, height) = configure.new_size;
            if let (Some(width), Some(height)) = (width, height) {
                w.width = width.get();
                w.height = height.get();
            }
            w.configured = true;
        }
    }
}

impl SeatHandler for App {
    fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    fn new_seat(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _seat: wl_seat::WlSeat) {}

    fn new_capability(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        seat: wl_seat::WlSeat,
        capability: smithay_client_toolkit::seat::Capability,
    ) {
        use smithay_client_toolkit::seat::Capability;

        if capability == Capability::Pointer && self.seat_state.get_pointer(qh, &seat).is_err() {
            log::warn!("failed to get pointer from seat");
        }
    }

    fn remove_capability(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _seat: wl_seat::WlSeat,
        _capability: smithay_client_toolkit::seat::Capability,
    ) {
    }

    fn remove_seat(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _seat: wl_seat::WlSeat) {
    }
}

impl PointerHandler for App {
    fn pointer_frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _pointer: &wl_pointer::WlPointer,
        events: &[SctkPointerEvent],
    ) {
        use smithay_client_toolkit::seat::pointer::PointerEventKind as SctkPointerEventKind;

        for event in events {
            let (x, y) = event.position;

            match &event.kind {
                SctkPointerEventKind::Enter { .. } => {
                    self.pointer_x = x;
                    self.pointer_y = y;
                    self.pointer_events.push(PointerEvent {
                        kind: PointerEventKind::Enter,
                        x,
                        y,
                    });
                }
                SctkPointerEventKind::Leave { .. } => {
                    self.pointer_events.push(PointerEvent {
                        kind: PointerEventKind::Leave,
                        x: self.pointer_x,
                        y: self.pointer_y,
                    });
                }
                SctkPointerEventKind::Motion { .. } => {
                    self.pointer_x = x;
                    self.pointer_y = y;
                    self.pointer_events.push(PointerEvent {
                        kind: PointerEventKind::Motion,
                        x,
                        y,
                    });
                }
                SctkPointerEventKind::Press { button, .. } => {
                    self.pointer_events.push(PointerEvent {
                        kind: PointerEventKind::Press(PointerButton::from_code(*button)),
                        x: self.pointer_x,
                        y: self.pointer_y,
                    });
                }
                SctkPointerEventKind::Release { button, .. } => {
                    self.pointer_events.push(PointerEvent {
                        kind: PointerEventKind::Release(PointerButton::from_code(*button)),
                        x: self.pointer_x,
                        y: self.pointer_y,
                    });
                }
                SctkPointerEventKind::Axis { .. } => {}
            }
        }
    }
}

impl ShmHandler for App {
    fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm
    }
}

impl ProvidesRegistryState for App {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }

    registry_handlers![OutputState, SeatState];
}

smithay_client_toolkit::delegate_compositor!(App);
smithay_client_toolkit::delegate_output!(App);
smithay_client_toolkit::delegate_shm!(App);
smithay_client_toolkit::delegate_seat!(App);
smithay_client_toolkit::delegate_pointer!(App);
smithay_client_toolkit::delegate_xdg_shell!(App);
smithay_client_toolkit::delegate_xdg_window!(App);
smithay_client_toolkit::delegate_registry!(App);
