//! Constellation entry point
//!
//! Handles platform-specific initialization and runs the animation loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent, Window};

    use constellation::graph::ProximityParams;
    use constellation::renderer::{MeshStyle, RenderState, RendererError};
    use constellation::{Constellation, DeviceClass, Settings, Viewport, advance_frame};

    /// Canvas the background is drawn into
    const CANVAS_ID: &str = "dotCanvas";
    /// Optional JSON settings on the canvas element
    const SETTINGS_ATTRIBUTE: &str = "data-constellation";

    /// Everything the frame callback needs
    struct App {
        state: Constellation,
        params: ProximityParams,
        render_state: RenderState,
        canvas: HtmlCanvasElement,
    }

    impl App {
        fn frame(&mut self) {
            match advance_frame(&mut self.state, &self.params, &mut self.render_state) {
                Ok(summary) => log::trace!(
                    "frame: {} triangles, {} edges",
                    summary.triangles,
                    summary.edges
                ),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    self.render_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn resize(&mut self, window: &Window) {
            let viewport = window_viewport(window);
            let (width, height) = physical_size(window, viewport);
            self.state
                .set_viewport_extent(viewport.width, viewport.height);
            self.render_state.resize(width, height, viewport);
            // Backing store follows the surface, which may be capped below the display size
            let (width, height) = self.render_state.size;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
    }

    /// Window inner size in CSS pixels
    fn window_viewport(window: &Window) -> Viewport {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Viewport::new(width as f32, height as f32)
    }

    /// Backing-store size for a viewport on this display
    fn physical_size(window: &Window, viewport: Viewport) -> (u32, u32) {
        let dpr = window.device_pixel_ratio() as f32;
        (
            (viewport.width * dpr) as u32,
            (viewport.height * dpr) as u32,
        )
    }

    async fn create_render_state(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        viewport: Viewport,
        style: MeshStyle,
    ) -> Result<RenderState, RendererError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height, viewport, style).await
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Constellation starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a canvas"))?;

        let settings =
            Settings::from_json_or_default(canvas.get_attribute(SETTINGS_ATTRIBUTE).as_deref());

        let user_agent = window.navigator().user_agent().unwrap_or_default();
        let device_class = DeviceClass::from_user_agent(&user_agent);
        let population = settings.population_for(device_class);

        let viewport = window_viewport(&window);
        let (width, height) = physical_size(&window, viewport);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let mut state =
            Constellation::new(viewport, seed).with_velocity_spread(settings.velocity_spread);
        state.initialize(population);

        log::info!(
            "Seeded {} points for a {} device (seed {})",
            population,
            device_class.as_str(),
            seed
        );

        let render_state =
            match create_render_state(&canvas, width, height, viewport, MeshStyle::from(&settings))
                .await
            {
                Ok(render_state) => render_state,
                Err(e) => {
                    // The page stays usable, just without the background
                    log::error!("Renderer unavailable: {}", e);
                    return Ok(());
                }
            };
        let (surface_width, surface_height) = render_state.size;
        canvas.set_width(surface_width);
        canvas.set_height(surface_height);

        let app = Rc::new(RefCell::new(App {
            state,
            params: settings.proximity_params(),
            render_state,
            canvas: canvas.clone(),
        }));

        setup_input_handlers(&window, &canvas, app.clone());
        request_animation_frame(app);

        log::info!("Constellation running!");
        Ok(())
    }

    fn setup_input_handlers(window: &Window, canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut()
                    .state
                    .set_pointer_position(event.client_x() as f32, event.client_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move (first touch only, no scrolling)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    app.borrow_mut()
                        .state
                        .set_pointer_position(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let window_clone = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().resize(&window_clone);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            animation_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn animation_loop(app: Rc<RefCell<App>>) {
        app.borrow_mut().frame();
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run().await
}

/// Frames the headless demo runs
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_FRAMES: u32 = 600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use constellation::renderer::FrameStats;
    use constellation::{Constellation, DeviceClass, Settings, Viewport, advance_frame};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Constellation (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the animated web version");

    // Optional JSON settings as the first argument
    let settings = Settings::from_json_or_default(std::env::args().nth(1).as_deref());
    let params = settings.proximity_params();

    let viewport = Viewport::new(1920.0, 1080.0);
    let mut state =
        Constellation::new(viewport, 0x5eed).with_velocity_spread(settings.velocity_spread);
    state.initialize(settings.population_for(DeviceClass::Desktop));

    let mut stats = FrameStats::new();
    for frame in 0..HEADLESS_FRAMES {
        // Sweep the pointer across the middle of the screen
        let t = frame as f32 / HEADLESS_FRAMES as f32;
        state.set_pointer_position(t * viewport.width, viewport.height / 2.0);

        if let Err(e) = advance_frame(&mut state, &params, &mut stats) {
            match e {}
        }
    }

    log::info!(
        "{} frames, {} vertices: {:.1} triangles/frame (peak {}), {:.1} edges/frame",
        stats.frames,
        stats.vertices,
        stats.mean_triangles(),
        stats.peak_triangles,
        stats.mean_edges()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
