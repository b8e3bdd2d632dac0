//! LowPoly pirate ship demo
//!
//! Loads the ship and ocean models with their materials, then renders them
//! under free-fly camera control with two directional lights.

use gl_engine::foundation::math::{Mat4, Vec3};
use gl_engine::prelude::*;
use gl_engine::ApplicationConfig;
use glfw::{Action, Key, WindowEvent};
use glow::HasContext;

/// Camera movement speed in units per second
const CAMERA_SPEED: f32 = 5.0;

/// Mouse-look sensitivity in degrees per pixel
const TURN_SPEED: f32 = 0.1;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("Fatal: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ApplicationConfig::load_or_default("config.toml")?;

    let mut window = Window::new(&config.window.title, config.window.width, config.window.height)?;
    let gl = window.create_gl_context();

    // Rendering is meaningless without a valid program, so shader compile or
    // link failure aborts startup
    let mut shader = ShaderProgram::new(gl.clone());
    shader.load_shader(ShaderStage::Vertex, &config.shaders.vertex_shader_path)?;
    shader.load_shader(ShaderStage::Fragment, &config.shaders.fragment_shader_path)?;
    shader.link()?;

    // Missing models degrade to an empty scene rather than aborting
    let mut ship_mesh = Mesh::new(gl.clone());
    if let Err(e) = ship_mesh.initialise_from_file(&config.ship.model_path) {
        log::error!("Failed to load model {}: {}", config.ship.model_path, e);
    }
    let mut ship_materials = MaterialTable::new(gl.clone());
    if let Err(e) = ship_materials.load_material(&config.ship.material_path) {
        log::error!("{e}");
    }

    let mut ocean_mesh = Mesh::new(gl.clone());
    if let Err(e) = ocean_mesh.initialise_from_file(&config.ocean.model_path) {
        log::error!("Failed to load model {}: {}", config.ocean.model_path, e);
    }
    let mut ocean_materials = MaterialTable::new(gl.clone());
    if let Err(e) = ocean_materials.load_material(&config.ocean.material_path) {
        log::error!("{e}");
    }

    let ship_transform =
        Mat4::new_scaling(5.0) * Mat4::new_translation(&Vec3::new(0.0, 0.75, 0.0));
    let ocean_transform = Mat4::new_translation(&Vec3::new(0.0, -0.5, 0.0))
        * Mat4::new_nonuniform_scaling(&Vec3::new(20.0, 15.0, 20.0));

    let mut camera = Camera::new();
    let lighting = SceneLighting::default();
    let mut timer = Timer::new();
    let mut last_cursor = window.get_cursor_pos();

    unsafe {
        gl.clear_color(0.25, 0.25, 0.25, 1.0);
    }

    while !window.should_close() {
        timer.update();
        window.poll_events();

        let events: Vec<WindowEvent> = window.flush_events().map(|(_, event)| event).collect();
        for event in events {
            match event {
                WindowEvent::Key(Key::Escape, _, Action::Press, _) => {
                    window.set_should_close(true);
                }
                WindowEvent::FramebufferSize(width, height) => unsafe {
                    gl.viewport(0, 0, width, height);
                },
                _ => {}
            }
        }

        update_camera(&window, &mut camera, timer.delta_time(), &mut last_cursor);

        unsafe {
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            gl.enable(glow::DEPTH_TEST);
            // Sails are single-sided geometry viewed from both sides
            gl.disable(glow::CULL_FACE);
        }

        let (width, height) = window.get_framebuffer_size();
        let pv = camera.projection_matrix(width as f32, height as f32) * camera.view_matrix();

        shader.bind();
        shader.bind_uniform("LightDirection", lighting.key_light.direction);
        shader.bind_uniform("LightColour", lighting.key_light.colour);
        shader.bind_uniform("AmbientColour", lighting.ambient);
        shader.bind_uniform("FillLightDirection", lighting.fill_light.direction);
        shader.bind_uniform("FillLightColour", lighting.fill_light.colour);
        shader.bind_uniform("FillLightAmbient", lighting.fill_ambient);
        shader.bind_uniform("cameraPosition", camera.position());

        shader.bind_uniform("tilingFactor", config.ship.tiling_factor);
        shader.bind_uniform("ProjectionViewModel", pv * ship_transform);
        shader.bind_uniform("ModelMatrix", ship_transform);
        ship_mesh.draw(&shader, &ship_materials);

        shader.bind_uniform("tilingFactor", config.ocean.tiling_factor);
        shader.bind_uniform("ProjectionViewModel", pv * ocean_transform);
        shader.bind_uniform("ModelMatrix", ocean_transform);
        ocean_mesh.draw(&shader, &ocean_materials);

        unsafe {
            gl.enable(glow::CULL_FACE);
        }
        window.swap_buffers();
    }

    log::info!(
        "Rendered {} frames, average {:.1} FPS",
        timer.frame_count(),
        timer.average_fps()
    );
    Ok(())
}

/// WASD/ZX movement plus right-button mouse look
fn update_camera(window: &Window, camera: &mut Camera, dt: f32, last_cursor: &mut (f64, f64)) {
    let forward = camera.forward();
    let right = camera.right();
    let up = Vec3::y();

    let mut movement = Vec3::zeros();
    if window.is_key_down(Key::W) {
        movement += forward;
    }
    if window.is_key_down(Key::S) {
        movement -= forward;
    }
    if window.is_key_down(Key::A) {
        movement -= right;
    }
    if window.is_key_down(Key::D) {
        movement += right;
    }
    if window.is_key_down(Key::Z) {
        movement += up;
    }
    if window.is_key_down(Key::X) {
        movement -= up;
    }
    camera.translate(movement * dt * CAMERA_SPEED);

    let (x, y) = window.get_cursor_pos();
    if window.is_mouse_button_down(glfw::MouseButtonRight) {
        camera.turn(
            TURN_SPEED * (x - last_cursor.0) as f32,
            -TURN_SPEED * (y - last_cursor.1) as f32,
        );
    }
    *last_cursor = (x, y);
}
