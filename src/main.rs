use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use lineal::{Matrix, Vector};

use lumen::app::{App, AppConfig};
use lumen::camera::Camera;
use lumen::gpu::{LayoutHandle, Program};
use lumen::materials::{MapKind, MaterialResource};
use lumen::{DrawTarget, FileSystem, Model, Topology};

/// Loads a Wavefront model and walks its draw ranges every frame.
#[derive(Debug, Parser)]
#[command(name = "lumen", version)]
struct Args {
    /// Model to load.
    #[arg(default_value = "assets/teapot.obj")]
    model: PathBuf,
    /// SPIR-V stage files (`.vert.spv`, `.frag.spv`, `.geom.spv`).
    shaders: Vec<PathBuf>,
}

/// Logs the commands a frame would record.
struct FrameLog {
    draws: usize,
    vertices: u32,
}

impl DrawTarget for FrameLog {
    fn bind_transforms(
        &mut self,
        _model: &Matrix<f32, 4, 4>,
        _view: &Matrix<f32, 4, 4>,
        projection: &Matrix<f32, 4, 4>,
    ) {
        log::trace!(target: "app", "bind transforms, focal length {}", projection[1][1]);
    }

    fn bind_layout(&mut self, layout: &LayoutHandle) {
        log::trace!(target: "app", "bind layout #{}", layout.id());
    }

    fn bind_material(&mut self, material: &MaterialResource) {
        let maps = MapKind::ALL
            .iter()
            .filter(|kind| material.map(**kind).is_some())
            .count();
        log::trace!(target: "app", "bind material with {} map(s)", maps);
    }

    fn draw(&mut self, topology: Topology, start: u32, count: u32) {
        log::trace!(target: "app", "draw {:?} {}..{}", topology, start, start + count);
        self.draws += 1;
        self.vertices += count;
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Args {
        model: model_path,
        shaders: shader_paths,
    } = Args::parse();

    let config = AppConfig::default().with_title("Lumen");
    let mut app = App::new(config.clone());

    let model: Rc<RefCell<Option<Model>>> = Rc::new(RefCell::new(None));
    let program: Rc<RefCell<Option<Program>>> = Rc::new(RefCell::new(None));
    let camera = Rc::new(RefCell::new(Camera::new(
        Vector::new([0., 0., -5.]),
        Vector::new([0., 0., 1.]),
        45.0f32.to_radians(),
        config.width as f32 / config.height as f32,
        0.1,
        500.,
    )));

    {
        let model = model.clone();
        let program = program.clone();
        app.on_setup(move |backend| {
            *model.borrow_mut() = Some(Model::load(backend, &FileSystem, &model_path)?);

            if !shader_paths.is_empty() {
                let paths: Vec<&Path> = shader_paths.iter().map(PathBuf::as_path).collect();
                *program.borrow_mut() = Some(Program::load(backend, &FileSystem, &paths)?);
            }

            return Ok(());
        });
    }

    {
        let camera = camera.clone();
        app.resize.subscribe(move |size| camera.borrow_mut().resize(size.width, size.height));
    }

    {
        let camera = camera.clone();
        let mut angle: f32 = 0.;
        app.update.subscribe(move |context| {
            angle += 0.01 * context.delta_time;

            let mut camera = camera.borrow_mut();
            camera.position = Vector::new([5. * angle.sin(), 0., -5. * angle.cos()]);
            camera.direction = Vector::new([-angle.sin(), 0., angle.cos()]);
        });
    }

    {
        let model = model.clone();
        app.render.subscribe(move |context| {
            if let Some(model) = model.borrow().as_ref() {
                let mut frame = FrameLog {
                    draws: 0,
                    vertices: 0,
                };
                model.draw(&camera.borrow(), &mut frame);

                log::trace!(
                    target: "app",
                    "frame {}: {} draw(s), {} vertices",
                    context.frame,
                    frame.draws,
                    frame.vertices
                );
            }
        });
    }

    app.on_teardown(move |backend| {
        if let Some(model) = model.borrow_mut().take() {
            model.release(backend);
        }
        if let Some(program) = program.borrow_mut().take() {
            program.release(backend);
        }
    });

    app.run().context("application failed")?;

    return Ok(());
}
