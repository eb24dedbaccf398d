//! Headless raycasting integration tests.
//!
//! These tests need a GPU adapter (real or software fallback). When none is
//! available they print a message and return early.

use volray_core::{NormalizedVolume, RenderMode, RenderState, UVec3, Vec3};
use volray_render::*;

const WIDTH: u32 = 96;
const HEIGHT: u32 = 64;

fn pixel(pixels: &[u8], x: u32, y: u32) -> [u8; 4] {
    let i = ((y * WIDTH + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

fn filled_volume(value: u8) -> NormalizedVolume {
    NormalizedVolume::new(
        UVec3::new(8, 8, 8),
        Vec3::ONE,
        Vec3::ZERO,
        (0.0, 255.0),
        vec![value; 512],
    )
    .unwrap()
}

fn render_frame(
    engine: &RenderEngine,
    renderer: &RaycastRenderer,
    state: &RenderState,
) -> RenderResult<Vec<u8>> {
    let mut encoder = engine.create_encoder("test frame");
    renderer.render(&engine.queue, &mut encoder, engine.target_view(), state)?;
    engine.submit(encoder);
    Ok(engine.capture().expect("frame readback should succeed"))
}

/// All GPU checks share one device.
#[test]
fn headless_raycast_tests() {
    let engine = match pollster::block_on(RenderEngine::new_headless(WIDTH, HEIGHT)) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Skipping headless tests: no GPU adapter available ({e})");
            return;
        }
    };

    // --- Every program compiles ---
    let mut renderer = RaycastRenderer::new(
        &engine.device,
        &engine.queue,
        engine.format(),
        WIDTH,
        HEIGHT,
    )
    .expect("raycast pipelines should build");
    assert_eq!(renderer.state(), RendererState::Uninitialized);
    assert_eq!(renderer.noise_size(), Some((WIDTH, HEIGHT)));

    // --- Drawing without a volume is rejected ---
    let mut state = RenderState::default();
    assert!(matches!(
        render_frame(&engine, &renderer, &state),
        Err(RenderError::NotReady)
    ));

    // --- Empty volumes are rejected and leave the renderer uninitialized ---
    let empty =
        NormalizedVolume::new(UVec3::new(0, 4, 4), Vec3::ONE, Vec3::ZERO, (0.0, 0.0), vec![])
            .unwrap();
    assert!(matches!(
        renderer.set_volume(&engine.device, &engine.queue, &empty),
        Err(RenderError::EmptyVolume)
    ));
    assert_eq!(renderer.state(), RendererState::Uninitialized);

    // --- A bright volume is visible in every mode ---
    renderer
        .set_volume(&engine.device, &engine.queue, &filled_volume(255))
        .unwrap();
    assert_eq!(renderer.state(), RendererState::Ready);
    assert_eq!(renderer.size(), UVec3::new(8, 8, 8));

    state.set_threshold(128.0, renderer.range());
    for mode in RenderMode::ALL {
        state.mode = mode;
        let pixels = render_frame(&engine, &renderer, &state).unwrap();
        assert_eq!(pixels.len(), (WIDTH * HEIGHT * 4) as usize);
        assert_eq!(pixel(&pixels, 0, 0), [0, 0, 0, 255], "{mode}: corner shows background");
        let centre = pixel(&pixels, WIDTH / 2, HEIGHT / 2);
        assert!(centre[0] > 40, "{mode}: centre should hit the volume, got {centre:?}");
    }

    // --- Background colour is used for the clear ---
    state.mode = RenderMode::MaximumIntensityProjection;
    state.set_background(Vec3::new(0.0, 1.0, 0.0));
    let pixels = render_frame(&engine, &renderer, &state).unwrap();
    assert_eq!(pixel(&pixels, 0, 0), [0, 255, 0, 255]);

    // --- An empty field is invisible to the isosurface ---
    state.set_background(Vec3::ZERO);
    state.mode = RenderMode::Isosurface;
    renderer
        .set_volume(&engine.device, &engine.queue, &filled_volume(0))
        .unwrap();
    let pixels = render_frame(&engine, &renderer, &state).unwrap();
    let centre = pixel(&pixels, WIDTH / 2, HEIGHT / 2);
    assert!(centre[..3].iter().all(|&c| c <= 1), "got {centre:?}");

    // --- A failed load keeps the current volume ---
    let bad = std::env::temp_dir().join(format!("volray-{}-bad.vtk", std::process::id()));
    std::fs::write(&bad, b"not a volume\n".repeat(12)).unwrap();
    let result = renderer.load_volume(&engine.device, &engine.queue, &bad);
    std::fs::remove_file(&bad).ok();
    assert!(matches!(result, Err(RenderError::Format(_))));
    assert_eq!(renderer.state(), RendererState::Ready);
    assert_eq!(renderer.size(), UVec3::new(8, 8, 8));
    assert_eq!(renderer.range(), (0.0, 255.0));

    // --- Resizing regenerates the noise at the new size ---
    renderer.resize(&engine.device, &engine.queue, 40, 30);
    assert_eq!(renderer.noise_size(), Some((40, 30)));
    assert_eq!(renderer.state(), RendererState::Ready);
}
