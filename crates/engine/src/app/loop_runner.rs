use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::audio::LogAudioSink;
use super::cartridge::{Cartridge, TickCommand};
use super::frame::FrameComposition;
use super::input::{ButtonStates, InputSnapshot, PadButton};
use super::metrics::MetricsAccumulator;
use super::rendering::Renderer;
use super::{LOGICAL_HEIGHT, LOGICAL_WIDTH};

pub const ATLAS_ENV_VAR: &str = "KNIGHTFALL_ATLAS";

const DEFAULT_WINDOW_SCALE: u32 = 3;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub atlas_path: Option<PathBuf>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Knightfall".to_string(),
            window_width: LOGICAL_WIDTH * DEFAULT_WINDOW_SCALE,
            window_height: LOGICAL_HEIGHT * DEFAULT_WINDOW_SCALE,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            atlas_path: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, mut cartridge: Box<dyn Cartridge>) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let atlas_path = resolve_atlas_path(config.atlas_path.clone());
    let mut renderer =
        Renderer::new(Arc::clone(&window), atlas_path.as_deref()).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);

    let mut input_collector = InputCollector::default();
    let mut audio_sink = LogAudioSink::default();
    let mut frame_plan = FrameComposition::default();

    cartridge.reset();
    let atlas_display = atlas_path
        .as_deref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "builtin".to_string());
    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        atlas = %atlas_display,
        "loop_config"
    );

    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);

    let window_for_loop = Arc::clone(&window);
    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window_for_loop.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        input_collector.mark_quit_requested();
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = window_for_loop.inner_size();
                        if let Err(error) = renderer.resize(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        input_collector.handle_keyboard_input(&event);
                        if input_collector.quit_requested {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                        last_frame_instant = now;

                        let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                        accumulator = accumulator.saturating_add(clamped_frame_dt);

                        let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                        for _ in 0..step_plan.ticks_to_run {
                            let input_snapshot = input_collector.snapshot_for_tick();
                            let command = cartridge.update(&input_snapshot);
                            cartridge.drain_audio(&mut audio_sink);
                            metrics_accumulator.record_tick();
                            if command == TickCommand::Quit {
                                info!(reason = "cartridge", "shutdown_requested");
                                window_target.exit();
                                break;
                            }
                        }
                        accumulator = step_plan.remaining_accumulator;

                        if step_plan.dropped_backlog > Duration::ZERO {
                            warn!(
                                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                                max_ticks_per_frame, "sim_clamp_triggered"
                            );
                        }

                        cartridge.compose(&mut frame_plan);
                        if frame_plan.dropped_sprites() > 0 {
                            debug!(
                                dropped = frame_plan.dropped_sprites(),
                                "sprite_slots_exhausted"
                            );
                        }
                        if let Err(error) = renderer.present(&frame_plan) {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                        metrics_accumulator.record_frame(raw_frame_dt);

                        if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
                            info!(
                                fps = snapshot.fps,
                                tps = snapshot.tps,
                                frame_time_ms = snapshot.frame_time_ms,
                                "loop_metrics"
                            );
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window_for_loop.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    held: ButtonStates,
    pressed_edge: ButtonStates,
}

impl InputCollector {
    fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) {
        if matches!(key_event.physical_key, PhysicalKey::Code(KeyCode::Escape)) {
            if key_event.state == ElementState::Pressed {
                self.mark_quit_requested();
            }
            return;
        }
        let Some(button) = pad_button_for_key(key_event.physical_key) else {
            return;
        };
        self.set_button_state(button, key_event.state == ElementState::Pressed);
    }

    fn set_button_state(&mut self, button: PadButton, is_pressed: bool) {
        if is_pressed && !self.held.is_down(button) {
            self.pressed_edge.set(button, true);
        }
        self.held.set(button, is_pressed);
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(self.quit_requested, self.held, self.pressed_edge);
        self.pressed_edge = ButtonStates::default();
        snapshot
    }
}

fn pad_button_for_key(key: PhysicalKey) -> Option<PadButton> {
    match key {
        PhysicalKey::Code(KeyCode::ArrowLeft) | PhysicalKey::Code(KeyCode::KeyA) => {
            Some(PadButton::Left)
        }
        PhysicalKey::Code(KeyCode::ArrowRight) | PhysicalKey::Code(KeyCode::KeyD) => {
            Some(PadButton::Right)
        }
        PhysicalKey::Code(KeyCode::ArrowUp) | PhysicalKey::Code(KeyCode::KeyW) => {
            Some(PadButton::Up)
        }
        PhysicalKey::Code(KeyCode::ArrowDown) | PhysicalKey::Code(KeyCode::KeyS) => {
            Some(PadButton::Down)
        }
        PhysicalKey::Code(KeyCode::KeyZ) | PhysicalKey::Code(KeyCode::Space) => {
            Some(PadButton::Jump)
        }
        PhysicalKey::Code(KeyCode::KeyX) | PhysicalKey::Code(KeyCode::KeyJ) => {
            Some(PadButton::Attack)
        }
        PhysicalKey::Code(KeyCode::Enter) => Some(PadButton::Start),
        _ => None,
    }
}

fn resolve_atlas_path(config_path: Option<PathBuf>) -> Option<PathBuf> {
    match env::var(ATLAS_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => Some(PathBuf::from(value)),
        _ => config_path,
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        let raw_frame_dt = Duration::from_millis(600);

        assert_eq!(
            clamp_frame_delta(raw_frame_dt, max_frame_delta),
            max_frame_delta
        );
    }

    #[test]
    fn plan_sim_steps_runs_expected_ticks_without_drop() {
        let fixed_dt = Duration::from_micros(16_667);
        let result = plan_sim_steps(Duration::from_micros(50_001), fixed_dt, 5);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.dropped_backlog, Duration::ZERO);
        assert!(result.remaining_accumulator < fixed_dt);
    }

    #[test]
    fn plan_sim_steps_drops_backlog_when_tick_cap_hit() {
        let fixed_dt = Duration::from_millis(16);
        let result = plan_sim_steps(Duration::from_millis(120), fixed_dt, 3);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::from_millis(72));
    }

    #[test]
    fn press_edge_is_single_tick() {
        let mut input = InputCollector::default();
        input.set_button_state(PadButton::Jump, true);

        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();

        assert!(first.just_pressed(PadButton::Jump));
        assert!(first.is_down(PadButton::Jump));
        assert!(!second.just_pressed(PadButton::Jump));
        assert!(second.is_down(PadButton::Jump));
    }

    #[test]
    fn held_button_does_not_spam_press_edges() {
        let mut input = InputCollector::default();

        input.set_button_state(PadButton::Attack, true);
        let first = input.snapshot_for_tick();

        input.set_button_state(PadButton::Attack, true);
        let second = input.snapshot_for_tick();

        input.set_button_state(PadButton::Attack, false);
        input.set_button_state(PadButton::Attack, true);
        let third = input.snapshot_for_tick();

        assert!(first.just_pressed(PadButton::Attack));
        assert!(!second.just_pressed(PadButton::Attack));
        assert!(third.just_pressed(PadButton::Attack));
    }

    #[test]
    fn release_clears_held_state() {
        let mut input = InputCollector::default();
        input.set_button_state(PadButton::Right, true);
        input.set_button_state(PadButton::Right, false);

        let snapshot = input.snapshot_for_tick();
        assert!(!snapshot.is_down(PadButton::Right));
        assert!(snapshot.just_pressed(PadButton::Right));

        let next = input.snapshot_for_tick();
        assert!(!next.just_pressed(PadButton::Right));
    }

    #[test]
    fn arrows_and_letters_map_to_same_pad_buttons() {
        assert_eq!(
            pad_button_for_key(PhysicalKey::Code(KeyCode::ArrowLeft)),
            Some(PadButton::Left)
        );
        assert_eq!(
            pad_button_for_key(PhysicalKey::Code(KeyCode::KeyA)),
            Some(PadButton::Left)
        );
        assert_eq!(
            pad_button_for_key(PhysicalKey::Code(KeyCode::Space)),
            Some(PadButton::Jump)
        );
        assert_eq!(
            pad_button_for_key(PhysicalKey::Code(KeyCode::KeyX)),
            Some(PadButton::Attack)
        );
        assert_eq!(
            pad_button_for_key(PhysicalKey::Code(KeyCode::Enter)),
            Some(PadButton::Start)
        );
        assert_eq!(pad_button_for_key(PhysicalKey::Code(KeyCode::F5)), None);
    }

    #[test]
    fn normalize_non_zero_duration_replaces_zero() {
        assert_eq!(
            normalize_non_zero_duration(Duration::ZERO, Duration::from_secs(1)),
            Duration::from_secs(1)
        );
        assert_eq!(
            normalize_non_zero_duration(Duration::from_millis(5), Duration::from_secs(1)),
            Duration::from_millis(5)
        );
    }
}
