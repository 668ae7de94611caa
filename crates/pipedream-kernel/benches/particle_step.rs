//! Criterion benchmarks for the particle tick
//!
//! - One `ParticleSystem` tick over a steady population
//! - A firework burst cascading through two spawn generations

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pipedream_common::{ItemId, Rect, Rgba, Vec2};
use pipedream_kernel::prelude::*;

struct IdleAnimator;

impl Animator for IdleAnimator {
    fn animate(&mut self, _item: ItemId, _animation: Animation) {}

    fn pose(&self, _item: ItemId) -> Option<Pose> {
        None
    }

    fn is_running(&self, _item: ItemId) -> bool {
        false
    }

    fn cancel(&mut self, _item: ItemId) {}

    fn advance(&mut self, _elapsed: Duration) {}
}

fn stage() -> Rect {
    Rect::new(0.0, 0.0, 1440.0, 900.0)
}

/// Spiral-like system warmed up to roughly `quantity * 400` live particles
fn warmed_system(quantity: u32, canvas: &mut RecordingCanvas) -> ParticleSystem {
    let emitter = Emitter::new(stage(), |state| {
        Particle::glow(state, 10.0).with_vibration(500.0, 250.0, 0.01)
    })
    .with_emitting_params(0, quantity, 0)
    .with_velocity(Vec2::new(0.0, -1.0), 0.0, 0.1)
    .with_lifetime_range(400, 450)
    .with_color(Rgba::from_rgb8(38, 191, 221), Rgba::from_rgba8(38, 191, 221, 0));

    let mut system = ParticleSystem::new("bench")
        .with_emitter(emitter)
        .with_affector(Affector::turbulence(stage()))
        .with_affector(Affector::amplitude_decay(stage(), 0.007));
    system.start();

    let mut animator = IdleAnimator;
    for _ in 0..400 {
        let mut ctx = SceneContext::new(stage(), canvas, &mut animator);
        system.act_out(&mut ctx);
    }
    system
}

fn bench_system_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_system_tick");

    for quantity in [1u32, 3, 10] {
        let mut canvas = RecordingCanvas::new();
        let mut system = warmed_system(quantity, &mut canvas);
        group.throughput(Throughput::Elements(system.population() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(quantity), &quantity, |b, _| {
            let mut animator = IdleAnimator;
            b.iter(|| {
                let mut ctx = SceneContext::new(stage(), &mut canvas, &mut animator);
                system.act_out(&mut ctx);
                black_box(system.population())
            });
        });
    }

    group.finish();
}

fn bench_firework_cascade(c: &mut Criterion) {
    c.bench_function("firework_cascade", |b| {
        b.iter(|| {
            let state = ParticleState::moving(Vec2::new(720.0, 800.0), Vec2::new(0.0, -1.0), 5.0)
                .with_colors(Rgba::from_rgb8(255, 80, 80), Rgba::from_rgba8(255, 80, 80, 0))
                .with_size(18.0)
                .with_lifetime(100);
            let mut live = vec![Particle::firework(state, 10.0)];
            let mut spawned = Vec::new();
            while !live.is_empty() {
                for particle in &mut live {
                    particle.step(&mut spawned);
                }
                live.retain(|p| !p.is_dead());
                live.append(&mut spawned);
            }
            black_box(live.len())
        });
    });
}

criterion_group!(benches, bench_system_tick, bench_firework_cascade);
criterion_main!(benches);
