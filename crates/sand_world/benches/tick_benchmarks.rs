use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sand_world::simulation::light::compute_light;
use sand_world::{
  CellPos, MaterialId, Materials, SandWorld, SandWorldConfig, WeatherKind, materialize,
  simulate_tick,
};

const GRID_SIZES: &[u32] = &[100, 300, 600];

fn populated_world(size: u32) -> SandWorld {
  let mut world = SandWorld::new(&SandWorldConfig {
    width: size,
    height: size,
    seed: Some(42),
    ..Default::default()
  });
  let s = size as i32;
  let r = s / 10;
  world.paint(CellPos::new(s / 4, s / 4), r, MaterialId::Sand, false);
  world.paint(CellPos::new(3 * s / 4, s / 4), r, MaterialId::Water, false);
  world.paint(CellPos::new(s / 2, s / 2), r, MaterialId::Oil, false);
  for x in 0..s {
    world.set(CellPos::new(x, 3 * s / 4), MaterialId::Stone);
  }
  world.set(CellPos::new(s / 3, 0), MaterialId::SandSpout);
  world.spawn_person();
  world.start_weather(WeatherKind::Rain);
  world
}

fn bench_tick(c: &mut Criterion) {
  let mut group = c.benchmark_group("tick");
  let materials = Materials::new();

  for &size in GRID_SIZES {
    group.throughput(Throughput::Elements((size as u64) * (size as u64)));
    group.bench_with_input(BenchmarkId::new("grid", size), &size, |b, &size| {
      let mut world = populated_world(size);
      b.iter(|| simulate_tick(&mut world, &materials));
    });
  }

  group.finish();
}

fn bench_light(c: &mut Criterion) {
  let mut group = c.benchmark_group("light");
  let materials = Materials::new();

  for &size in GRID_SIZES {
    group.throughput(Throughput::Elements((size as u64) * (size as u64)));
    group.bench_with_input(BenchmarkId::new("grid", size), &size, |b, &size| {
      let world = populated_world(size);
      b.iter(|| compute_light(world.grid().cells(), &materials, 16.5));
    });
  }

  group.finish();
}

fn bench_materialize(c: &mut Criterion) {
  let mut group = c.benchmark_group("materialize");
  let materials = Materials::new();

  for &size in GRID_SIZES {
    let byte_count = (size as u64) * (size as u64) * 4;
    group.throughput(Throughput::Bytes(byte_count));
    group.bench_with_input(BenchmarkId::new("grid", size), &size, |b, &size| {
      let world = populated_world(size);
      let mut out = vec![0u8; byte_count as usize];
      b.iter(|| materialize(&world, &materials, &mut out));
    });
  }

  group.finish();
}

criterion_group!(benches, bench_tick, bench_light, bench_materialize);
criterion_main!(benches);
