use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ritual::policy::presets;
use ritual::{
  Boleto, Card, ContextData, Decimal, International, National, OrderPipeline, OrderVariant, PaymentMethod,
  PaymentPipeline, Pipeline, PipelineControl, Pix, RitualError,
};
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
struct BenchContext {
  counter: u64,
}

// --- Helper: handler doing a fixed amount of CPU-bound work ---
fn create_increment_handler(iterations: u64) -> ritual::Handler<BenchContext, RitualError> {
  Box::new(move |ctx: ContextData<BenchContext>| -> Result<PipelineControl, RitualError> {
    let mut data = ctx.write();
    for _i in 0..iterations {
      data.counter = data.counter.wrapping_add(1);
    }
    Ok(PipelineControl::Continue)
  })
}

fn bench_engine(c: &mut Criterion) {
  let mut group = c.benchmark_group("StepEngine");

  for num_steps in [1usize, 5, 10] {
    let names: Vec<String> = (0..num_steps).map(|i| format!("step_{}", i)).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut pipeline = Pipeline::<BenchContext, RitualError>::new(&name_refs);
    for name in &name_refs {
      pipeline.on_root(name, create_increment_handler(10));
    }

    group.bench_with_input(BenchmarkId::new("steps", num_steps), &pipeline, |b, p| {
      b.iter(|| {
        let ctx = ContextData::new(BenchContext::default());
        black_box(p.run(ctx).unwrap());
      })
    });
  }
  group.finish();
}

fn bench_order_process(c: &mut Criterion) {
  let mut group = c.benchmark_group("OrderProcess");
  let variants: Vec<Arc<dyn OrderVariant>> = vec![Arc::new(National), Arc::new(International)];

  for variant in variants {
    let name = variant.name();
    let pipeline = OrderPipeline::builder_for(variant)
      .shipping_policy(presets::flat_surcharge(Decimal::new(25, 0)))
      .promotion_policy(presets::flat_discount(Decimal::new(15, 0)))
      .build();
    group.bench_function(BenchmarkId::new("variant", name), |b| {
      b.iter(|| black_box(pipeline.process().unwrap()))
    });
  }
  group.finish();
}

fn bench_payment_process(c: &mut Criterion) {
  let mut group = c.benchmark_group("PaymentProcess");
  let methods: Vec<Arc<dyn PaymentMethod>> = vec![Arc::new(Card), Arc::new(Pix), Arc::new(Boleto)];

  for method in methods {
    let name = method.name();
    let approved = PaymentPipeline::builder_for(method.clone())
      .exchange_policy(presets::exchange_markup(Decimal::new(105, 2)))
      .fraud_policy(presets::approve_below(Decimal::new(150, 0)))
      .build();
    group.bench_function(BenchmarkId::new("approved", name), |b| {
      b.iter(|| black_box(approved.process().unwrap()))
    });

    let blocked = PaymentPipeline::builder_for(method)
      .fraud_policy(presets::reject_all())
      .build();
    group.bench_function(BenchmarkId::new("blocked", name), |b| {
      b.iter(|| black_box(blocked.process().is_err()))
    });
  }
  group.finish();
}

criterion_group!(benches, bench_engine, bench_order_process, bench_payment_process);
criterion_main!(benches);
