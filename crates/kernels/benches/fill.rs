use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kernels::{DType, FillKernel, FillValue, KernelRunner, Tensor};

fn bench_broadcast(c: &mut Criterion) {
    let mut out = vec![0u8; 4 * 64 * 1024];
    let value = FillValue::from_bytes(bytemuck::bytes_of(&4.0f32)).unwrap();
    c.bench_function("broadcast_f32_64k", |b| {
        b.iter(|| black_box(value).broadcast(black_box(&mut out)).unwrap());
    });

    let value = FillValue::from_bytes(&[7u8]).unwrap();
    c.bench_function("broadcast_i8_256k", |b| {
        b.iter(|| black_box(value).broadcast(black_box(&mut out)).unwrap());
    });
}

fn bench_prepare_invoke(c: &mut Criterion) {
    let mut tensors = vec![
        Tensor::from_slice(vec![3], &[16i32, 32, 32]).unwrap(),
        Tensor::scalar(-1i64),
        Tensor::zeros(DType::I64, vec![16, 32, 32]).unwrap(),
    ];
    let mut runner = KernelRunner::new(FillKernel::new(), &mut tensors, &[0, 1], &[2]).unwrap();
    c.bench_function("fill_prepare_invoke_16x32x32_i64", |b| {
        b.iter(|| {
            runner.init_and_prepare().unwrap();
            runner.invoke().unwrap();
        });
    });
}

criterion_group!(benches, bench_broadcast, bench_prepare_invoke);
criterion_main!(benches);
