use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pathproxy::handle::{Handle, MemoryHandle, Whence};
use pathproxy::{Registry, SchemeTable};
use std::io::SeekFrom;
use std::sync::Arc;

fn bench_write_forwarding(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_forwarding");
    let chunk_sizes = [64usize, 4 * 1024, 64 * 1024];

    for &size in &chunk_sizes {
        let chunk = vec![b'x'; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("direct", size), &chunk, |b, chunk| {
            let handle = MemoryHandle::new();
            b.iter(|| {
                handle.seek(SeekFrom::Start(0)).unwrap();
                black_box(handle.write(chunk).unwrap());
            });
        });

        group.bench_with_input(BenchmarkId::new("proxied", size), &chunk, |b, chunk| {
            let table = Arc::new(SchemeTable::new());
            let registry = Registry::new(Arc::clone(&table));
            let path = registry
                .register_with_path(Arc::new(MemoryHandle::new()), None)
                .unwrap()
                .to_string();
            let mut stream = table.open(&path, "w").unwrap();
            b.iter(|| {
                stream.seek(0, Whence::Set).unwrap();
                black_box(stream.write(chunk).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_open_close(c: &mut Criterion) {
    let table = Arc::new(SchemeTable::new());
    let registry = Registry::new(Arc::clone(&table));

    c.bench_function("register_open_close", |b| {
        b.iter(|| {
            let path = registry
                .register_with_path(Arc::new(MemoryHandle::new()), None)
                .unwrap()
                .to_string();
            let stream = table.open(&path, "w").unwrap();
            black_box(stream.close().unwrap());
        });
    });
}

criterion_group!(benches, bench_write_forwarding, bench_open_close);
criterion_main!(benches);
