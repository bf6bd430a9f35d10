use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use segstore::proofs::{verify_proof, MerkleTree};

fn leaves(count: usize) -> Vec<Vec<u8>> {
    (0..count).map(|i| (i as u64).to_le_bytes().repeat(128)).collect()
}

fn build_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for shift in [4, 8, 12, 14] {
        let count = 1usize << shift;
        let mut tree = MerkleTree::from_leaves(leaves(count));
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("full_rebuild", count), &count, |b, _| {
            b.iter(|| black_box(tree.build().unwrap()))
        });
    }

    group.finish();
}

fn proof_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("proof");

    for shift in [4, 8, 12, 14] {
        let count = 1usize << shift;
        let mut tree = MerkleTree::from_leaves(leaves(count));
        let root = tree.build().unwrap();
        let proof = tree.generate_proof(count / 3).unwrap();

        group.bench_with_input(BenchmarkId::new("generate", count), &count, |b, &count| {
            b.iter(|| black_box(tree.generate_proof(black_box(count - 1)).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("verify", count), &proof, |b, proof| {
            b.iter(|| black_box(verify_proof(&root, proof).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, build_benchmark, proof_benchmark);
criterion_main!(benches);
