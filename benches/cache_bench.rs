use std::hint::black_box;
use std::path::PathBuf;

use criterion::{Criterion, criterion_group, criterion_main};
use strata::{ArchiveDocument, NodeDocument, SceneArchive, SceneCache, Space, TransformComposer};
use strata::cache::descendant_names;

/// `fanout` children per node, `depth` levels below the root.
fn tree(name: &str, fanout: usize, depth: usize) -> NodeDocument {
    let node = NodeDocument::new(name).with_translation(glam::DVec3::X);
    if depth == 0 {
        return node;
    }
    (0..fanout).fold(node, |node, i| node.with_child(tree(&format!("n{i}"), fanout, depth - 1)))
}

fn archive(fanout: usize, depth: usize) -> SceneArchive {
    let document = ArchiveDocument::new(tree("/", fanout, depth));
    SceneArchive::from_document("bench.mdc", document).unwrap()
}

fn bench_cache_hits(c: &mut Criterion) {
    let cache = SceneCache::with_loader(Default::default(), |path: &std::path::Path| {
        SceneArchive::from_document(path, ArchiveDocument::new(tree("/", 4, 3)))
    });
    let files: Vec<PathBuf> = (0..64).map(|i| PathBuf::from(format!("file{i}.mdc"))).collect();
    for file in &files {
        cache.get(file).unwrap();
    }

    c.bench_function("cache_get_hit", |b| {
        b.iter(|| {
            for file in &files {
                black_box(cache.get(file).unwrap());
            }
        });
    });

    c.bench_function("cache_entry_resolve", |b| {
        b.iter(|| black_box(cache.entry(&files[0], "/n1/n2/n3").unwrap().path()));
    });
}

fn bench_transforms(c: &mut Criterion) {
    let archive = archive(4, 6);
    let composer = TransformComposer::new(&archive);
    let path = "/n3/n2/n1/n0/n3/n2";

    c.bench_function("world_transform_depth_6", |b| {
        b.iter(|| black_box(composer.in_space(Space::World, "/", black_box(path)).unwrap()));
    });

    c.bench_function("path_transform_depth_6", |b| {
        b.iter(|| black_box(composer.in_space(Space::Path, "/n3/n2", black_box(path)).unwrap()));
    });
}

fn bench_enumeration(c: &mut Criterion) {
    let archive = archive(6, 4);

    c.bench_function("descendant_names_1554", |b| {
        b.iter(|| black_box(descendant_names(&archive, archive.root())));
    });
}

criterion_group!(benches, bench_cache_hits, bench_transforms, bench_enumeration);
criterion_main!(benches);
