use criterion::{black_box, criterion_group, criterion_main, Criterion};

use xmlpatch::{parse, serialize, NodePath};

const SIMPLE_XML: &str = "<root><child>text</child></root>";
const MANIFEST_XML: &str = include_str!("../tests/fixtures/valid/manifest.xml");
const PROXY_XML: &str = include_str!("../tests/fixtures/valid/proxy_endpoint.xml");

fn bench_parse(c: &mut Criterion) {
    c.bench_function("xmlpatch_parse_simple", |b| {
        b.iter(|| parse(black_box(SIMPLE_XML)))
    });
    c.bench_function("xmlpatch_parse_proxy", |b| {
        b.iter(|| parse(black_box(PROXY_XML)))
    });
}

fn bench_serialize(c: &mut Criterion) {
    let Ok(doc) = parse(PROXY_XML) else {
        return;
    };
    c.bench_function("xmlpatch_serialize_proxy", |b| {
        b.iter(|| serialize(black_box(&doc)))
    });
}

fn bench_patch(c: &mut Criterion) {
    let path = NodePath::new(["TargetEndpoints", "VersionInfo"]);
    c.bench_function("xmlpatch_patch_manifest", |b| {
        b.iter(|| {
            let mut doc = parse(black_box(MANIFEST_XML)).ok()?;
            doc.resolve_path_mut(&path)?
                .set_attribute("resourceName", "new default");
            serialize(&doc).ok()
        })
    });
}

criterion_group!(benches, bench_parse, bench_serialize, bench_patch);
criterion_main!(benches);
